// Core algorithm exports
pub mod matcher;
pub mod selector;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

pub use matcher::{Matcher, corpus_version};
pub use selector::{rank_candidates, select_top, select_unpaired, MAX_MATCHES};
pub use similarity::{cosine_similarity, similarity_row, similarity_matrix};
pub use tokenizer::tokenize;
pub use vectorizer::{TermVector, TfIdfMatrix};
