use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::tokenizer::tokenize;

/// Sparse, L2-normalized term vector
///
/// Entries are `(term index, weight)` sorted by term index so two vectors
/// can be dotted with a single merge pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    fn from_weights(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(term, _)| *term);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// True when the document contributed no terms
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

/// TF-IDF weighting fitted on one corpus snapshot
///
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, so a term present in every
/// document still weighs 1 and a single-document corpus is well defined.
#[derive(Debug, Clone, Default)]
pub struct TfIdfMatrix {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<TermVector>,
}

impl TfIdfMatrix {
    /// Fit the vocabulary on `documents` and transform each of them
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Self {
        if documents.is_empty() {
            return Self::default();
        }

        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();

        // Alphabetical term order keeps indices stable for a given corpus
        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<usize> = tokens.iter().map(|t| vocabulary[t]).collect();
            for idx in unique {
                doc_freq[idx] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, usize> = HashMap::new();
                for token in tokens {
                    *counts.entry(vocabulary[token]).or_insert(0) += 1;
                }
                let weights = counts
                    .into_iter()
                    .map(|(idx, tf)| (idx, tf as f64 * idf[idx]))
                    .collect();
                TermVector::from_weights(weights)
            })
            .collect();

        Self {
            vocabulary,
            idf,
            vectors,
        }
    }

    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }

    pub fn vector(&self, index: usize) -> Option<&TermVector> {
        self.vectors.get(index)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// IDF weight of a term, if it occurs in the corpus
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }
}
