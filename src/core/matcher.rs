use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use moka::sync::Cache;

use crate::core::{
    selector::{rank_candidates, select_top, MAX_MATCHES},
    similarity::similarity_row,
    vectorizer::TfIdfMatrix,
};
use crate::models::{CorpusEntry, Recommendation, ScoredCandidate};

/// Fingerprint of the interest texts of a snapshot, in corpus order
///
/// Any insert, update or delete that touches interests changes the value,
/// so it serves as the version key for cached vectors.
pub fn corpus_version(corpus: &[CorpusEntry]) -> u64 {
    let mut hasher = DefaultHasher::new();
    corpus.len().hash(&mut hasher);
    for entry in corpus {
        entry.interests.hash(&mut hasher);
    }
    hasher.finish()
}

struct CachedVectors {
    documents: Vec<String>,
    matrix: Arc<TfIdfMatrix>,
}

/// Interest matching pipeline over a corpus snapshot
///
/// # Pipeline Stages
/// 1. TF-IDF vectorization of every profile's interests
/// 2. Cosine similarity row for the requester
/// 3. Ranking with self and zero-similarity exclusion
///
/// Vectors are recomputed per call unless a cache was requested, in which
/// case they are reused for as long as the corpus version is unchanged.
#[derive(Clone, Default)]
pub struct Matcher {
    cache: Option<Cache<u64, Arc<CachedVectors>>>,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Matcher that keeps vectors for up to `capacity` corpus versions
    pub fn with_cache(capacity: u64) -> Self {
        Self {
            cache: Some(Cache::new(capacity)),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// TF-IDF vectors for the snapshot
    pub fn vectorize(&self, corpus: &[CorpusEntry]) -> Arc<TfIdfMatrix> {
        let documents: Vec<String> = corpus
            .iter()
            .map(|entry| entry.interests.to_lowercase())
            .collect();

        let Some(cache) = &self.cache else {
            return Arc::new(TfIdfMatrix::fit_transform(&documents));
        };

        let version = corpus_version(corpus);
        if let Some(cached) = cache.get(&version) {
            // Guard against fingerprint collisions
            if cached.documents == documents {
                tracing::trace!("Vector cache hit: version {}", version);
                return Arc::clone(&cached.matrix);
            }
        }

        let matrix = Arc::new(TfIdfMatrix::fit_transform(&documents));
        cache.insert(
            version,
            Arc::new(CachedVectors {
                documents,
                matrix: Arc::clone(&matrix),
            }),
        );
        tracing::trace!("Vector cache miss: version {}", version);

        matrix
    }

    /// Rank all other profiles against the requester
    ///
    /// Returns nothing for an empty corpus or a requester that is not
    /// part of the snapshot.
    pub fn rank(&self, corpus: &[CorpusEntry], requester_id: i64) -> Vec<ScoredCandidate> {
        if corpus.is_empty() {
            return Vec::new();
        }

        let Some(requester) = corpus.iter().position(|entry| entry.id == requester_id) else {
            tracing::debug!("Profile {} not present in corpus snapshot", requester_id);
            return Vec::new();
        };

        let matrix = self.vectorize(corpus);
        let row = similarity_row(&matrix, requester);
        let ranked = rank_candidates(&row, requester);

        tracing::debug!(
            "Ranked {} candidates for profile {} (corpus: {}, vocabulary: {})",
            ranked.len(),
            requester_id,
            corpus.len(),
            matrix.vocabulary_size()
        );

        ranked
    }

    /// Up to `MAX_MATCHES` recommendations, best first
    pub fn recommend(&self, corpus: &[CorpusEntry], requester_id: i64) -> Vec<Recommendation> {
        let ranked = self.rank(corpus, requester_id);

        select_top(&ranked, MAX_MATCHES)
            .into_iter()
            .map(|candidate| {
                let entry = &corpus[candidate.index];
                Recommendation {
                    name: entry.name.clone(),
                    email: entry.email.clone(),
                    score: candidate.score,
                }
            })
            .collect()
    }

    /// Names of every ranked candidate, best first
    pub fn ranked_names(&self, corpus: &[CorpusEntry], requester_id: i64) -> Vec<String> {
        self.rank(corpus, requester_id)
            .into_iter()
            .map(|candidate| corpus[candidate.index].name.clone())
            .collect()
    }
}
