use serde::{Deserialize, Serialize};

/// Full profile record as held by the profile store
///
/// The matching core reads `name`, `interests` and `email`; the
/// administrative fields are carried for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub year: i32,
    pub interests: String,
    #[serde(rename = "linkedinId", default)]
    pub linkedin_id: Option<String>,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
    pub email: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl Profile {
    /// Project the profile onto the columns the matcher needs
    pub fn corpus_entry(&self) -> CorpusEntry {
        CorpusEntry {
            id: self.id,
            name: self.name.clone(),
            interests: self.interests.clone(),
            email: self.email.clone(),
        }
    }
}

/// One row of a corpus snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: i64,
    pub name: String,
    pub interests: String,
    pub email: String,
}

/// A ranked candidate: corpus position plus similarity to the requester
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub score: f64,
}

/// Stateless recommendation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub email: String,
    pub score: f64,
}

/// A committed pairing in the match ledger
///
/// Members are stored in insertion order; see `PairUniqueness` for how
/// that order affects duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    #[serde(rename = "memberA")]
    pub member_a: String,
    #[serde(rename = "memberB")]
    pub member_b: String,
}

impl Pairing {
    pub fn new(member_a: impl Into<String>, member_b: impl Into<String>) -> Self {
        Self {
            member_a: member_a.into(),
            member_b: member_b.into(),
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.member_a == name || self.member_b == name
    }

    /// Same two members, regardless of order
    pub fn same_members(&self, a: &str, b: &str) -> bool {
        (self.member_a == a && self.member_b == b) || (self.member_a == b && self.member_b == a)
    }
}

/// Outcome of a ledger insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitOutcome {
    Committed,
    Duplicate,
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed)
    }
}

/// How the ledger decides that a pairing already exists
///
/// `Ordered` rejects only an identical `(a, b)` row, so `(b, a)` can still
/// be inserted next to it. `Unordered` treats both orders as the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairUniqueness {
    #[default]
    Ordered,
    Unordered,
}

impl PairUniqueness {
    pub fn from_unordered_flag(unordered: bool) -> Self {
        if unordered {
            PairUniqueness::Unordered
        } else {
            PairUniqueness::Ordered
        }
    }

    /// Whether `existing` blocks inserting `(a, b)`
    pub fn conflicts(&self, existing: &Pairing, a: &str, b: &str) -> bool {
        match self {
            PairUniqueness::Ordered => existing.member_a == a && existing.member_b == b,
            PairUniqueness::Unordered => existing.same_members(a, b),
        }
    }
}
