use crate::core::mixing::CompositionHash;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Vote {
    Like,
    Dislike,
}

impl Vote {
    pub fn from_like(like: bool) -> Self {
        if like { Self::Like } else { Self::Dislike }
    }

    /// `(likes, dislikes)` increment applied by this vote.
    pub(crate) fn deltas(self) -> (u64, u64) {
        match self {
            Self::Like => (1, 0),
            Self::Dislike => (0, 1),
        }
    }
}

/// Like/dislike counters for one composition hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
    pub likes: u64,
    pub dislikes: u64,
}

impl RatingCounts {
    pub fn new(likes: u64, dislikes: u64) -> Self {
        Self { likes, dislikes }
    }

    pub fn total(&self) -> u64 {
        self.likes.saturating_add(self.dislikes)
    }

    pub fn net(&self) -> i64 {
        let likes = i64::try_from(self.likes).unwrap_or(i64::MAX);
        let dislikes = i64::try_from(self.dislikes).unwrap_or(i64::MAX);
        likes.saturating_sub(dislikes)
    }

    /// Share of likes, `None` before the first vote.
    #[allow(clippy::cast_precision_loss)]
    pub fn approval(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.likes as f64 / total as f64),
        }
    }

    pub(crate) fn apply(&mut self, vote: Vote) {
        let (likes, dislikes) = vote.deltas();
        self.likes = self.likes.saturating_add(likes);
        self.dislikes = self.dislikes.saturating_add(dislikes);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedHash {
    pub hash: CompositionHash,
    #[serde(flatten)]
    pub counts: RatingCounts,
}

/// Ordering used by `top_rated`: net desc, likes desc, hash asc.
pub(crate) fn rank_order(a: &RatedHash, b: &RatedHash) -> std::cmp::Ordering {
    b.counts
        .net()
        .cmp(&a.counts.net())
        .then_with(|| b.counts.likes.cmp(&a.counts.likes))
        .then_with(|| a.hash.cmp(&b.hash))
}
