use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{BatchStatus, PlasticType};

/// A collected batch of plastic, tracked from drop-off to recycling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: String,
    pub center_id: String,
    pub collector_profile_id: String,
    pub plastic_type: PlasticType,
    pub weight_grams: u32,
    pub status: BatchStatus,
    pub recorded_at: NaiveDateTime,
}

/// Reward tokens held by a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardBalance {
    pub profile_id: String,
    pub tokens: u64,
    pub updated_at: NaiveDateTime,
}

impl RewardBalance {
    /// Balance of a profile the ledger has never seen.
    pub fn empty(profile_id: &str) -> Self {
        Self {
            profile_id: profile_id.to_string(),
            tokens: 0,
            updated_at: NaiveDateTime::default(),
        }
    }
}
