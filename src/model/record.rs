use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::leetcode::Profile;
use crate::{define_relation, define_table};

use super::{now, Timestamp};

/// A user's statistics as they were when first requested. Records are never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct StatRecord {
    pub username: String,
    pub solved_questions: u64,
    pub badges: Vec<String>,
    #[new(value = "now()")]
    pub created_at: Timestamp,
}

define_table!("cards" : StatRecord);

define_relation! {
    StatRecord > by_username(username: &str) > Option<StatRecord>
        where "SELECT * FROM cards WHERE username = $username LIMIT 1"
}

define_relation! {
    StatRecord > list() > Vec<StatRecord>
        where "SELECT * FROM cards ORDER BY createdAt"
}

impl From<Profile> for StatRecord {
    fn from(profile: Profile) -> Self {
        Self::new(profile.username, profile.solved_questions, profile.badges)
    }
}
