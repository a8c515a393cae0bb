use derive_new::new;
use serde::{Deserialize, Serialize};

pub fn now() -> Timestamp {
    Timestamp(chrono::Utc::now())
}

/// A UTC instant, serialized as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, new)]
#[serde(transparent)]
pub struct Timestamp(chrono::DateTime<chrono::Utc>);

impl std::ops::Deref for Timestamp {
    type Target = chrono::DateTime<chrono::Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Timestamp {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        Self(value)
    }
}
