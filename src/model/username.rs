use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// A LeetCode username, matched exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Username {
    type Err = ParseUsername;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::try_from(input.to_string())
    }
}

impl TryFrom<String> for Username {
    type Error = ParseUsername;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return EmptySnafu.fail();
        }

        Ok(Username(value))
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseUsername {
    #[snafu(display("Username is required"))]
    Empty,
}
