use std::future::Future;
use std::time::Duration;

use derive_new::new;
use serde::{Deserialize, Deserializer};
use snafu::ResultExt;
use tracing::instrument;

use crate::model::Username;

pub use error::*;
pub use schema::*;

mod error;
mod schema;

pub const ENDPOINT: &str = "https://leetcode.com/graphql";

/// The statistics LeetCode reports for a single user.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Profile {
    /// The username as LeetCode spells it.
    pub username: String,
    pub solved_questions: u64,
    pub badges: Vec<String>,
}

/// Somewhere user statistics can be fetched from.
pub trait StatsSource {
    fn profile(&self, username: &Username) -> impl Future<Output = Result<Profile>> + Send;
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeetCodeConfig {
    #[serde(rename = "leetcode_endpoint", default = "default_endpoint")]
    pub endpoint: String,
    /// Upper bound for a whole upstream request, e.g. `10s`. Unbounded when unset.
    #[serde(
        rename = "leetcode_timeout",
        default,
        deserialize_with = "deserialize_timeout"
    )]
    pub timeout: Option<Duration>,
}

fn default_endpoint() -> String {
    ENDPOINT.to_string()
}

fn deserialize_timeout<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Duration>, D::Error> {
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    humantime::parse_duration(&text)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: None,
        }
    }
}

/// Client for LeetCode's public GraphQL API.
#[derive(Debug, Clone)]
pub struct LeetCode {
    client: reqwest::Client,
    endpoint: String,
}

impl LeetCode {
    pub fn connect(config: &LeetCodeConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context(BuildClientSnafu)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl StatsSource for LeetCode {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn profile(&self, username: &Username) -> Result<Profile> {
        tracing::info!("fetch profile of `{}` from leetcode", username);

        let body = GraphQlRequest::new(PROFILE_QUERY, ProfileVariables::new(username.as_str()));

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context(NoResponseSnafu)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "leetcode answered with an error status");
            return StatusSnafu { status }.fail();
        }

        let response: GraphQlResponse<ProfileData> =
            response.json().await.context(MalformedBodySnafu)?;

        response.into_profile(username.as_str())
    }
}
