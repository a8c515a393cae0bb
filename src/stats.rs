use std::sync::Arc;

use snafu::{Location, ResultExt as _, Snafu};
use tracing::instrument;

use crate::database::{Database, DatabaseError};
use crate::leetcode::{LeetCodeError, StatsSource};
use crate::model::{StatRecord, Username};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StatsError {
    /// LeetCode could not provide the user's statistics
    #[snafu(display("{source}"))]
    Upstream {
        username: Username,
        source: LeetCodeError,
        #[snafu(implicit)]
        location: Location,
    },

    /// The document store could not be read or written
    #[snafu(display("{source}"))]
    Store {
        username: Username,
        source: DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Coarse classification of a failed card request, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UpstreamNotFound,
    UpstreamUnavailable,
    UpstreamError,
    StoreError,
}

impl StatsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::Upstream { source, .. } => match source {
                LeetCodeError::NotFound { .. } => ErrorKind::UpstreamNotFound,
                LeetCodeError::NoResponse { .. } => ErrorKind::UpstreamUnavailable,
                LeetCodeError::Status { .. }
                | LeetCodeError::Rejected { .. }
                | LeetCodeError::MalformedBody { .. }
                | LeetCodeError::BuildClient { .. } => ErrorKind::UpstreamError,
            },
            StatsError::Store { .. } => ErrorKind::StoreError,
        }
    }

    pub fn username(&self) -> &Username {
        match self {
            StatsError::Upstream { username, .. } | StatsError::Store { username, .. } => username,
        }
    }
}

/// Read-through cache of [StatRecord]s in front of a [StatsSource].
///
/// A username is fetched from the source only when the store has no record for it. Stored records are returned as they are, forever.
/// Two concurrent misses for the same username both fetch and both insert.
#[derive(Debug)]
pub struct StatsProvider<S> {
    database: Database,
    source: Arc<S>,
}

impl<S> Clone for StatsProvider<S> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            source: self.source.clone(),
        }
    }
}

impl<S> StatsProvider<S> {
    pub fn new(database: Database, source: S) -> Self {
        Self {
            database,
            source: Arc::new(source),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: StatsSource> StatsProvider<S> {
    #[instrument(skip(self))]
    pub async fn card(&self, username: &Username) -> Result<StatRecord, StatsError> {
        let cached = StatRecord::by_username(username.as_str(), &self.database)
            .await
            .context(StoreSnafu { username: username.clone() })?;

        if let Some(record) = cached {
            tracing::debug!("found cached card");
            return Ok(record);
        }

        tracing::info!("no cached card for `{}`, asking leetcode", username);

        let profile = self
            .source
            .profile(username)
            .await
            .context(UpstreamSnafu { username: username.clone() })?;

        let record = StatRecord::from(profile);
        self.database
            .insert(&record)
            .await
            .context(StoreSnafu { username: username.clone() })?;

        tracing::info!(
            solved_questions = record.solved_questions,
            badges = record.badges.len(),
            "stored new card"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use snafu::OptionExt as _;

    use super::*;
    use crate::database::DatabaseConfig;
    use crate::leetcode::{NotFoundSnafu, Profile, StatusSnafu};

    #[derive(Debug, Default)]
    struct FakeLeetCode {
        calls: AtomicUsize,
        profiles: HashMap<String, Profile>,
        unavailable: bool,
    }

    impl FakeLeetCode {
        fn with(profiles: impl IntoIterator<Item = Profile>) -> Self {
            Self {
                profiles: profiles
                    .into_iter()
                    .map(|profile| (profile.username.clone(), profile))
                    .collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StatsSource for FakeLeetCode {
        async fn profile(&self, username: &Username) -> crate::leetcode::Result<Profile> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.unavailable {
                return StatusSnafu {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                }
                .fail();
            }

            self.profiles
                .get(username.as_str())
                .cloned()
                .context(NotFoundSnafu {
                    username: username.as_str(),
                })
        }
    }

    fn lee215() -> Profile {
        Profile::new(
            "lee215".to_string(),
            35,
            vec!["Annual Badge".to_string(), "50 Days Badge".to_string()],
        )
    }

    fn username(name: &str) -> Username {
        name.parse().unwrap()
    }

    #[tokio::test]
    async fn miss_fetches_once_and_stores_once() {
        let provider = StatsProvider::new(Database::memory(), FakeLeetCode::with([lee215()]));

        let card = provider.card(&username("lee215")).await.unwrap();

        assert_eq!(card.username, "lee215");
        assert_eq!(card.solved_questions, 35);
        assert_eq!(card.badges, vec!["Annual Badge", "50 Days Badge"]);
        assert_eq!(provider.source().calls(), 1);

        let stored = StatRecord::list(provider.database()).await.unwrap();
        assert_eq!(stored, vec![card]);
    }

    #[tokio::test]
    async fn hit_returns_stored_card_without_fetching() {
        let provider = StatsProvider::new(Database::memory(), FakeLeetCode::default());
        let stored = StatRecord::new("lee215".to_string(), 7, vec!["Old Badge".to_string()]);
        provider.database().insert(&stored).await.unwrap();

        let card = provider.card(&username("lee215")).await.unwrap();

        assert_eq!(card, stored);
        assert_eq!(provider.source().calls(), 0);
    }

    #[tokio::test]
    async fn second_request_is_served_from_the_store() {
        let provider = StatsProvider::new(Database::memory(), FakeLeetCode::with([lee215()]));

        let first = provider.card(&username("lee215")).await.unwrap();
        let second = provider.card(&username("lee215")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.source().calls(), 1);
        assert_eq!(StatRecord::list(provider.database()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_stores_nothing() {
        let provider = StatsProvider::new(Database::memory(), FakeLeetCode::default());

        let error = provider.card(&username("ghost")).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UpstreamNotFound);
        assert!(error.to_string().contains("User not found"));
        assert_eq!(error.username().as_str(), "ghost");
        assert!(StatRecord::list(provider.database()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_not_retried() {
        let source = FakeLeetCode {
            unavailable: true,
            ..FakeLeetCode::default()
        };
        let provider = StatsProvider::new(Database::memory(), source);

        let error = provider.card(&username("lee215")).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UpstreamError);
        assert_eq!(provider.source().calls(), 1);
    }

    #[tokio::test]
    async fn store_failure_skips_upstream() {
        let database = Database::new(DatabaseConfig {
            endpoint: "unknown://nowhere".to_string(),
            ..DatabaseConfig::default()
        });
        let provider = StatsProvider::new(database, FakeLeetCode::with([lee215()]));

        let error = provider.card(&username("lee215")).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::StoreError);
        assert_eq!(provider.source().calls(), 0);
    }
}
