use derive_new::new;
use serde::{Deserialize, Serialize};
use snafu::OptionExt as _;

use super::{NotFoundSnafu, Profile, RejectedSnafu, Result};

pub const PROFILE_QUERY: &str = r#"
query getUserProfile($username: String!) {
  matchedUser(username: $username) {
    username
    submitStats: submitStatsGlobal {
      acSubmissionNum {
        difficulty
        count
        submissions
      }
    }
    badges {
      id
      displayName
      icon
    }
  }
}
"#;

#[derive(Debug, Clone, Serialize, new)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Clone, Serialize, new)]
pub struct ProfileVariables<'a> {
    pub username: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    pub username: String,
    pub submit_stats: SubmitStats,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    pub ac_submission_num: Vec<SubmissionCount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionCount {
    pub difficulty: String,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub display_name: String,
}

impl MatchedUser {
    /// Sum of every `acSubmissionNum` entry, LeetCode's pre-summed `All` row included.
    pub fn solved_questions(&self) -> u64 {
        self.submit_stats
            .ac_submission_num
            .iter()
            .map(|stat| stat.count)
            .sum()
    }
}

impl From<MatchedUser> for Profile {
    fn from(user: MatchedUser) -> Self {
        let solved_questions = user.solved_questions();
        let badges = user
            .badges
            .into_iter()
            .map(|badge| badge.display_name)
            .collect();

        Profile::new(user.username, solved_questions, badges)
    }
}

impl GraphQlResponse<ProfileData> {
    /// Extract the profile of `username`, treating a missing `matchedUser` as an unknown user.
    pub fn into_profile(self, username: &str) -> Result<Profile> {
        let Some(data) = self.data else {
            let message = self
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");

            return RejectedSnafu { message }.fail();
        };

        let user = data.matched_user.context(NotFoundSnafu { username })?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::leetcode::LeetCodeError;

    fn response(value: serde_json::Value) -> GraphQlResponse<ProfileData> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_body_carries_query_and_username() {
        let body = GraphQlRequest::new(PROFILE_QUERY, ProfileVariables::new("lee215"));
        let json = serde_json::to_value(body).unwrap();

        assert_eq!(json["variables"], json!({ "username": "lee215" }));
        assert!(json["query"].as_str().unwrap().contains("matchedUser"));
    }

    #[test]
    fn solved_questions_sums_every_difficulty() {
        let profile = response(json!({
            "data": {
                "matchedUser": {
                    "username": "lee215",
                    "submitStats": {
                        "acSubmissionNum": [
                            { "difficulty": "Easy", "count": 10, "submissions": 12 },
                            { "difficulty": "Medium", "count": 20, "submissions": 31 },
                            { "difficulty": "Hard", "count": 5, "submissions": 9 }
                        ]
                    },
                    "badges": []
                }
            }
        }))
        .into_profile("lee215")
        .unwrap();

        assert_eq!(profile.solved_questions, 35);
    }

    #[test]
    fn every_entry_is_summed_including_all() {
        let profile = response(json!({
            "data": {
                "matchedUser": {
                    "username": "lee215",
                    "submitStats": {
                        "acSubmissionNum": [
                            { "difficulty": "All", "count": 35, "submissions": 52 },
                            { "difficulty": "Easy", "count": 10, "submissions": 12 },
                            { "difficulty": "Medium", "count": 20, "submissions": 31 },
                            { "difficulty": "Hard", "count": 5, "submissions": 9 }
                        ]
                    },
                    "badges": []
                }
            }
        }))
        .into_profile("lee215")
        .unwrap();

        assert_eq!(profile.solved_questions, 70);
    }

    #[test]
    fn badges_keep_upstream_order_and_display_names() {
        let profile = response(json!({
            "data": {
                "matchedUser": {
                    "username": "lee215",
                    "submitStats": { "acSubmissionNum": [] },
                    "badges": [
                        { "id": "1", "displayName": "Annual Badge", "icon": "/a.png" },
                        { "id": "2", "displayName": "50 Days Badge", "icon": "/b.png" }
                    ]
                }
            }
        }))
        .into_profile("lee215")
        .unwrap();

        assert_eq!(profile.badges, vec!["Annual Badge", "50 Days Badge"]);
    }

    #[test]
    fn canonical_username_comes_from_upstream() {
        let profile = response(json!({
            "data": {
                "matchedUser": {
                    "username": "Lee215",
                    "submitStats": { "acSubmissionNum": [] },
                    "badges": []
                }
            }
        }))
        .into_profile("lee215")
        .unwrap();

        assert_eq!(profile.username, "Lee215");
    }

    #[test]
    fn missing_user_is_not_found() {
        let result = response(json!({
            "errors": [{ "message": "That user does not exist." }],
            "data": { "matchedUser": null }
        }))
        .into_profile("ghost");

        let error = result.unwrap_err();
        assert!(matches!(error, LeetCodeError::NotFound { .. }));
        assert!(error.to_string().contains("User not found"));
    }

    #[test]
    fn errors_without_data_are_rejected() {
        let result = response(json!({
            "errors": [{ "message": "rate limited" }, { "message": "try later" }]
        }))
        .into_profile("lee215");

        match result {
            Err(LeetCodeError::Rejected { message, .. }) => {
                assert_eq!(message, "rate limited; try later")
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
    }
}
