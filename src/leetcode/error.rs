use snafu::{Location, Snafu};

pub type Result<T, E = LeetCodeError> = ::std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LeetCodeError {
    #[snafu(display("User not found: `{username}`"))]
    NotFound {
        username: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("No response received from LeetCode API: {source}"))]
    NoResponse {
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("LeetCode API error: {status}"))]
    Status {
        status: reqwest::StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("LeetCode API error: {message}"))]
    Rejected {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("malformed response from LeetCode API: {source}"))]
    MalformedBody {
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to build the LeetCode HTTP client: {source}"))]
    BuildClient {
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
