use thiserror::Error;

/// Why a single fetch against the quote API produced no data.
///
/// Both kinds are non-fatal: callers drop the affected section and degrade to
/// illustrative data.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Failure {
    /// The API signalled an error or a rate-limit notice, or the request never
    /// produced a usable HTTP response (timeout, connection error, bad status).
    #[error("rate-limited or invalid request: {0}")]
    RateLimitedOrInvalid(String),

    /// The response arrived but lacks the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("poll {0} not found")]
    PollNotFound(String),

    #[error("poll {0} is closed")]
    PollClosed(String),

    #[error("you have already voted on this poll")]
    AlreadyVoted,

    #[error("option {0} not found")]
    OptionNotFound(String),

    #[error("failed to record vote")]
    Storage(#[source] anyhow::Error),
}
