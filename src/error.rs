use thiserror::Error;

use crate::models::Source;

pub type Result<T> = std::result::Result<T, Error>;

/// A failure reaching an authority over the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Everything that can abort a verification pass.
///
/// Nothing here is recovered locally: a partial authority list would turn
/// into false "not recognized" verdicts.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport/network failure reaching an authority.
    #[error("failed to fetch the {origin} list: {cause}")]
    Fetch {
        origin: Source,
        #[source]
        cause: TransportError,
    },
    /// Payload is not in the expected machine-readable shape.
    #[error("malformed {origin} payload: {reason}")]
    Parse { origin: Source, reason: String },
    /// HTML arrived but the expected structure is missing or yields nothing.
    #[error("could not scrape the {origin} list: {reason}")]
    Scrape { origin: Source, reason: String },
    /// Schema query against a rule group that does not exist.
    #[error("unknown rule group `{group}`")]
    UnknownGroup { group: String },
    /// The content-loading collaborator failed.
    #[error(transparent)]
    Corpus(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn parse(origin: Source, reason: impl std::fmt::Display) -> Self {
        Error::Parse {
            origin,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn scrape(origin: Source, reason: impl std::fmt::Display) -> Self {
        Error::Scrape {
            origin,
            reason: reason.to_string(),
        }
    }
}
