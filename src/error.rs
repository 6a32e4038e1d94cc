use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lock {
    /// Retrying later may succeed.
    Temporary,
    /// Needs customer service to unlock.
    Permanent,
}

impl std::fmt::Display for Lock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lock::Temporary => f.pad("temporarily, retry later"),
            Lock::Permanent => f.pad("permanently, contact customer service"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{context}: http status {status}")]
    Status { context: &'static str, status: u16 },
    #[error("{context}: unexpected response: {body}")]
    Body { context: &'static str, body: String },
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("protocol: {0}")]
    Protocol(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account is locked {0}")]
    AccountLocked(Lock),
    #[error("too many auth redirects ({hops})")]
    TooManyRedirects { hops: usize },
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
    #[error("unexpected document shape: {0}")]
    DocumentShape(String),
    #[error("account book meta has not been fetched")]
    MetaNotLoaded,
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, name: &str) -> Self {
        Error::NotFound {
            kind,
            name: name.to_owned(),
        }
    }

    /// True for the transport kind: bad status, unusable body or a failed connection.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Status { .. } | Error::Body { .. } | Error::Http(_)
        )
    }
}
