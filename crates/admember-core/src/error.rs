//! Error types for admember

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Input Errors
    #[error("Provide either --password or --hash for authentication")]
    MissingCredential,

    // Connection Errors
    #[error("Failed to connect to directory server: {0}")]
    Connection(String),

    #[error("Failed to bind to directory server: {0}")]
    Bind(String),

    #[error("No directory session; bind first")]
    NotBound,

    // Lookup Errors
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Directory search failed: {0}")]
    Search(String),

    // Mutation Errors
    #[error("Directory rejected the membership change on {0}")]
    ModifyRejected(String),

    #[error("Directory modify failed: {0}")]
    Modify(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse failure classes, one per stage of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing arguments; nothing was sent to the server
    Input,
    /// Connection or bind failed; no search was attempted
    Connection,
    /// Group or user lookup failed; no change was attempted
    Lookup,
    /// The membership change did not go through
    Mutation,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingCredential => ErrorKind::Input,
            Error::Connection(_) | Error::Bind(_) | Error::NotBound => ErrorKind::Connection,
            Error::GroupNotFound(_) | Error::UserNotFound(_) | Error::Search(_) => {
                ErrorKind::Lookup
            }
            Error::ModifyRejected(_) | Error::Modify(_) => ErrorKind::Mutation,
            Error::Other(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::MissingCredential.kind(), ErrorKind::Input);
        assert_eq!(Error::Bind("rc=49".into()).kind(), ErrorKind::Connection);
        assert_eq!(Error::Connection("refused".into()).kind(), ErrorKind::Connection);
        assert_eq!(Error::GroupNotFound("Admins".into()).kind(), ErrorKind::Lookup);
        assert_eq!(Error::UserNotFound("jdoe".into()).kind(), ErrorKind::Lookup);
        assert_eq!(
            Error::ModifyRejected("cn=Admins".into()).kind(),
            ErrorKind::Mutation
        );
    }
}
