//! Bind credentials
//!
//! The administrative account authenticates either with a plaintext
//! password or with a precomputed `LMHASH:NTHASH` pair.

use crate::error::{Error, Result};
use std::fmt;

/// LM half customarily sent when only the NT hash is meaningful
pub const EMPTY_LM_HASH: &str = "aad3b435b51404eeaad3b435b51404ee";

/// Secret used to bind as the administrative account
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Plaintext password
    Password(String),
    /// Precomputed LM and NT hashes
    HashPair { lm: String, nt: String },
}

impl Credential {
    /// Pick the credential from the optional password and hash inputs.
    ///
    /// Empty values count as absent. The hash takes precedence when both
    /// are supplied.
    pub fn resolve(password: Option<String>, hash: Option<String>) -> Result<Self> {
        let password = password.filter(|p| !p.is_empty());
        let hash = hash.filter(|h| !h.is_empty());

        match (password, hash) {
            (_, Some(hash)) => Ok(Self::parse_hash(&hash)),
            (Some(password), None) => Ok(Credential::Password(password)),
            (None, None) => Err(Error::MissingCredential),
        }
    }

    /// Split `LMHASH:NTHASH` at the first colon.
    ///
    /// A value without a colon is taken as the NT hash alone. The halves are
    /// not checked for length or hex syntax.
    pub fn parse_hash(value: &str) -> Self {
        match value.split_once(':') {
            Some((lm, nt)) => Credential::HashPair {
                lm: lm.to_string(),
                nt: nt.to_string(),
            },
            None => Credential::HashPair {
                lm: String::new(),
                nt: value.to_string(),
            },
        }
    }

    /// Short label for logs
    pub fn method(&self) -> &'static str {
        match self {
            Credential::Password(_) => "password",
            Credential::HashPair { .. } => "hash",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password(_) => f.write_str("Password(<redacted>)"),
            Credential::HashPair { .. } => f.write_str("HashPair(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential() {
        let err = Credential::resolve(None, None).unwrap_err();
        assert!(matches!(err, Error::MissingCredential));

        // Empty strings are treated as not supplied
        let err = Credential::resolve(Some(String::new()), Some(String::new())).unwrap_err();
        assert!(matches!(err, Error::MissingCredential));
    }

    #[test]
    fn test_password_credential() {
        let cred = Credential::resolve(Some("S3cret!".to_string()), None).unwrap();
        assert_eq!(cred, Credential::Password("S3cret!".to_string()));
        assert_eq!(cred.method(), "password");
    }

    #[test]
    fn test_hash_wins_over_password() {
        let hash = format!("{}:31d6cfe0d16ae931b73c59d7e0c089c0", EMPTY_LM_HASH);
        let cred = Credential::resolve(Some("ignored".to_string()), Some(hash)).unwrap();

        assert_eq!(
            cred,
            Credential::HashPair {
                lm: EMPTY_LM_HASH.to_string(),
                nt: "31d6cfe0d16ae931b73c59d7e0c089c0".to_string(),
            }
        );
    }

    #[test]
    fn test_hash_without_colon() {
        let cred = Credential::parse_hash("31d6cfe0d16ae931b73c59d7e0c089c0");
        assert_eq!(
            cred,
            Credential::HashPair {
                lm: String::new(),
                nt: "31d6cfe0d16ae931b73c59d7e0c089c0".to_string(),
            }
        );
    }

    #[test]
    fn test_hash_is_not_validated() {
        let cred = Credential::parse_hash("not-hex:also:not-hex");
        assert_eq!(
            cred,
            Credential::HashPair {
                lm: "not-hex".to_string(),
                nt: "also:not-hex".to_string(),
            }
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let shown = format!("{:?}", Credential::Password("hunter2".to_string()));
        assert!(!shown.contains("hunter2"));

        let shown = format!("{:?}", Credential::parse_hash("aaaa:bbbb"));
        assert!(!shown.contains("bbbb"));
    }
}
