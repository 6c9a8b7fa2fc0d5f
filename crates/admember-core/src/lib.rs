//! admember core library
//!
//! Credentials, run configuration, the directory capability trait and the
//! group membership flow. Directory protocol handling lives behind
//! [`Directory`]; see the `admember-ldap` crate for the LDAP implementation.

pub mod config;
pub mod credential;
pub mod directory;
pub mod error;
pub mod updater;

pub use config::MemberConfig;
pub use credential::Credential;
pub use directory::{Directory, DirectoryEntry, GroupRecord, MembershipChange, UserRecord};
pub use error::{Error, ErrorKind, Result};
pub use updater::{Outcome, Progress};

/// admember version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
