//! Report lines printed on stdout
//!
//! Every line starts with `[+]` (success) or `[-]` (failure); scripted
//! callers match on these texts.

use admember_core::{Error, Outcome};
use std::process::ExitCode;
use tracing::error;

pub const CONNECTED: &str = "[+] Connected to Active Directory successfully.";
pub const ALREADY_MEMBER: &str = "[+] User is already a member of the group.";
pub const ADDED: &str = "[+] User added to group successfully.";

pub const MISSING_CREDENTIAL: &str =
    "[-] Error: Provide either --password or --hash for authentication.";
pub const BIND_FAILED: &str = "[-] Error: Failed to bind to Active Directory server.";
pub const GROUP_NOT_FOUND: &str = "[-] Error: Group not found.";
pub const USER_NOT_FOUND: &str = "[-] Error: User not found.";
pub const ADD_FAILED: &str = "[-] Error adding user to group.";

pub fn outcome_line(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::AlreadyMember => ALREADY_MEMBER,
        Outcome::Added => ADDED,
    }
}

pub fn failure_line(err: &Error) -> String {
    match err {
        Error::MissingCredential => MISSING_CREDENTIAL.to_string(),
        Error::Connection(_) | Error::Bind(_) | Error::NotBound => BIND_FAILED.to_string(),
        Error::GroupNotFound(_) => GROUP_NOT_FOUND.to_string(),
        Error::UserNotFound(_) => USER_NOT_FOUND.to_string(),
        Error::ModifyRejected(_) | Error::Modify(_) => ADD_FAILED.to_string(),
        Error::Search(_) | Error::Other(_) => format!("[-] Error: {}.", err),
    }
}

pub fn connected() {
    println!("{}", CONNECTED);
}

pub fn success(outcome: Outcome) -> ExitCode {
    println!("{}", outcome_line(outcome));
    ExitCode::SUCCESS
}

pub fn failure(err: &Error) -> ExitCode {
    error!(kind = ?err.kind(), "{}", err);
    println!("{}", failure_line(err));
    ExitCode::FAILURE
}
