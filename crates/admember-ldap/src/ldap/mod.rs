//! LDAP/Active Directory access
//!
//! Implements [`admember_core::Directory`] on top of `ldap3`:
//! - NTLM bind with a domain-qualified account
//! - Subtree searches
//! - Additive attribute modification

mod client;
mod types;

pub use client::LdapDirectory;
pub use types::*;
