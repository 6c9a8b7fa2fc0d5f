//! Directory capability interface
//!
//! The membership flow needs exactly three operations from a directory
//! server: bind, search and an additive modify. Backends implement
//! [`Directory`]; tests drive the flow against an in-memory fake.

use crate::credential::Credential;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Attribute holding group membership
pub const MEMBER_ATTR: &str = "member";

/// Attribute holding an object's own distinguished name
pub const DN_ATTR: &str = "distinguishedName";

/// Directory session operations
#[async_trait]
pub trait Directory: Send {
    /// Open the session and authenticate as `principal`
    async fn bind(&mut self, principal: &str, credential: &Credential) -> Result<()>;

    /// Subtree search below `base`
    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<DirectoryEntry>>;

    /// Apply one additive change; `Ok(false)` means the server refused it
    async fn modify(&mut self, change: &MembershipChange) -> Result<bool>;
}

/// One search result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: HashMap::new(),
        }
    }

    pub fn with_attr<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    /// All values of `name`; attribute names compare case-insensitively
    pub fn values(&self, name: &str) -> &[String] {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(|s| s.as_str())
    }
}

/// Group resolved by common name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub dn: String,
    /// Member DNs in server order
    pub members: Vec<String>,
}

impl GroupRecord {
    pub fn from_entry(entry: DirectoryEntry) -> Self {
        let members = entry.values(MEMBER_ATTR).to_vec();
        Self {
            dn: entry.dn,
            members,
        }
    }

    /// Exact string comparison against the member DNs
    pub fn has_member(&self, dn: &str) -> bool {
        self.members.iter().any(|m| m == dn)
    }
}

/// User resolved by account name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub dn: String,
}

impl UserRecord {
    /// Prefer the `distinguishedName` attribute, fall back to the entry DN
    pub fn from_entry(entry: DirectoryEntry) -> Self {
        let dn = entry
            .first(DN_ATTR)
            .map(str::to_string)
            .unwrap_or(entry.dn);
        Self { dn }
    }
}

/// Additive change appending `value` to `attribute` on `dn`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub dn: String,
    pub attribute: String,
    pub value: String,
}

impl MembershipChange {
    pub fn add_member(group: &GroupRecord, user: &UserRecord) -> Self {
        Self {
            dn: group.dn.clone(),
            attribute: MEMBER_ATTR.to_string(),
            value: user.dn.clone(),
        }
    }
}

/// `(&(objectClass=group)(cn=<name>))`
pub fn group_filter(name: &str) -> String {
    format!("(&(objectClass=group)(cn={}))", escape_filter_value(name))
}

/// `(&(objectClass=user)(sAMAccountName=<name>))`
pub fn user_filter(name: &str) -> String {
    format!(
        "(&(objectClass=user)(sAMAccountName={}))",
        escape_filter_value(name)
    )
}

/// Escape a filter assertion value (RFC 4515 section 3)
pub fn escape_filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => out.push_str("\\2a"),
            '(' => out.push_str("\\28"),
            ')' => out.push_str("\\29"),
            '\\' => out.push_str("\\5c"),
            '\0' => out.push_str("\\00"),
            _ => out.push(c),
        }
    }
    out
}
