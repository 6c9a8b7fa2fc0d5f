//! LDAP directory session
//!
//! Opens one connection at bind time and reuses it for the searches and
//! the modify that follow.

use crate::ldap::types::*;
use admember_core::{Credential, Directory, DirectoryEntry, Error, MembershipChange, Result};
use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapResult, Mod, Scope, SearchEntry};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// [`Directory`] backed by an `ldap3` connection
pub struct LdapDirectory {
    settings: LdapSettings,
    ldap: Option<Ldap>,
}

impl LdapDirectory {
    /// Create an unconnected session; no I/O happens until [`Directory::bind`]
    pub fn new(settings: LdapSettings) -> Self {
        Self {
            settings,
            ldap: None,
        }
    }

    pub fn settings(&self) -> &LdapSettings {
        &self.settings
    }

    /// Unbind and drop the connection, if any
    pub async fn close(&mut self) {
        if let Some(mut ldap) = self.ldap.take() {
            if let Err(e) = ldap.unbind().await {
                debug!("Unbind failed: {}", e);
            }
        }
    }

    fn session(&mut self) -> Result<&mut Ldap> {
        self.ldap.as_mut().ok_or(Error::NotBound)
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    async fn bind(&mut self, principal: &str, credential: &Credential) -> Result<()> {
        let password = bind_password(credential);
        let mut ldap = create_connection(&self.settings.server_url).await?;

        let result = ldap
            .sasl_ntlm_bind(principal, &password)
            .await
            .map_err(|e| Error::Bind(e.to_string()))?;

        if result.rc != RC_SUCCESS {
            if let Err(e) = ldap.unbind().await {
                debug!("Unbind failed: {}", e);
            }
            return Err(Error::Bind(result_detail(&result)));
        }

        info!(
            "NTLM bind succeeded for {} using {}",
            principal,
            credential.method()
        );
        self.ldap = Some(ldap);
        Ok(())
    }

    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<DirectoryEntry>> {
        let ldap = self.session()?;

        let (rs, _res) = ldap
            .search(base, Scope::Subtree, filter, attrs.to_vec())
            .await
            .map_err(|e| Error::Search(e.to_string()))?
            .success()
            .map_err(|e| Error::Search(e.to_string()))?;

        debug!("Search {} returned {} entries", filter, rs.len());

        Ok(rs
            .into_iter()
            .map(|entry| entry_from_search(SearchEntry::construct(entry)))
            .collect())
    }

    async fn modify(&mut self, change: &MembershipChange) -> Result<bool> {
        let ldap = self.session()?;

        debug!(
            "Adding {}={} on {}",
            change.attribute, change.value, change.dn
        );

        let result = ldap
            .modify(
                &change.dn,
                vec![Mod::Add(
                    change.attribute.as_str(),
                    HashSet::from([change.value.as_str()]),
                )],
            )
            .await
            .map_err(|e| Error::Modify(e.to_string()))?;

        if result.rc != RC_SUCCESS {
            warn!("Modify on {} rejected: {}", change.dn, result_detail(&result));
            return Ok(false);
        }

        Ok(true)
    }
}

/// Password handed to the NTLM binder; the LM half of a hash pair is unused
fn bind_password(credential: &Credential) -> Cow<'_, str> {
    match credential {
        Credential::Password(password) => Cow::Borrowed(password.as_str()),
        Credential::HashPair { nt, .. } => Cow::Owned(nt_hash_password(nt)),
    }
}

async fn create_connection(server_url: &str) -> Result<Ldap> {
    debug!("Connecting to LDAP server: {}", server_url);

    let (conn, ldap) = LdapConnAsync::new(server_url)
        .await
        .map_err(|e| Error::Connection(format!("{}: {}", server_url, e)))?;

    ldap3::drive!(conn);
    Ok(ldap)
}

/// Convert an `ldap3` search entry, dropping binary attributes
fn entry_from_search(entry: SearchEntry) -> DirectoryEntry {
    DirectoryEntry {
        dn: entry.dn,
        attrs: entry.attrs,
    }
}

fn result_detail(result: &LdapResult) -> String {
    if result.text.is_empty() {
        format!("{} (rc={})", describe_result_code(result.rc), result.rc)
    } else {
        format!(
            "{} (rc={}): {}",
            describe_result_code(result.rc),
            result.rc,
            result.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ldap_result(rc: u32, text: &str) -> LdapResult {
        LdapResult {
            rc,
            matched: String::new(),
            text: text.to_string(),
            refs: vec![],
            ctrls: vec![],
        }
    }

    #[test]
    fn test_password_passes_through() {
        let cred = Credential::Password("S3cret!".to_string());
        assert_eq!(bind_password(&cred), "S3cret!");
    }

    #[test]
    fn test_hash_pair_binds_with_nt_hash() {
        let nt = "31d6cfe0d16ae931b73c59d7e0c089c0";
        let with_lm = Credential::parse_hash(&format!("aad3b435b51404eeaad3b435b51404ee:{}", nt));
        let without_lm = Credential::parse_hash(nt);

        let password = bind_password(&with_lm);
        assert_eq!(password, nt_hash_password(nt));
        assert!(password.starts_with(nt));
        assert!(password.encode_utf16().count() * 2 > SSPI_CREDENTIALS_HASH_LENGTH_OFFSET);

        // LM half does not reach the binder
        assert_eq!(password, bind_password(&without_lm));
        assert!(!password.contains("aad3b435"));
    }

    #[tokio::test]
    async fn test_hash_pair_bind_reaches_the_server() {
        // Nothing listens on port 1: the hash form gets as far as connecting
        let mut dir = LdapDirectory::new(LdapSettings::new("ldap://127.0.0.1:1"));
        let err = dir
            .bind(
                "corp.local\\svc_admin",
                &Credential::parse_hash("aad3b435b51404eeaad3b435b51404ee:31d6cfe0d16ae931b73c59d7e0c089c0"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn test_search_requires_bind() {
        let mut dir = LdapDirectory::new(LdapSettings::new("ldap://corp.local:389"));
        let err = dir
            .search("dc=corp,dc=local", "(objectClass=group)", &["member"])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotBound));
    }

    #[test]
    fn test_entry_from_search() {
        let mut attrs = HashMap::new();
        attrs.insert(
            "member".to_string(),
            vec!["CN=Alice,CN=Users,DC=corp,DC=local".to_string()],
        );
        let entry = entry_from_search(SearchEntry {
            dn: "CN=Admins,CN=Users,DC=corp,DC=local".to_string(),
            attrs,
            bin_attrs: HashMap::new(),
        });

        assert_eq!(entry.dn, "CN=Admins,CN=Users,DC=corp,DC=local");
        assert_eq!(entry.first("member"), Some("CN=Alice,CN=Users,DC=corp,DC=local"));
    }

    #[test]
    fn test_result_detail() {
        assert_eq!(
            result_detail(&ldap_result(49, "")),
            "invalid credentials (rc=49)"
        );
        assert_eq!(
            result_detail(&ldap_result(50, "00002098: SecErr")),
            "insufficient access rights (rc=50): 00002098: SecErr"
        );
    }
}
