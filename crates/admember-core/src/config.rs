//! Run configuration for admember
//!
//! Built once at startup from the command line and handed by reference to
//! each stage of the membership flow.

use crate::credential::Credential;

/// Default LDAP port used when the server reference is derived from the domain
pub const DEFAULT_LDAP_PORT: u16 = 389;

#[derive(Debug, Clone)]
pub struct MemberConfig {
    /// Directory domain, dotted form (e.g. `corp.local`)
    pub domain: String,

    /// Common name of the group to extend
    pub group: String,

    /// Account name of the user to add
    pub target_user: String,

    /// Account name used to bind
    pub admin_user: String,

    /// Secret for `admin_user`
    pub credential: Credential,
}

impl MemberConfig {
    /// Names are passed through as given; no syntax checks are applied.
    pub fn new(
        domain: impl Into<String>,
        group: impl Into<String>,
        target_user: impl Into<String>,
        admin_user: impl Into<String>,
        credential: Credential,
    ) -> Self {
        Self {
            domain: domain.into(),
            group: group.into(),
            target_user: target_user.into(),
            admin_user: admin_user.into(),
            credential,
        }
    }

    /// Naming context derived from the domain: `corp.local` -> `dc=corp,dc=local`
    pub fn search_base(&self) -> String {
        search_base_for(&self.domain)
    }

    /// Domain-qualified bind name: `DOMAIN\user`
    pub fn bind_principal(&self) -> String {
        format!("{}\\{}", self.domain, self.admin_user)
    }
}

/// The domain name doubles as the directory server host
pub fn server_url_for(domain: &str) -> String {
    format!("ldap://{}:{}", domain, DEFAULT_LDAP_PORT)
}

/// Map each DNS label to a `dc=` component.
///
/// Purely syntactic; the directory's naming context is assumed to mirror the
/// DNS domain.
pub fn search_base_for(domain: &str) -> String {
    format!("dc={}", domain.split('.').collect::<Vec<_>>().join(",dc="))
}
