//! LDAP connection settings and result codes

use admember_core::config::server_url_for;

/// Result code: operation succeeded
pub const RC_SUCCESS: u32 = 0;

/// Result code: insufficient access rights
pub const RC_INSUFFICIENT_ACCESS: u32 = 50;

/// Result code: invalid credentials
pub const RC_INVALID_CREDENTIALS: u32 = 49;

/// Result code: constraint violation
pub const RC_CONSTRAINT_VIOLATION: u32 = 19;

/// Result code: attribute or value exists
pub const RC_ATTRIBUTE_OR_VALUE_EXISTS: u32 = 20;

/// sspi reads a password longer than this many UTF-16 bytes as a hex NT hash
pub const SSPI_CREDENTIALS_HASH_LENGTH_OFFSET: usize = 512;

/// NT hash length in hex digits
pub const NT_HASH_HEX_LEN: usize = 32;

/// Where to reach the directory server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapSettings {
    /// LDAP server URL (ldap:// or ldaps://)
    /// Example: "ldap://corp.local:389"
    pub server_url: String,
}

impl LdapSettings {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }

    /// Plain LDAP on the domain name itself
    pub fn for_domain(domain: &str) -> Self {
        Self::new(server_url_for(domain))
    }
}

/// Wrap a hex NT hash into the password form sspi's NTLM uses as the hash
/// itself: lowercase hex first, NUL padded past the length offset.
pub fn nt_hash_password(nt: &str) -> String {
    let mut password = nt.to_ascii_lowercase();
    let target = SSPI_CREDENTIALS_HASH_LENGTH_OFFSET / 2 + NT_HASH_HEX_LEN;
    let units = password.encode_utf16().count();
    password.extend(std::iter::repeat('\0').take(target.saturating_sub(units)));
    password
}

/// Human-readable name for the result codes this tool runs into
pub fn describe_result_code(rc: u32) -> &'static str {
    match rc {
        RC_SUCCESS => "success",
        RC_CONSTRAINT_VIOLATION => "constraint violation",
        RC_ATTRIBUTE_OR_VALUE_EXISTS => "attribute or value exists",
        RC_INVALID_CREDENTIALS => "invalid credentials",
        RC_INSUFFICIENT_ACCESS => "insufficient access rights",
        _ => "directory error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_for_domain() {
        let settings = LdapSettings::for_domain("corp.local");
        assert_eq!(settings.server_url, "ldap://corp.local:389");

        let settings = LdapSettings::for_domain("eu.corp.example.com");
        assert_eq!(settings.server_url, "ldap://eu.corp.example.com:389");
    }

    #[test]
    fn test_nt_hash_password_layout() {
        let password = nt_hash_password("31D6CFE0D16AE931B73C59D7E0C089C0");
        let utf16_bytes = password.encode_utf16().count() * 2;

        assert!(utf16_bytes > SSPI_CREDENTIALS_HASH_LENGTH_OFFSET);
        assert_eq!(utf16_bytes, SSPI_CREDENTIALS_HASH_LENGTH_OFFSET + NT_HASH_HEX_LEN * 2);
        assert!(password.starts_with("31d6cfe0d16ae931b73c59d7e0c089c0"));
        assert!(password[NT_HASH_HEX_LEN..].chars().all(|c| c == '\0'));
    }

    #[test]
    fn test_describe_result_code() {
        assert_eq!(describe_result_code(49), "invalid credentials");
        assert_eq!(describe_result_code(50), "insufficient access rights");
        assert_eq!(describe_result_code(80), "directory error");
    }
}
