//! LDAP backend for admember

pub mod ldap;

pub use ldap::{LdapDirectory, LdapSettings};
