//! Core identity types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::host::ANY_HOST;

/// A registered user identity: username plus host pattern
///
/// Identities are the keys of a registry generation. The host is kept as
/// written by the loader; the registry compiles it when a generation is
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    /// Username (compared exactly)
    pub username: String,

    /// Host pattern (e.g., "10.0.0.%", "%.example.com", "%")
    pub host: String,
}

impl Identity {
    /// Create a new identity
    pub fn new(username: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            host: host.into(),
        }
    }

    /// Create an identity that accepts connections from any host
    pub fn any_host(username: impl Into<String>) -> Self {
        Self::new(username, ANY_HOST)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'@'{}'", self.username, self.host)
    }
}

/// A connecting user: username plus the actual client host
///
/// Presented by the connection layer for every lookup and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grantee {
    /// Username presented by the client
    pub username: String,

    /// Actual client host or address, never a pattern
    pub host: String,
}

impl Grantee {
    /// Create a new grantee
    pub fn new(username: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            host: host.into(),
        }
    }
}

impl fmt::Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'@'{}'", self.username, self.host)
    }
}
