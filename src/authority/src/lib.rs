//! # Proxy Authority
//!
//! Grantee resolution and privilege registry for the SQL proxy.
//!
//! ## Features
//!
//! - **Host-pattern matching** with grant-table wildcards (`%`, `_`)
//! - **Deterministic precedence**: exact host, then wildcard suffix, then
//!   wildcard prefix, then any host
//! - **Atomic reloads**: each `init` publishes a fully built generation
//! - **Snapshot reads**: lookups never wait for a generation to be built
//! - **Pluggable loaders** for catalog-backed privilege sources
//!
//! ## Example
//!
//! ```rust
//! use proxy_authority::{AuthorityRegistry, Grantee, Identity, Privileges, PrivilegeType};
//!
//! let registry = AuthorityRegistry::new();
//! registry.init(vec![
//!     (Identity::any_host("root"), Privileges::all()),
//!     (
//!         Identity::new("app", "10.0.0.%"),
//!         Privileges::new().grant_database("sales", [PrivilegeType::Select]),
//!     ),
//! ])?;
//!
//! let privileges = registry
//!     .find_privileges(&Grantee::new("app", "10.0.0.12"))
//!     .expect("app connects from the 10.0.0.0/24 range");
//!
//! assert!(privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Select]));
//! # Ok::<(), proxy_authority::AuthorityError>(())
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod privilege;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use config::RegistryConfig;
pub use error::{AuthorityError, Result};
pub use host::{HostPattern, HostPatternError, Specificity};
pub use privilege::{DatabasePrivileges, PrivilegeType, Privileges, TablePrivileges};
pub use registry::{
    AuthorityRegistry, PrivilegeLoader, RegistryStats, Snapshot, StaticLoader, UserGrant,
};
pub use types::{Grantee, Identity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
