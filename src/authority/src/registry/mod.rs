//! Authority registry
//!
//! Resolves a connecting grantee to the most specific registered identity
//! and its privileges.
//!
//! # Architecture
//!
//! ```text
//! Loader ─→ init(mapping) ─→ Snapshot::build ─→ [write lock] swap Arc
//!                                                   │
//! find_user / find_privileges ─→ [read lock] clone Arc ─→ scan bucket
//! ```
//!
//! Readers hold the lock only to clone the current `Arc<Snapshot>`; the scan
//! itself runs lock-free against that generation. A concurrent `init` can
//! only replace the pointer, never touch a published snapshot.

mod loader;
mod metrics;
mod snapshot;

pub use loader::{PrivilegeLoader, StaticLoader, UserGrant};
pub use metrics::RegistryStats;
pub use snapshot::Snapshot;

use metrics::RegistryMetrics;

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::privilege::Privileges;
use crate::types::{Grantee, Identity};

/// Registry of identities and their privileges
///
/// # Example
///
/// ```rust
/// use proxy_authority::{AuthorityRegistry, Grantee, Identity};
///
/// let registry = AuthorityRegistry::new();
/// registry.init(vec![
///     (Identity::new("alice", "10.0.0.%"), "p1"),
///     (Identity::new("alice", "10.0.0.5"), "p2"),
/// ]).unwrap();
///
/// let privileges = registry.find_privileges(&Grantee::new("alice", "10.0.0.5"));
/// assert_eq!(privileges.as_deref(), Some(&"p2"));
///
/// let privileges = registry.find_privileges(&Grantee::new("alice", "10.0.0.9"));
/// assert_eq!(privileges.as_deref(), Some(&"p1"));
///
/// assert!(registry.find_user(&Grantee::new("bob", "10.0.0.5")).is_none());
/// ```
pub struct AuthorityRegistry<P = Privileges> {
    /// Currently published generation
    current: RwLock<Arc<Snapshot<P>>>,

    /// Lookup counters
    metrics: Option<RegistryMetrics>,

    /// Registry configuration
    config: RegistryConfig,
}

impl<P> AuthorityRegistry<P> {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        let metrics = if config.enable_metrics {
            Some(RegistryMetrics::default())
        } else {
            None
        };

        Self {
            current: RwLock::new(Arc::new(Snapshot::empty())),
            metrics,
            config,
        }
    }

    /// Returns the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Install a new generation
    ///
    /// The mapping is validated and indexed before the registry is touched.
    /// On a duplicate (username, host pattern) key or a malformed host
    /// pattern the call fails and the previous generation stays installed.
    ///
    /// Returns the number of the installed generation.
    pub fn init<I>(&self, mapping: I) -> Result<u64>
    where
        I: IntoIterator<Item = (Identity, P)>,
    {
        let mut snapshot = match Snapshot::build(mapping, &self.config) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, generation = self.generation(), "Rejected privilege mapping, keeping current generation");
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejected();
                }
                return Err(e);
            }
        };

        let identities = snapshot.len();
        let (generation, previous) = {
            let mut current = self.current.write();
            let generation = current.generation() + 1;
            snapshot.set_generation(generation);
            (generation, std::mem::replace(&mut *current, Arc::new(snapshot)))
        };
        // The old generation is torn down after readers are released
        drop(previous);

        if let Some(metrics) = &self.metrics {
            metrics.record_install();
        }
        info!(generation, identities, "Installed authority generation");

        Ok(generation)
    }

    /// Returns the current generation as a read-only snapshot
    ///
    /// Every query on the returned snapshot sees the same generation, even
    /// if `init` runs meanwhile.
    pub fn authentication(&self) -> Arc<Snapshot<P>> {
        Arc::clone(&self.current.read())
    }

    /// Returns the current generation number (0 before the first `init`)
    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    /// Returns every registered identity in index order
    pub fn all_users(&self) -> Vec<Identity> {
        self.authentication().identities().cloned().collect()
    }

    /// Resolves the best-matching identity for a grantee
    pub fn find_user(&self, grantee: &Grantee) -> Option<Identity> {
        self.resolve(grantee).map(|(identity, _)| identity)
    }

    /// Resolves the privileges of the best-matching identity
    pub fn find_privileges(&self, grantee: &Grantee) -> Option<Arc<P>> {
        self.resolve(grantee).map(|(_, privileges)| privileges)
    }

    /// Resolves identity and privileges from a single generation
    pub fn resolve(&self, grantee: &Grantee) -> Option<(Identity, Arc<P>)> {
        let snapshot = self.authentication();

        match snapshot.resolve(grantee, self.config.detect_ambiguity) {
            Some(resolution) => {
                if resolution.ambiguous {
                    debug!(
                        grantee = %grantee,
                        identity = %resolution.identity,
                        generation = snapshot.generation(),
                        "Ambiguous host match, equally specific patterns matched"
                    );
                }
                if let Some(metrics) = &self.metrics {
                    metrics.record_hit(resolution.ambiguous);
                }
                Some((resolution.identity.clone(), Arc::clone(resolution.privileges)))
            }
            None => {
                debug!(grantee = %grantee, generation = snapshot.generation(), "No identity matches grantee");
                if let Some(metrics) = &self.metrics {
                    metrics.record_miss();
                }
                None
            }
        }
    }

    /// Returns lookup counters (all zero when metrics are disabled)
    pub fn stats(&self) -> RegistryStats {
        self.metrics
            .as_ref()
            .map(|m| m.stats())
            .unwrap_or_default()
    }
}

impl<P: Send + Sync> AuthorityRegistry<P> {
    /// Load a new mapping and install it as the next generation
    ///
    /// A loader failure leaves the current generation in place.
    pub async fn reload(&self, loader: &dyn PrivilegeLoader<P>) -> Result<u64> {
        let mapping = loader.load().await.inspect_err(|e| {
            warn!(error = %e, "Privilege loader failed, keeping current generation");
        })?;
        self.init(mapping)
    }
}

impl<P> Default for AuthorityRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
