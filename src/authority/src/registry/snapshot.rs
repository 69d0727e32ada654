//! Immutable registry generation
//!
//! A snapshot owns every identity of one generation, sorted by username and
//! then by host pattern precedence. Each username maps to a contiguous
//! range of that list, so resolving a grantee is a scan of one small
//! bucket.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::error::{AuthorityError, Result};
use crate::host::HostPattern;
use crate::types::{Grantee, Identity};

#[derive(Debug)]
struct Entry<P> {
    identity: Identity,
    pattern: HostPattern,
    privileges: Arc<P>,
}

/// Outcome of resolving one grantee against a snapshot
#[derive(Debug)]
pub(crate) struct Resolution<'a, P> {
    pub(crate) identity: &'a Identity,
    pub(crate) privileges: &'a Arc<P>,
    /// Another equally specific pattern matched as well
    pub(crate) ambiguous: bool,
}

/// One generation of the identity → privileges mapping
///
/// Obtained from [`AuthorityRegistry::authentication`]. Holding a snapshot
/// keeps its generation alive; later `init` calls do not affect it.
///
/// [`AuthorityRegistry::authentication`]: crate::AuthorityRegistry::authentication
#[derive(Debug)]
pub struct Snapshot<P> {
    generation: u64,
    entries: Vec<Entry<P>>,
    buckets: HashMap<String, Range<usize>>,
    /// Keyed by username and normalized pattern text
    positions: HashMap<(String, String), usize>,
    fold_case: bool,
}

impl<P> Snapshot<P> {
    /// Creates the empty generation 0
    pub(crate) fn empty() -> Self {
        Self {
            generation: 0,
            entries: Vec::new(),
            buckets: HashMap::new(),
            positions: HashMap::new(),
            fold_case: true,
        }
    }

    /// Validates a mapping and builds its index
    ///
    /// The whole mapping is rejected on the first malformed host pattern or
    /// repeated (username, host pattern) key.
    pub(crate) fn build<I>(mapping: I, config: &RegistryConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (Identity, P)>,
    {
        let mapping = mapping.into_iter();
        let mut entries = Vec::with_capacity(mapping.size_hint().0);
        let mut seen = HashSet::with_capacity(entries.capacity());
        let fold_case = config.case_insensitive_hosts;

        for (identity, privileges) in mapping {
            let pattern = HostPattern::parse(&identity.host, fold_case)?;

            if !seen.insert((identity.username.clone(), pattern.as_str().to_string())) {
                return Err(AuthorityError::DuplicateIdentity {
                    username: identity.username,
                    host: pattern.as_str().to_string(),
                });
            }

            entries.push(Entry {
                identity,
                pattern,
                privileges: Arc::new(privileges),
            });
        }

        entries.sort_by(|a, b| {
            a.identity
                .username
                .cmp(&b.identity.username)
                .then_with(|| a.pattern.precedence_cmp(&b.pattern))
        });

        let mut buckets: HashMap<String, Range<usize>> = HashMap::new();
        let mut positions = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            buckets
                .entry(entry.identity.username.clone())
                .and_modify(|range| range.end = idx + 1)
                .or_insert(idx..idx + 1);
            positions.insert(
                (entry.identity.username.clone(), entry.pattern.as_str().to_string()),
                idx,
            );
        }

        Ok(Self {
            generation: 0,
            entries,
            buckets,
            positions,
            fold_case,
        })
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Returns the generation number (0 before the first `init`)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the number of registered identities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no identity is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the privileges registered for an identity
    ///
    /// The host pattern is normalized the same way as at `init`, so with
    /// case folding on `'alice'@'DB.example.com'` finds the entry
    /// registered as `'alice'@'db.example.com'`.
    pub fn get(&self, identity: &Identity) -> Option<&Arc<P>> {
        self.position(identity)
            .map(|idx| &self.entries[idx].privileges)
    }

    /// Returns whether the identity is registered
    pub fn contains(&self, identity: &Identity) -> bool {
        self.position(identity).is_some()
    }

    fn position(&self, identity: &Identity) -> Option<usize> {
        let host = if self.fold_case {
            identity.host.to_ascii_lowercase()
        } else {
            identity.host.clone()
        };
        self.positions
            .get(&(identity.username.clone(), host))
            .copied()
    }

    /// Iterates over all identities and privileges in index order
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &Arc<P>)> {
        self.entries.iter().map(|e| (&e.identity, &e.privileges))
    }

    /// Iterates over all identities in index order
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.entries.iter().map(|e| &e.identity)
    }

    /// Resolves the best-matching identity for a grantee
    pub fn find_user(&self, grantee: &Grantee) -> Option<&Identity> {
        self.resolve(grantee, false).map(|r| r.identity)
    }

    /// Resolves the privileges of the best-matching identity
    pub fn find_privileges(&self, grantee: &Grantee) -> Option<&Arc<P>> {
        self.resolve(grantee, false).map(|r| r.privileges)
    }

    /// Scans the grantee's bucket and returns the first matching pattern
    ///
    /// With `detect_ambiguity` set, the entries that tie with the winner are
    /// also checked against the host.
    pub(crate) fn resolve(&self, grantee: &Grantee, detect_ambiguity: bool) -> Option<Resolution<'_, P>> {
        let range = self.buckets.get(&grantee.username)?.clone();
        let bucket = &self.entries[range];

        let idx = bucket.iter().position(|e| e.pattern.matches(&grantee.host))?;
        let winner = &bucket[idx];

        let ambiguous = detect_ambiguity
            && bucket[idx + 1..]
                .iter()
                .take_while(|e| e.pattern.ties_with(&winner.pattern))
                .any(|e| e.pattern.matches(&grantee.host));

        Some(Resolution {
            identity: &winner.identity,
            privileges: &winner.privileges,
            ambiguous,
        })
    }
}
