//! Privilege loader seam
//!
//! The proxy's catalog layer implements [`PrivilegeLoader`]; the registry
//! only consumes the already materialized mapping.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AuthorityError, Result};
use crate::types::Identity;

/// Source of identity → privileges mappings
#[async_trait]
pub trait PrivilegeLoader<P>: Send + Sync {
    /// Load the full mapping for a new generation
    async fn load(&self) -> Result<Vec<(Identity, P)>>;
}

/// One user grant in serialized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGrant<P> {
    /// Username and host pattern
    #[serde(flatten)]
    pub identity: Identity,

    /// Privileges of the identity
    pub privileges: P,
}

/// In-memory loader
pub struct StaticLoader<P> {
    grants: Arc<RwLock<Vec<(Identity, P)>>>,
}

impl<P> StaticLoader<P> {
    /// Create a loader returning the given mapping
    pub fn new(grants: Vec<(Identity, P)>) -> Self {
        Self {
            grants: Arc::new(RwLock::new(grants)),
        }
    }

    /// Replace the mapping returned by later loads
    pub async fn set(&self, grants: Vec<(Identity, P)>) {
        let mut current = self.grants.write().await;
        *current = grants;
    }
}

impl<P: DeserializeOwned> StaticLoader<P> {
    /// Create a loader from a JSON array of user grants
    pub fn from_json(json: &str) -> Result<Self> {
        let grants: Vec<UserGrant<P>> = serde_json::from_str(json)
            .map_err(|e| AuthorityError::Loader(format!("invalid grant list: {}", e)))?;

        Ok(Self::new(
            grants
                .into_iter()
                .map(|g| (g.identity, g.privileges))
                .collect(),
        ))
    }
}

#[async_trait]
impl<P: Clone + Send + Sync> PrivilegeLoader<P> for StaticLoader<P> {
    async fn load(&self) -> Result<Vec<(Identity, P)>> {
        let grants = self.grants.read().await;
        Ok(grants.clone())
    }
}
