// Handle shared by every model instance
use std::sync::Arc;

use crate::api::{ClientConfig, HttpTeamSupportService, TeamSupportService};
use crate::error::Result;
use crate::lookup::LookupCache;

/// Cheap-to-clone handle holding the transport and the lookup cache.
///
/// Clones share the same [`LookupCache`], so resolved reference values are
/// reused by every ticket created through any of them.
#[derive(Clone)]
pub struct TeamSupportClient {
    service: Arc<dyn TeamSupportService>,
    lookups: Arc<LookupCache>,
}

impl TeamSupportClient {
    pub fn new(service: Arc<dyn TeamSupportService>) -> Self {
        Self::with_lookups(service, Arc::new(LookupCache::new()))
    }

    pub fn with_lookups(service: Arc<dyn TeamSupportService>, lookups: Arc<LookupCache>) -> Self {
        Self { service, lookups }
    }

    // HTTP transport built from `config`
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTeamSupportService::new(config)?)))
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn service(&self) -> &dyn TeamSupportService {
        self.service.as_ref()
    }

    pub fn lookups(&self) -> &LookupCache {
        &self.lookups
    }
}

impl std::fmt::Debug for TeamSupportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamSupportClient")
            .field("lookups", &self.lookups)
            .finish_non_exhaustive()
    }
}
