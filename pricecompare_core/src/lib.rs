// src/lib.rs
pub mod aggregate;
pub mod error;
pub mod filters;
pub mod mcp_server;
pub mod model;
pub mod platforms;
pub mod toon;
pub mod transport;

use std::sync::Arc;

// Re-export types from rmcp that users of the library might need
pub use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeRequestParam,
    InitializeResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion, RawContent,
    ServerCapabilities, TextContent, Tool,
};

use crate::error::PlatformError;
use crate::model::{Listing, SearchParams, SourceId};
use async_trait::async_trait;

/// One shopping platform adapter.
///
/// Adapters only retrieve: given the query parameters they return candidate
/// listings or a source-local error. `max_results` and the price bounds in
/// the params are fetch hints — adapters may push them server-side, but the
/// aggregation engine re-applies every filter locally and never relies on
/// adapter-side filtering being correct or exhaustive.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Registered identifier of this platform.
    fn id(&self) -> SourceId;

    /// Returns a description of the platform.
    fn description(&self) -> &'static str;

    /// True for platforms that deal exclusively in auction bids; these are
    /// skipped by the fan-out unless the caller opts into bids.
    fn auction_only(&self) -> bool {
        false
    }

    /// Retrieve candidate listings for a query from this platform.
    async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, PlatformError>;
}

/// Ordered, process-lifetime set of platform adapters.
///
/// Built once at startup and passed by reference into the engine; order of
/// registration is the ranking tie-break order, so it is a `Vec`, not a map.
pub struct PlatformRegistry {
    platforms: Vec<Arc<dyn Platform>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        PlatformRegistry {
            platforms: Vec::new(),
        }
    }

    /// Register a platform. Re-registering an id replaces the previous
    /// adapter in place, keeping its position in the order.
    pub fn register(&mut self, platform: Arc<dyn Platform>) {
        if let Some(slot) = self.platforms.iter_mut().find(|p| p.id() == platform.id()) {
            *slot = platform;
        } else {
            self.platforms.push(platform);
        }
    }

    pub fn get(&self, id: SourceId) -> Option<Arc<dyn Platform>> {
        self.platforms.iter().find(|p| p.id() == id).cloned()
    }

    /// Registered platforms in registration order.
    pub fn platforms(&self) -> &[Arc<dyn Platform>] {
        &self.platforms
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn list_platforms(&self) -> Vec<PlatformInfo> {
        self.platforms
            .iter()
            .map(|p| PlatformInfo {
                id: p.id(),
                description: p.description().to_string(),
            })
            .collect()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a registry that registers only platforms enabled via Cargo features.
/// Registration order follows `SourceId::ALL`, which fixes the ranking
/// tie-break across builds.
pub fn build_registry_enabled_only() -> PlatformRegistry {
    #[allow(unused_mut)]
    let mut registry = PlatformRegistry::new();

    #[cfg(feature = "pchome")]
    {
        if let Ok(platform) = platforms::pchome::PchomePlatform::new() {
            registry.register(Arc::new(platform));
        }
    }

    #[cfg(feature = "momo")]
    {
        if let Ok(platform) = platforms::momo::MomoPlatform::new() {
            registry.register(Arc::new(platform));
        }
    }

    #[cfg(feature = "coupang")]
    {
        if let Ok(platform) = platforms::coupang::CoupangPlatform::new() {
            registry.register(Arc::new(platform));
        }
    }

    #[cfg(feature = "etmall")]
    {
        if let Ok(platform) = platforms::etmall::EtmallPlatform::new() {
            registry.register(Arc::new(platform));
        }
    }

    #[cfg(feature = "rakuten")]
    {
        if let Ok(platform) = platforms::rakuten::RakutenPlatform::new() {
            registry.register(Arc::new(platform));
        }
    }

    #[cfg(feature = "yahoo-shopping")]
    {
        if let Ok(platform) = platforms::yahoo_shopping::YahooShoppingPlatform::new() {
            registry.register(Arc::new(platform));
        }
    }

    #[cfg(feature = "yahoo-auction")]
    {
        if let Ok(platform) = platforms::yahoo_auction::YahooAuctionPlatform::new() {
            registry.register(Arc::new(platform));
        }
    }

    registry
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlatformInfo {
    pub id: SourceId,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy(SourceId);

    #[async_trait]
    impl Platform for Dummy {
        fn id(&self) -> SourceId {
            self.0
        }
        fn description(&self) -> &'static str {
            "dummy"
        }
        async fn search(&self, _params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn registry_keeps_registration_order() {
        let mut registry = PlatformRegistry::new();
        registry.register(Arc::new(Dummy(SourceId::Momo)));
        registry.register(Arc::new(Dummy(SourceId::Pchome)));

        let ids: Vec<SourceId> = registry.platforms().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![SourceId::Momo, SourceId::Pchome]);
        assert!(registry.get(SourceId::Pchome).is_some());
        assert!(registry.get(SourceId::Rakuten).is_none());
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut registry = PlatformRegistry::new();
        registry.register(Arc::new(Dummy(SourceId::Momo)));
        registry.register(Arc::new(Dummy(SourceId::Pchome)));
        registry.register(Arc::new(Dummy(SourceId::Momo)));

        assert_eq!(registry.len(), 2);
        let ids: Vec<SourceId> = registry.platforms().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![SourceId::Momo, SourceId::Pchome]);
    }
}
