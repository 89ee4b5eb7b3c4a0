//! Node status detection
//!
//! Detects whether the node is reachable, which chain it serves and whether
//! it is still syncing.

use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::SyncStatus;
use gyro_core::Network;
use serde::{Deserialize, Serialize};

/// Maximum lag (in blocks) before considering the node as lagging
const MAX_SYNC_LAG: u64 = 10;

/// Readiness tier based on sync progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SyncTier {
    /// Synced, or within a few blocks of the head
    Synced,
    /// Syncing and behind the head by more than [`MAX_SYNC_LAG`] blocks
    Lagging,
    Offline,
}

impl SyncTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synced => "Synced",
            Self::Lagging => "Lagging",
            Self::Offline => "Offline",
        }
    }

    fn from_lag(lag: u64) -> Self {
        if lag <= MAX_SYNC_LAG {
            Self::Synced
        } else {
            Self::Lagging
        }
    }
}

/// Node status detected through probing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub is_online: bool,
    pub chain_id: Option<u64>,

    /// Known Gyro network for the chain id, if any
    pub network: Option<Network>,

    pub block_number: u64,

    /// Highest block known to the node while syncing
    pub highest_block: Option<u64>,

    pub sync_tier: SyncTier,
}

impl NodeStatus {
    fn offline() -> Self {
        Self {
            is_online: false,
            chain_id: None,
            network: None,
            block_number: 0,
            highest_block: None,
            sync_tier: SyncTier::Offline,
        }
    }

    /// Blocks between the node's head and the highest known block
    pub fn sync_lag(&self) -> Option<u64> {
        self.highest_block
            .map(|highest| highest.saturating_sub(self.block_number))
    }

    pub fn is_supported_network(&self) -> bool {
        self.network.is_some()
    }
}

/// Detect node status by probing the JSON-RPC endpoints
pub async fn detect_status(provider: &DynProvider) -> NodeStatus {
    let block_number = match provider.get_block_number().await {
        Ok(number) => number,
        Err(e) => {
            tracing::debug!(error = %e, "Node unreachable");
            return NodeStatus::offline();
        }
    };

    let chain_id = provider.get_chain_id().await.ok();
    let network = chain_id.and_then(|id| Network::from_chain_id(id).ok());

    let highest_block = match provider.syncing().await {
        Ok(SyncStatus::Info(info)) => u64::try_from(info.highest_block).ok(),
        _ => None,
    };

    let sync_tier = highest_block
        .map(|highest| SyncTier::from_lag(highest.saturating_sub(block_number)))
        .unwrap_or(SyncTier::Synced);

    NodeStatus {
        is_online: true,
        chain_id,
        network,
        block_number,
        highest_block,
        sync_tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_tier_strings() {
        assert_eq!(SyncTier::Synced.as_str(), "Synced");
        assert_eq!(SyncTier::Lagging.as_str(), "Lagging");
        assert_eq!(SyncTier::Offline.as_str(), "Offline");
    }

    #[test]
    fn test_sync_lag_calculation() {
        let status = NodeStatus {
            is_online: true,
            chain_id: Some(42),
            network: Some(Network::Kovan),
            block_number: 100,
            highest_block: Some(110),
            sync_tier: SyncTier::from_lag(10),
        };

        assert_eq!(status.sync_lag(), Some(10));
        assert_eq!(status.sync_tier, SyncTier::Synced);
        assert!(status.is_supported_network());

        let lagging = NodeStatus {
            highest_block: Some(120),
            sync_tier: SyncTier::from_lag(20),
            ..status
        };
        assert_eq!(lagging.sync_lag(), Some(20));
        assert_eq!(lagging.sync_tier, SyncTier::Lagging);
    }

    #[test]
    fn test_offline_status() {
        let status = NodeStatus::offline();
        assert!(!status.is_online);
        assert_eq!(status.sync_lag(), None);
        assert!(!status.is_supported_network());
        assert_eq!(
            serde_json::to_value(status.sync_tier).unwrap(),
            serde_json::json!("Offline")
        );
    }
}
