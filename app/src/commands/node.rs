//! Node commands

use evm_node_client::NodeClient;

use super::print_json;

pub async fn status(client: &NodeClient) -> anyhow::Result<()> {
    let status = client.status().await;
    tracing::info!(
        online = status.is_online,
        chain_id = ?status.chain_id,
        block = status.block_number,
        tier = status.sync_tier.as_str(),
        "Node status"
    );
    print_json(&status)
}
