use crate::error::Result;
use crate::registry::parse::{parse_config, parse_event, parse_intent};
use crate::registry::types::{Intent, IntentEvent, ProtocolConfig};
use crate::rpc::RpcClient;

/// Read and parse a single intent object by id.
pub async fn fetch_intent(rpc: &RpcClient, intent_id: &str) -> Result<Intent> {
    let snapshot = rpc.get_object(intent_id).await?;
    parse_intent(&snapshot)
}

/// Read and parse the protocol config object.
pub async fn fetch_config(rpc: &RpcClient, protocol_config_id: &str) -> Result<ProtocolConfig> {
    let snapshot = rpc.get_object(protocol_config_id).await?;
    parse_config(&snapshot)
}

/// Query the newest `limit` `IntentCreated` events for a package and parse
/// them into typed records, skipping any envelope that fails to parse
/// (malformed events are logged by the caller and dropped, never fatal).
pub async fn fetch_created_events(
    rpc: &RpcClient,
    package_id: &str,
    limit: usize,
) -> Result<Vec<IntentEvent>> {
    let move_event_type = format!("{package_id}::intent::IntentCreated");
    let envelopes = rpc.query_events(&move_event_type, limit, true).await?;
    Ok(envelopes.iter().filter_map(|e| parse_event(e).ok()).collect())
}

/// Query the newest `limit` `IntentExecuted` events.
pub async fn fetch_executed_events(
    rpc: &RpcClient,
    package_id: &str,
    limit: usize,
) -> Result<Vec<IntentEvent>> {
    let move_event_type = format!("{package_id}::intent::IntentExecuted");
    let envelopes = rpc.query_events(&move_event_type, limit, true).await?;
    Ok(envelopes.iter().filter_map(|e| parse_event(e).ok()).collect())
}
