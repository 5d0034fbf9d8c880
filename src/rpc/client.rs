use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, SolverError};
use crate::rpc::types::{
    CoinRef, DevInspectResult, EffectsStatus, EventEnvelope, ExecutionResult, ObjectSnapshot,
    ReturnValue, TxCommand, TxPlan,
};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

fn build_http_client() -> Result<Client> {
    Client::builder()
        .tcp_nodelay(true)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(10)
        .connect_timeout(CONNECTION_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(SolverError::Http)
}

/// Thin, typed wrapper over the ledger's JSON-RPC. Applies no retry of
/// its own; retrying belongs to the solver engine.
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            endpoint: endpoint.into(),
        })
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| SolverError::Transient(format!("RPC request failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::REQUEST_TIMEOUT {
            return Err(SolverError::Transient(format!("RPC HTTP {status}")));
        }
        if !status.is_success() {
            return Err(SolverError::Rpc(format!("RPC HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SolverError::Transient(format!("RPC body read failed: {e}")))?;

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| SolverError::Parse(format!("RPC response JSON error: {e}")))?;

        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_string();
            return Err(SolverError::Rpc(message));
        }

        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Read a single on-chain object, surfacing `NotFound` if absent.
    pub async fn get_object(&self, object_id: &str) -> Result<ObjectSnapshot> {
        let params = json!([
            object_id,
            { "showType": true, "showContent": true }
        ]);
        let result = self.rpc_call("sui_getObject", params).await?;

        let data = result
            .get("data")
            .ok_or_else(|| SolverError::NotFound(format!("object {object_id} not found")))?;

        let type_ = data
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let fields = data
            .get("content")
            .and_then(|c| c.get("fields"))
            .cloned()
            .unwrap_or(Value::Null);

        Ok(ObjectSnapshot {
            object_id: object_id.to_string(),
            type_,
            fields,
        })
    }

    /// List coins of `coin_type` owned by `owner`; order is RPC-native.
    pub async fn get_coins(&self, owner: &str, coin_type: &str) -> Result<Vec<CoinRef>> {
        let params = json!([owner, coin_type]);
        let result = self.rpc_call("suix_getCoins", params).await?;

        let data = result
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut coins = Vec::with_capacity(data.len());
        for coin in data {
            let coin_id = coin
                .get("coinObjectId")
                .and_then(Value::as_str)
                .ok_or_else(|| SolverError::Parse("coin missing coinObjectId".to_string()))?
                .to_string();
            let balance = coin
                .get("balance")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or_else(|| SolverError::Parse("coin missing balance".to_string()))?;
            coins.push(CoinRef { coin_id, balance });
        }
        Ok(coins)
    }

    /// Query the newest (or oldest) `limit` events of `move_event_type`.
    pub async fn query_events(
        &self,
        move_event_type: &str,
        limit: usize,
        descending: bool,
    ) -> Result<Vec<EventEnvelope>> {
        let params = json!([
            { "MoveEventType": move_event_type },
            Value::Null,
            limit,
            descending,
        ]);
        let result = self.rpc_call("suix_queryEvents", params).await?;

        let data = result
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut events = Vec::with_capacity(data.len());
        for event in data {
            let type_ = event
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let parsed_json = event.get("parsedJson").cloned().unwrap_or(Value::Null);
            let timestamp_ms = event
                .get("timestampMs")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0);
            events.push(EventEnvelope {
                type_,
                parsed_json,
                timestamp_ms,
            });
        }
        Ok(events)
    }

    /// Simulate a read-only Move call (no gas spent, no state change).
    pub async fn dev_inspect(&self, tx_bytes: &str, sender: &str) -> Result<DevInspectResult> {
        let params = json!([sender, tx_bytes, Value::Null, Value::Null]);
        let result = self.rpc_call("sui_devInspectTransactionBlock", params).await?;

        if let Some(error) = result.get("error").and_then(Value::as_str) {
            warn!("dev_inspect aborted: {error}");
            return Err(parse_move_abort(error));
        }

        let raw_results = result
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut results = Vec::new();
        for call_result in raw_results {
            let return_values = call_result
                .get("returnValues")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for rv in return_values {
                let pair = rv
                    .as_array()
                    .ok_or_else(|| SolverError::Parse("malformed returnValue".to_string()))?;
                let bytes: Vec<u8> = pair
                    .first()
                    .and_then(Value::as_array)
                    .map(|arr| arr.iter().filter_map(|b| b.as_u64()).map(|b| b as u8).collect())
                    .unwrap_or_default();
                let type_tag = pair
                    .get(1)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                results.push(ReturnValue {
                    bcs_bytes: bytes,
                    type_tag,
                });
            }
        }

        Ok(DevInspectResult { results })
    }

    /// Submit a signed transaction for execution.
    pub async fn execute_signed(&self, tx_bytes: &str, signature: &str) -> Result<ExecutionResult> {
        let params = json!([
            tx_bytes,
            [signature],
            { "showEffects": true, "showEvents": true },
            "WaitForLocalExecution",
        ]);
        let result = self.rpc_call("sui_executeTransactionBlock", params).await?;

        let digest = result
            .get("digest")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let effects = result.get("effects").cloned().unwrap_or(Value::Null);
        let status_str = effects
            .get("status")
            .and_then(|s| s.get("status"))
            .and_then(Value::as_str)
            .unwrap_or("failure");

        let effects_status = if status_str == "success" {
            EffectsStatus::Success
        } else {
            let abort_code = effects
                .get("status")
                .and_then(|s| s.get("error"))
                .and_then(Value::as_str)
                .and_then(extract_abort_code);
            let reason = effects
                .get("status")
                .and_then(|s| s.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("unknown failure")
                .to_string();
            EffectsStatus::Failure { abort_code, reason }
        };

        let gas_used = effects
            .get("gasUsed")
            .and_then(|g| g.get("computationCost"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);

        let raw_events = result
            .get("events")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut events = Vec::with_capacity(raw_events.len());
        for event in raw_events {
            events.push(EventEnvelope {
                type_: event.get("type").and_then(Value::as_str).unwrap_or_default().to_string(),
                parsed_json: event.get("parsedJson").cloned().unwrap_or(Value::Null),
                timestamp_ms: event
                    .get("timestampMs")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(0),
            });
        }

        debug!(digest = %digest, "transaction executed");

        if let EffectsStatus::Failure { abort_code, reason } = &effects_status {
            return Err(SolverError::Reverted {
                code: abort_code.unwrap_or(u64::MAX),
                reason: reason.clone(),
            });
        }

        Ok(ExecutionResult {
            digest,
            effects_status,
            gas_used,
            events,
        })
    }

    /// Build the unsigned transaction bytes for a plan (pure from the
    /// caller's perspective: the RPC node performs gas/object resolution,
    /// the client never signs).
    pub async fn build_unsigned(&self, tx_plan: &TxPlan, sender: &str) -> Result<String> {
        let params = json!({
            "sender": sender,
            "package": tx_plan.function.package,
            "module": tx_plan.function.module,
            "function": tx_plan.function.function,
            "typeArguments": tx_plan.type_arguments,
            "arguments": tx_plan.arguments.iter().map(describe_arg).collect::<Vec<_>>(),
            "gasBudget": tx_plan.gas_budget,
        });
        let result = self
            .rpc_call("unsafe_moveCall", params)
            .await?;

        result
            .get("txBytes")
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .ok_or_else(|| SolverError::Parse("build_unsigned: missing txBytes".to_string()))
    }

    /// Build unsigned transaction bytes for an ordered sequence of PTB
    /// commands (Move calls and/or coin-shaping commands) sharing one
    /// transaction. Each `MoveCall`'s own `gas_budget` is ignored; only the
    /// `gas_budget` parameter applies to the whole block.
    pub async fn build_unsigned_ptb(&self, steps: &[TxCommand], sender: &str, gas_budget: u64) -> Result<String> {
        let calls: Vec<Value> = steps.iter().map(describe_command).collect();

        let params = json!({
            "sender": sender,
            "calls": calls,
            "gasBudget": gas_budget,
        });
        let result = self.rpc_call("unsafe_batchMoveCall", params).await?;

        result
            .get("txBytes")
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .ok_or_else(|| SolverError::Parse("build_unsigned_ptb: missing txBytes".to_string()))
    }
}

fn describe_arg(arg: &crate::rpc::types::TxArg) -> Value {
    use crate::rpc::types::TxArg;
    match arg {
        TxArg::Object(id) => json!({ "Object": id }),
        TxArg::Pure(v) => json!({ "Pure": v }),
        TxArg::Result(idx) => json!({ "Result": idx }),
        TxArg::GasCoin => json!("GasCoin"),
    }
}

fn describe_command(step: &TxCommand) -> Value {
    match step {
        TxCommand::MoveCall(plan) => json!({
            "MoveCall": {
                "package": plan.function.package,
                "module": plan.function.module,
                "function": plan.function.function,
                "typeArguments": plan.type_arguments,
                "arguments": plan.arguments.iter().map(describe_arg).collect::<Vec<_>>(),
            }
        }),
        TxCommand::MergeCoins { destination, sources } => json!({
            "MergeCoins": {
                "destination": describe_arg(destination),
                "sources": sources.iter().map(describe_arg).collect::<Vec<_>>(),
            }
        }),
        TxCommand::SplitCoins { coin, amounts } => json!({
            "SplitCoins": {
                "coin": describe_arg(coin),
                "amounts": amounts.iter().map(describe_arg).collect::<Vec<_>>(),
            }
        }),
    }
}

fn extract_abort_code(error: &str) -> Option<u64> {
    // Sui error strings look like "MoveAbort(..., <code>) in ...".
    let start = error.rfind(", ")?;
    let end = error[start..].find(')')? + start;
    error[start + 2..end].trim().parse().ok()
}

fn parse_move_abort(error: &str) -> SolverError {
    match extract_abort_code(error) {
        Some(code) => SolverError::from_abort_code(code),
        None => SolverError::Rpc(error.to_string()),
    }
}
