use serde_json::json;

use crate::rpc::types::{MoveTarget, TxArg, TxPlan};

/// Shared-object id of the system clock on the underlying ledger.
const CLOCK_OBJECT_ID: &str = "0x6";

const MODULE: &str = "intent";
const DEFAULT_GAS_BUDGET: u64 = 50_000_000;

/// Pure transaction-plan builder for the intent registry. None
/// of these perform RPC calls; they only describe a Move call for
/// `RpcClient::build_unsigned` or the engine's PTB assembly to consume.
pub struct TxBuilder {
    package_id: String,
    protocol_config_id: String,
}

impl TxBuilder {
    pub fn new(package_id: impl Into<String>, protocol_config_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            protocol_config_id: protocol_config_id.into(),
        }
    }

    fn target(&self, function: &str) -> MoveTarget {
        MoveTarget::new(self.package_id.clone(), MODULE, function)
    }

    /// `deadline_delta_ms` is a duration; the contract adds `now` itself.
    pub fn plan_create(
        &self,
        input_coin_ref: &str,
        input_type: &str,
        output_type: &str,
        min_output_raw: u64,
        deadline_delta_ms: u64,
    ) -> TxPlan {
        TxPlan {
            function: self.target("create_intent"),
            type_arguments: vec![input_type.to_string(), output_type.to_string()],
            arguments: vec![
                TxArg::Object(input_coin_ref.to_string()),
                TxArg::Pure(json!(min_output_raw.to_string())),
                TxArg::Pure(json!(deadline_delta_ms.to_string())),
                TxArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
            gas_budget: Some(DEFAULT_GAS_BUDGET),
        }
    }

    /// Returns the input-asset `Balance` as a transaction result so the
    /// caller can thread it into a subsequent PTB call. `output_coin_arg`
    /// is a `TxArg` rather than a bare object id so the caller can pass
    /// either a coin already owned by the solver (`TxArg::Object`) or the
    /// result of an in-PTB split (`TxArg::Result`).
    pub fn plan_execute(
        &self,
        intent_id: &str,
        output_coin_arg: TxArg,
        in_type: &str,
        out_type: &str,
    ) -> TxPlan {
        TxPlan {
            function: self.target("execute_intent"),
            type_arguments: vec![in_type.to_string(), out_type.to_string()],
            arguments: vec![
                TxArg::Object(intent_id.to_string()),
                output_coin_arg,
                TxArg::Object(self.protocol_config_id.clone()),
                TxArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
            gas_budget: Some(DEFAULT_GAS_BUDGET),
        }
    }

    /// Owner-only; returns the input balance.
    pub fn plan_cancel(&self, intent_id: &str, in_type: &str, out_type: &str) -> TxPlan {
        TxPlan {
            function: self.target("cancel_intent"),
            type_arguments: vec![in_type.to_string(), out_type.to_string()],
            arguments: vec![TxArg::Object(intent_id.to_string())],
            gas_budget: Some(DEFAULT_GAS_BUDGET),
        }
    }

    /// Callable by anyone after `deadline`.
    pub fn plan_cleanup_expired(&self, intent_id: &str, in_type: &str, out_type: &str) -> TxPlan {
        TxPlan {
            function: self.target("cleanup_expired"),
            type_arguments: vec![in_type.to_string(), out_type.to_string()],
            arguments: vec![
                TxArg::Object(intent_id.to_string()),
                TxArg::Object(CLOCK_OBJECT_ID.to_string()),
            ],
            gas_budget: Some(DEFAULT_GAS_BUDGET),
        }
    }

    /// Terminal-only; fails on-chain with `InvalidStatus`/`IntentNotTerminal`
    /// otherwise.
    pub fn plan_destroy(&self, intent_id: &str, in_type: &str, out_type: &str) -> TxPlan {
        TxPlan {
            function: self.target("destroy_intent"),
            type_arguments: vec![in_type.to_string(), out_type.to_string()],
            arguments: vec![TxArg::Object(intent_id.to_string())],
            gas_budget: Some(DEFAULT_GAS_BUDGET),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_create_carries_both_type_arguments() {
        let builder = TxBuilder::new("0xpkg", "0xcfg");
        let plan = builder.plan_create("0xcoin", "0x2::sui::SUI", "0x2::usdc::USDC", 1_800_000, 3_600_000);
        assert_eq!(plan.type_arguments, vec!["0x2::sui::SUI", "0x2::usdc::USDC"]);
        assert_eq!(plan.function.function, "create_intent");
        assert_eq!(plan.arguments.len(), 4);
    }

    #[test]
    fn plan_execute_references_the_protocol_config() {
        let builder = TxBuilder::new("0xpkg", "0xcfg");
        let plan = builder.plan_execute(
            "0xintent",
            TxArg::Object("0xcoin".to_string()),
            "0x2::sui::SUI",
            "0x2::usdc::USDC",
        );
        match &plan.arguments[2] {
            TxArg::Object(id) => assert_eq!(id, "0xcfg"),
            other => panic!("expected config object arg, got {other:?}"),
        }
    }

    #[test]
    fn plan_execute_accepts_a_ptb_result_as_output_coin() {
        let builder = TxBuilder::new("0xpkg", "0xcfg");
        let plan = builder.plan_execute("0xintent", TxArg::Result(1), "0x2::sui::SUI", "0x2::usdc::USDC");
        match &plan.arguments[1] {
            TxArg::Result(idx) => assert_eq!(*idx, 1),
            other => panic!("expected a result reference, got {other:?}"),
        }
    }
}
