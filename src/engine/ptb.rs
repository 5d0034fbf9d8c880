use serde_json::json;

use crate::clob::Pool;
use crate::error::{Result, SolverError};
use crate::registry::{Intent, TxBuilder};
use crate::rpc::types::{CoinRef, MoveTarget, TxArg, TxCommand, TxPlan};
use crate::rpc::RpcClient;

/// Output buffer over `min_output_amount` kept from solver inventory so the
/// execute call never starves on dust rounding.
const OUTPUT_BUFFER_BPS: u64 = 500;

/// Select coins from `coins` (already sorted by the caller's preferred
/// order) whose combined balance covers `target`, returning the subset and
/// its total. Fails with `InsufficientBalance` if the full set is not
/// enough.
pub fn select_coins(coins: &[CoinRef], target: u64) -> Result<(Vec<CoinRef>, u64)> {
    let mut selected = Vec::new();
    let mut total = 0u64;
    for coin in coins {
        if total >= target {
            break;
        }
        selected.push(coin.clone());
        total += coin.balance;
    }
    if total < target {
        return Err(SolverError::InsufficientBalance(format!(
            "need {target}, have {total} across {} coins",
            coins.len()
        )));
    }
    Ok((selected, total))
}

/// Required output-asset balance including the rounding buffer.
pub fn required_output_with_buffer(min_output_amount: u64) -> u64 {
    min_output_amount + (min_output_amount * OUTPUT_BUFFER_BPS / 10_000)
}

/// Assembles the atomic settlement PTB for a profitable intent:
/// merge+split output coin, execute_intent, convert the returned balance to
/// a coin, reverse-swap it on the CLOB, transfer everything to the solver.
pub struct PtbAssembler<'a> {
    tx_builder: &'a TxBuilder,
    deepbook_package_id: &'a str,
}

impl<'a> PtbAssembler<'a> {
    pub fn new(tx_builder: &'a TxBuilder, deepbook_package_id: &'a str) -> Self {
        Self {
            tx_builder,
            deepbook_package_id,
        }
    }

    /// Build the ordered command sequence. `output_coins` must already be
    /// validated non-empty and sufficient by the caller (coin selection
    /// happens before this assembly step). When more than one coin was
    /// selected they are merged into the first before splitting out
    /// exactly `intent.min_output_amount` to pay; the leftover stays in the
    /// merged coin, owned by the solver. `fee_coin_ref` must likewise
    /// already be validated present.
    pub fn build(
        &self,
        intent: &Intent,
        pool: &Pool,
        output_coins: &[CoinRef],
        fee_coin_ref: &str,
        solver_address: &str,
    ) -> Vec<TxCommand> {
        let mut steps: Vec<TxCommand> = Vec::new();

        let primary = output_coins
            .first()
            .expect("output_coins validated non-empty by the caller")
            .coin_id
            .clone();

        if output_coins.len() > 1 {
            steps.push(TxCommand::MergeCoins {
                destination: TxArg::Object(primary.clone()),
                sources: output_coins[1..].iter().map(|c| TxArg::Object(c.coin_id.clone())).collect(),
            });
        }

        let split_idx = steps.len();
        steps.push(TxCommand::SplitCoins {
            coin: TxArg::Object(primary),
            amounts: vec![TxArg::Pure(json!(intent.min_output_amount.to_string()))],
        });

        let execute_idx = steps.len();
        steps.push(TxCommand::MoveCall(self.tx_builder.plan_execute(
            &intent.intent_id,
            TxArg::Result(split_idx),
            &intent.input_type,
            &intent.output_type,
        )));

        let is_sell_base = intent.input_type == pool.base_type;
        let swap_function = if is_sell_base {
            "swap_exact_base_for_quote"
        } else {
            "swap_exact_quote_for_base"
        };

        let swap_idx = steps.len();
        steps.push(TxCommand::MoveCall(TxPlan {
            function: MoveTarget::new(self.deepbook_package_id.to_string(), "pool", swap_function),
            type_arguments: vec![pool.base_type.clone(), pool.quote_type.clone()],
            arguments: vec![
                TxArg::Object(pool.pool_id.to_string()),
                TxArg::Result(execute_idx),
                TxArg::Object(fee_coin_ref.to_string()),
                TxArg::Pure(json!("0")),
                TxArg::Object("0x6".to_string()),
            ],
            gas_budget: None,
        }));

        steps.push(TxCommand::MoveCall(TxPlan {
            function: MoveTarget::new("0x2", "transfer", "public_transfer"),
            type_arguments: vec![],
            arguments: vec![TxArg::Result(swap_idx), TxArg::Pure(json!(solver_address))],
            gas_budget: None,
        }));

        steps
    }
}

/// Thin wrapper over coin discovery for the solver's own inventory.
pub struct InventoryClient<'a> {
    rpc: &'a RpcClient,
    solver_address: &'a str,
}

impl<'a> InventoryClient<'a> {
    pub fn new(rpc: &'a RpcClient, solver_address: &'a str) -> Self {
        Self { rpc, solver_address }
    }

    /// Coins of `coin_type` held by the solver, selected to cover
    /// `min_output_amount` plus the rounding buffer.
    pub async fn select_output_coins(&self, coin_type: &str, min_output_amount: u64) -> Result<(Vec<CoinRef>, u64)> {
        let coins = self.rpc.get_coins(self.solver_address, coin_type).await?;
        let target = required_output_with_buffer(min_output_amount);
        select_coins(&coins, target)
    }

    /// A single DEEP fee coin required by every CLOB swap call.
    pub async fn fee_coin(&self, deep_coin_type: &str) -> Result<CoinRef> {
        let coins = self.rpc.get_coins(self.solver_address, deep_coin_type).await?;
        coins.into_iter().next().ok_or(SolverError::NoFeeCoin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, balance: u64) -> CoinRef {
        CoinRef {
            coin_id: id.to_string(),
            balance,
        }
    }

    #[test]
    fn buffer_adds_five_percent() {
        assert_eq!(required_output_with_buffer(2_000_000), 2_100_000);
    }

    #[test]
    fn selects_minimum_coins_covering_target() {
        let coins = vec![coin("c1", 500_000), coin("c2", 2_000_000), coin("c3", 100_000)];
        let (selected, total) = select_coins(&coins, 2_100_000).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(total, 2_500_000);
    }

    #[test]
    fn insufficient_coins_error_out() {
        let coins = vec![coin("c1", 500_000)];
        assert!(matches!(select_coins(&coins, 1_000_000), Err(SolverError::InsufficientBalance(_))));
    }

    fn sample_intent() -> Intent {
        Intent {
            intent_id: "0xintent".to_string(),
            owner: "0xowner".to_string(),
            input_type: "0x2::sui::SUI".to_string(),
            output_type: "0x2::usdc::USDC".to_string(),
            input_balance: 1_000_000_000,
            min_output_amount: 1_800_000,
            deadline: u64::MAX,
            status: crate::registry::IntentStatus::Open,
            solver: None,
        }
    }

    fn sample_pool() -> Pool {
        Pool {
            pool_id: "0xpool".to_string(),
            base_type: "0x2::sui::SUI".to_string(),
            quote_type: "0x2::usdc::USDC".to_string(),
            base_scalar: 1_000_000_000,
            quote_scalar: 1_000_000,
            tick_size: 1_000,
            lot_size: 1_000,
        }
    }

    #[test]
    fn single_output_coin_splits_without_merging() {
        let tx_builder = TxBuilder::new("0xpkg", "0xcfg");
        let assembler = PtbAssembler::new(&tx_builder, "0xdeepbook");
        let intent = sample_intent();
        let pool = sample_pool();
        let output_coins = vec![coin("0xbig", 5_000_000)];

        let steps = assembler.build(&intent, &pool, &output_coins, "0xfee", "0xsolver");

        assert_eq!(steps.len(), 4);
        match &steps[0] {
            TxCommand::SplitCoins { coin, amounts } => {
                assert!(matches!(coin, TxArg::Object(id) if id == "0xbig"));
                assert_eq!(amounts.len(), 1);
            }
            other => panic!("expected SplitCoins as the first command, got {other:?}"),
        }
        match &steps[1] {
            TxCommand::MoveCall(plan) => {
                assert_eq!(plan.function.function, "execute_intent");
                assert!(matches!(plan.arguments[1], TxArg::Result(0)));
            }
            other => panic!("expected execute_intent MoveCall, got {other:?}"),
        }
    }

    #[test]
    fn multiple_output_coins_merge_before_splitting() {
        let tx_builder = TxBuilder::new("0xpkg", "0xcfg");
        let assembler = PtbAssembler::new(&tx_builder, "0xdeepbook");
        let intent = sample_intent();
        let pool = sample_pool();
        let output_coins = vec![coin("0xc1", 1_000_000), coin("0xc2", 1_000_000)];

        let steps = assembler.build(&intent, &pool, &output_coins, "0xfee", "0xsolver");

        assert_eq!(steps.len(), 5);
        match &steps[0] {
            TxCommand::MergeCoins { destination, sources } => {
                assert!(matches!(destination, TxArg::Object(id) if id == "0xc1"));
                assert_eq!(sources.len(), 1);
                assert!(matches!(&sources[0], TxArg::Object(id) if id == "0xc2"));
            }
            other => panic!("expected MergeCoins as the first command, got {other:?}"),
        }
        match &steps[1] {
            TxCommand::SplitCoins { coin, .. } => {
                assert!(matches!(coin, TxArg::Object(id) if id == "0xc1"));
            }
            other => panic!("expected SplitCoins as the second command, got {other:?}"),
        }
        match &steps[2] {
            TxCommand::MoveCall(plan) => {
                assert_eq!(plan.function.function, "execute_intent");
                assert!(matches!(plan.arguments[1], TxArg::Result(1)));
            }
            other => panic!("expected execute_intent MoveCall, got {other:?}"),
        }
    }
}
