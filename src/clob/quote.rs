use serde_json::json;

use crate::clob::level2::{decode_u64_vec, reconstruct_level2, Level2Snapshot};
use crate::clob::pool::{Pool, PoolRegistry};
use crate::error::{Result, SolverError};
use crate::rpc::types::{MoveTarget, TxArg, TxPlan};
use crate::rpc::RpcClient;

/// Read-only sender used for `dev_inspect` simulations; the chain does not
/// require a funded account to execute a view function.
const SIMULATION_SENDER: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

const DEFAULT_TICKS_FROM_MID: u64 = 100;
const DEV_INSPECT_GAS_BUDGET: u64 = 10_000_000;

/// Result of walking the order book for a requested input amount.
#[derive(Debug, Clone)]
pub struct SwapQuote {
    pub input_raw: u64,
    pub output_raw: u64,
    pub mid_price: f64,
    pub best_bid: f64,
    pub best_ask: f64,
    pub price_impact_pct: f64,
    pub route: Vec<String>,
}

/// Market-sell simulation: selling `input_base` base for quote, walking
/// bids in price-descending order. Impact is measured against the *last
/// filled level*, not the first unfilled one.
pub fn simulate_market_sell(book: &Level2Snapshot, input_base: f64) -> Result<(f64, f64)> {
    if book.bids.is_empty() {
        return Err(SolverError::NoLiquidity);
    }
    if input_base <= 0.0 {
        return Ok((0.0, 0.0));
    }

    let best_bid = book.bids[0].price;
    let mut remaining = input_base;
    let mut out_quote = 0.0;
    let mut last_filled_price = best_bid;

    for level in &book.bids {
        if remaining <= 0.0 {
            break;
        }
        let consumed = remaining.min(level.quantity);
        out_quote += consumed * level.price;
        remaining -= consumed;
        last_filled_price = level.price;
    }

    let price_impact = (best_bid - last_filled_price) / best_bid;
    Ok((out_quote, price_impact))
}

/// Market-buy simulation: spending `input_quote` quote to buy base,
/// walking asks in price-ascending order.
pub fn simulate_market_buy(book: &Level2Snapshot, input_quote: f64) -> Result<(f64, f64)> {
    if book.asks.is_empty() {
        return Err(SolverError::NoLiquidity);
    }
    if input_quote <= 0.0 {
        return Ok((0.0, 0.0));
    }

    let best_ask = book.asks[0].price;
    let mut remaining = input_quote;
    let mut out_base = 0.0;
    let mut last_filled_price = best_ask;

    for level in &book.asks {
        if remaining <= 0.0 {
            break;
        }
        let buyable = (remaining / level.price).min(level.quantity);
        out_base += buyable;
        remaining -= buyable * level.price;
        last_filled_price = level.price;
    }

    let price_impact = (last_filled_price - best_ask) / best_ask;
    Ok((out_base, price_impact))
}

/// The pricing capability `Pipeline` depends on, defined abstractly so
/// tests can substitute a stub instead of a `Quoter` wrapping a live RPC
/// connection.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote(&self, input_type: &str, output_type: &str, input_raw: u64) -> Result<SwapQuote>;
    fn registry(&self) -> &PoolRegistry;
}

/// Fetches Level-2 depth and simulates market orders against it.
pub struct Quoter {
    rpc: RpcClient,
    registry: PoolRegistry,
    deepbook_package_id: String,
}

impl Quoter {
    pub fn new(rpc: RpcClient, registry: PoolRegistry, deepbook_package_id: impl Into<String>) -> Self {
        Self {
            rpc,
            registry,
            deepbook_package_id: deepbook_package_id.into(),
        }
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// Fetch and decode the live Level-2 snapshot for `pool` via
    /// `dev_inspect`.
    pub async fn level2(&self, pool: &Pool) -> Result<Level2Snapshot> {
        let plan = TxPlan {
            function: MoveTarget::new(self.deepbook_package_id.clone(), "pool", "get_level2_ticks_from_mid"),
            type_arguments: vec![pool.base_type.clone(), pool.quote_type.clone()],
            arguments: vec![
                TxArg::Object(pool.pool_id.clone()),
                TxArg::Pure(json!(DEFAULT_TICKS_FROM_MID.to_string())),
                TxArg::Object("0x6".to_string()),
            ],
            gas_budget: Some(DEV_INSPECT_GAS_BUDGET),
        };

        let tx_bytes = self.rpc.build_unsigned(&plan, SIMULATION_SENDER).await?;
        let result = self.rpc.dev_inspect(&tx_bytes, SIMULATION_SENDER).await?;

        if result.results.len() < 4 {
            return Err(SolverError::Parse(format!(
                "expected 4 return values from get_level2_ticks_from_mid, got {}",
                result.results.len()
            )));
        }

        let bid_prices = decode_u64_vec(&result.results[0].bcs_bytes)?;
        let bid_quantities = decode_u64_vec(&result.results[1].bcs_bytes)?;
        let ask_prices = decode_u64_vec(&result.results[2].bcs_bytes)?;
        let ask_quantities = decode_u64_vec(&result.results[3].bcs_bytes)?;

        reconstruct_level2(&bid_prices, &bid_quantities, &ask_prices, &ask_quantities, pool)
    }

    /// Produce a `SwapQuote` for `(input_type, output_type, input_raw)`.
    /// No fallback pricing: any RPC or liquidity failure propagates
    /// directly.
    pub async fn quote(&self, input_type: &str, output_type: &str, input_raw: u64) -> Result<SwapQuote> {
        let pool = self
            .registry
            .find_pool(input_type, output_type)
            .ok_or(SolverError::NoPool)?
            .clone();

        let book = self.level2(&pool).await?;
        let best_bid = book.best_bid().ok_or(SolverError::NoLiquidity)?;
        let best_ask = book.best_ask().ok_or(SolverError::NoLiquidity)?;
        let mid_price = book.mid_price().ok_or(SolverError::NoLiquidity)?;

        let is_sell_base = input_type == pool.base_type;
        let (input_scalar, output_scalar) = if is_sell_base {
            (pool.base_scalar, pool.quote_scalar)
        } else {
            (pool.quote_scalar, pool.base_scalar)
        };

        let input_human = input_raw as f64 / input_scalar as f64;

        let (output_human, price_impact_pct) = if is_sell_base {
            simulate_market_sell(&book, input_human)?
        } else {
            simulate_market_buy(&book, input_human)?
        };

        let output_raw = (output_human * output_scalar as f64).floor() as u64;

        Ok(SwapQuote {
            input_raw,
            output_raw,
            mid_price,
            best_bid,
            best_ask,
            price_impact_pct,
            route: vec![pool.pool_id.clone()],
        })
    }
}

#[async_trait::async_trait]
impl QuoteProvider for Quoter {
    async fn quote(&self, input_type: &str, output_type: &str, input_raw: u64) -> Result<SwapQuote> {
        Quoter::quote(self, input_type, output_type, input_raw).await
    }

    fn registry(&self) -> &PoolRegistry {
        Quoter::registry(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clob::level2::Level;

    fn single_level_book() -> Level2Snapshot {
        Level2Snapshot {
            bids: vec![Level { price: 1.80, quantity: 1000.0 }],
            asks: vec![Level { price: 1.82, quantity: 1000.0 }],
        }
    }

    #[test]
    fn zero_input_yields_zero_output_and_impact() {
        let book = single_level_book();
        let (out, impact) = simulate_market_sell(&book, 0.0).unwrap();
        assert_eq!(out, 0.0);
        assert_eq!(impact, 0.0);
    }

    #[test]
    fn single_level_sell_is_exact_up_to_rounding() {
        let book = single_level_book();
        let (out, impact) = simulate_market_sell(&book, 100.0).unwrap();
        assert!((out - 180.0).abs() < 1e-9);
        assert_eq!(impact, 0.0);
    }

    #[test]
    fn sell_impact_grows_with_size_across_levels() {
        let book = Level2Snapshot {
            bids: vec![
                Level { price: 1.80, quantity: 100.0 },
                Level { price: 1.75, quantity: 1000.0 },
            ],
            asks: vec![],
        };
        let (_, impact_small) = simulate_market_sell(&book, 50.0).unwrap();
        let (_, impact_large) = simulate_market_sell(&book, 150.0).unwrap();
        assert_eq!(impact_small, 0.0);
        assert!(impact_large > impact_small);
    }

    #[test]
    fn buy_walks_asks_and_spends_all_input() {
        let book = single_level_book();
        let (out, impact) = simulate_market_buy(&book, 182.0).unwrap();
        assert!((out - 100.0).abs() < 1e-6);
        assert_eq!(impact, 0.0);
    }

    #[test]
    fn monotonic_output_in_input_size() {
        let book = Level2Snapshot {
            bids: vec![
                Level { price: 1.80, quantity: 100.0 },
                Level { price: 1.70, quantity: 1000.0 },
            ],
            asks: vec![],
        };
        let (out_small, _) = simulate_market_sell(&book, 50.0).unwrap();
        let (out_large, _) = simulate_market_sell(&book, 200.0).unwrap();
        assert!(out_large > out_small);
    }

    #[test]
    fn no_liquidity_on_empty_side() {
        let book = Level2Snapshot::default();
        assert!(matches!(simulate_market_sell(&book, 10.0), Err(SolverError::NoLiquidity)));
        assert!(matches!(simulate_market_buy(&book, 10.0), Err(SolverError::NoLiquidity)));
    }
}
