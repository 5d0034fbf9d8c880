use crate::clob::pool::Pool;
use crate::error::{Result, SolverError};

/// The contract scales raw prices by this factor.
pub const FLOAT_SCALAR: u64 = 1_000_000_000;

/// One priced level: human-unit price and quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub price: f64,
    pub quantity: f64,
}

/// Bids descending by price, asks ascending; if both non-empty,
/// `bids[0].price < asks[0].price`.
#[derive(Debug, Clone, Default)]
pub struct Level2Snapshot {
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

impl Level2Snapshot {
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }

    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }
}

/// Decode a ULEB128-length-prefixed, little-endian `vector<u64>`. This is
/// exactly BCS's canonical vector encoding, so the `bcs` crate's own
/// `Vec<u64>` deserializer does the walk for us.
pub fn decode_u64_vec(bytes: &[u8]) -> Result<Vec<u64>> {
    bcs::from_bytes(bytes).map_err(|e| SolverError::Parse(format!("malformed u64 vector: {e}")))
}

/// Reconstruct a Level-2 snapshot from the four raw BCS-decoded sequences
/// returned by `get_level2_ticks_from_mid`.
///
/// `price_human = raw_price / FLOAT_SCALAR * base_scalar / quote_scalar`
/// `quantity_human = raw_quantity / base_scalar`
///
/// Entries with non-positive price or quantity are dropped.
pub fn reconstruct_level2(
    bid_prices: &[u64],
    bid_quantities: &[u64],
    ask_prices: &[u64],
    ask_quantities: &[u64],
    pool: &Pool,
) -> Result<Level2Snapshot> {
    let bids = build_levels(bid_prices, bid_quantities, pool);
    let asks = build_levels(ask_prices, ask_quantities, pool);

    if bids.is_empty() && asks.is_empty() {
        return Err(SolverError::NoLiquidity);
    }

    Ok(Level2Snapshot { bids, asks })
}

fn build_levels(prices: &[u64], quantities: &[u64], pool: &Pool) -> Vec<Level> {
    let base_scalar = pool.base_scalar as f64;
    let quote_scalar = pool.quote_scalar as f64;

    prices
        .iter()
        .zip(quantities.iter())
        .filter_map(|(&raw_price, &raw_quantity)| {
            let price = (raw_price as f64) / (FLOAT_SCALAR as f64) * base_scalar / quote_scalar;
            let quantity = (raw_quantity as f64) / base_scalar;
            if price <= 0.0 || quantity <= 0.0 {
                None
            } else {
                Some(Level { price, quantity })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn u64_vec_round_trips_through_bcs() {
        let original: Vec<u64> = vec![1, 2, 300, u64::MAX, 0];
        let encoded = bcs::to_bytes(&original).unwrap();
        let decoded = decode_u64_vec(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn drops_non_positive_levels() {
        let pool = sample_pool();
        let levels = build_levels(&[0, FLOAT_SCALAR], &[10, 0], &pool);
        assert!(levels.is_empty());
    }

    #[test]
    fn both_sides_empty_fails_with_no_liquidity() {
        let pool = sample_pool();
        let result = reconstruct_level2(&[], &[], &[], &[], &pool);
        assert!(matches!(result, Err(SolverError::NoLiquidity)));
    }
}
