use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Result, SolverError};
use crate::registry::split_type_params;
use crate::rpc::types::ObjectSnapshot;
use crate::rpc::RpcClient;

/// Decimal-to-raw scalars, tick/lot sizing for a CLOB pool.
#[derive(Debug, Clone)]
pub struct Pool {
    pub pool_id: String,
    pub base_type: String,
    pub quote_type: String,
    pub base_scalar: u64,
    pub quote_scalar: u64,
    pub tick_size: u64,
    pub lot_size: u64,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// In-memory pool registry, populated once at startup then read-only.
/// Keyed by the unordered `{base_type, quote_type}` pair.
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: HashMap<(String, String), Pool>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pool; errors if another pool already claims this pair
    /// (registry keys are unique).
    pub fn insert(&mut self, pool: Pool) -> Result<()> {
        let key = pair_key(&pool.base_type, &pool.quote_type);
        if self.pools.contains_key(&key) {
            return Err(SolverError::InvalidArgument(format!(
                "duplicate pool registered for pair ({}, {})",
                key.0, key.1
            )));
        }
        self.pools.insert(key, pool);
        Ok(())
    }

    /// Returns the unique registered pool whose `{base_type, quote_type}`
    /// equals `{a, b}`. No auto-routing across multiple pools.
    pub fn find_pool(&self, a: &str, b: &str) -> Option<&Pool> {
        self.pools.get(&pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }
}

fn parse_u64_field(fields: &Value, key: &str) -> Result<u64> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| SolverError::Parse(format!("pool missing or malformed field {key}")))
}

/// Parses a DeepBook-style `Pool<Base, Quote>` shared-object snapshot.
/// `base_scalar`/`quote_scalar` come from the caller's decimals table
/// since the pool object itself carries no decimal metadata.
pub fn parse_pool(snapshot: &ObjectSnapshot, base_scalar: u64, quote_scalar: u64) -> Result<Pool> {
    if snapshot.fields.is_null() {
        return Err(SolverError::NotFound(format!(
            "pool object {} has no content",
            snapshot.object_id
        )));
    }

    let (base_type, quote_type) = split_type_params(&snapshot.type_)?;
    let tick_size = parse_u64_field(&snapshot.fields, "tick_size")?;
    let lot_size = parse_u64_field(&snapshot.fields, "lot_size")?;

    Ok(Pool {
        pool_id: snapshot.object_id.clone(),
        base_type,
        quote_type,
        base_scalar,
        quote_scalar,
        tick_size,
        lot_size,
    })
}

/// Fetches and parses a pool by id, resolving its decimal scalars through
/// `decimals_for`.
pub async fn fetch_pool(
    rpc: &RpcClient,
    pool_id: &str,
    decimals_for: impl Fn(&str) -> u8,
) -> Result<Pool> {
    let snapshot = rpc.get_object(pool_id).await?;
    let (base_type, quote_type) = split_type_params(&snapshot.type_)?;
    let base_scalar = 10u64.pow(decimals_for(&base_type) as u32);
    let quote_scalar = 10u64.pow(decimals_for(&quote_type) as u32);
    parse_pool(&snapshot, base_scalar, quote_scalar)
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
    fn find_pool_is_order_independent() {
        let mut registry = PoolRegistry::new();
        registry.insert(sample_pool()).unwrap();

        assert!(registry.find_pool("0x2::sui::SUI", "0x2::usdc::USDC").is_some());
        assert!(registry.find_pool("0x2::usdc::USDC", "0x2::sui::SUI").is_some());
        assert!(registry.find_pool("0x2::sui::SUI", "0xother::x::X").is_none());
    }

    #[test]
    fn rejects_duplicate_pair() {
        let mut registry = PoolRegistry::new();
        registry.insert(sample_pool()).unwrap();
        assert!(registry.insert(sample_pool()).is_err());
    }

    #[test]
    fn parse_pool_reads_type_params_and_sizing() {
        let snapshot = ObjectSnapshot {
            object_id: "0xpool".to_string(),
            type_: "0xdeepbook::pool::Pool<0x2::sui::SUI, 0x2::usdc::USDC>".to_string(),
            fields: serde_json::json!({ "tick_size": "1000", "lot_size": "1000" }),
        };
        let pool = parse_pool(&snapshot, 1_000_000_000, 1_000_000).unwrap();
        assert_eq!(pool.base_type, "0x2::sui::SUI");
        assert_eq!(pool.quote_type, "0x2::usdc::USDC");
        assert_eq!(pool.tick_size, 1_000);
    }

    #[test]
    fn parse_pool_rejects_missing_content() {
        let snapshot = ObjectSnapshot {
            object_id: "0xpool".to_string(),
            type_: "0xdeepbook::pool::Pool<0x2::sui::SUI, 0x2::usdc::USDC>".to_string(),
            fields: Value::Null,
        };
        assert!(matches!(parse_pool(&snapshot, 1, 1), Err(SolverError::NotFound(_))));
    }
}
