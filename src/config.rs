use crate::error::{Result, SolverError};
use std::collections::HashMap;
use std::env;

/// Default decimal exponent for an asset type the alias/override tables
/// don't know about.
pub const DEFAULT_DECIMALS: u8 = 9;

fn default_aliases() -> HashMap<String, String> {
    // Illustrative defaults; overridable via TOKEN_ALIAS_* env vars.
    let mut m = HashMap::new();
    m.insert(
        "SUI".to_string(),
        "0x2::sui::SUI".to_string(),
    );
    m.insert(
        "USDC".to_string(),
        "0x...::test_usdc::TEST_USDC".to_string(),
    );
    m.insert(
        "DBUSDC".to_string(),
        "0x...::deepbook_usdc::DEEPBOOK_USDC".to_string(),
    );
    m.insert(
        "DEEP".to_string(),
        "0x...::deep::DEEP".to_string(),
    );
    m
}

fn default_decimals() -> HashMap<String, u8> {
    let mut m = HashMap::new();
    m.insert("0x2::sui::SUI".to_string(), 9);
    m.insert("0x...::test_usdc::TEST_USDC".to_string(), 6);
    m.insert("0x...::deepbook_usdc::DEEPBOOK_USDC".to_string(), 6);
    m.insert("0x...::deep::DEEP".to_string(), 6);
    m
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: String,

    // RPC / chain
    pub rpc_url: String,
    pub ws_url: String,
    pub package_id: String,
    pub protocol_config_id: String,
    pub deepbook_package_id: String,

    // HTTP façade
    pub api_port: u16,

    // Solver decision parameters
    pub min_profit_bps: u64,
    pub max_gas_price: u64,
    pub polling_interval_ms: u64,
    pub poll_event_limit: usize,
    pub enable_events: bool,

    // Token alias table and per-type decimal overrides
    pub token_aliases: HashMap<String, String>,
    pub asset_decimals: HashMap<String, u8>,

    // Pool id overrides per (base_alias, quote_alias) pair, e.g. "SUI_USDC" -> pool id
    pub pool_overrides: HashMap<String, String>,

    // Private keys for test/solver endpoints (64-char hex), never logged.
    pub solver_private_key: Option<String>,
    pub test_user_private_key: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let rpc_url = env::var("RPC_URL")
            .map_err(|_| SolverError::Fatal("RPC_URL must be set".to_string()))?;

        let ws_url = env::var("WS_URL").unwrap_or_else(|_| {
            rpc_url
                .replacen("https://", "wss://", 1)
                .replacen("http://", "ws://", 1)
        });

        let package_id = env::var("PACKAGE_ID")
            .map_err(|_| SolverError::Fatal("PACKAGE_ID must be set".to_string()))?;
        let protocol_config_id = env::var("PROTOCOL_CONFIG_ID")
            .map_err(|_| SolverError::Fatal("PROTOCOL_CONFIG_ID must be set".to_string()))?;
        let deepbook_package_id =
            env::var("DEEPBOOK_PACKAGE_ID").unwrap_or_else(|_| package_id.clone());

        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let min_profit_bps = env::var("MIN_PROFIT_BPS")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .unwrap_or(50);
        let max_gas_price = env::var("MAX_GAS_PRICE")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .unwrap_or(1000);
        let polling_interval_ms = env::var("POLLING_INTERVAL_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .unwrap_or(10_000);
        let poll_event_limit = env::var("POLL_EVENT_LIMIT")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .unwrap_or(100);
        let enable_events = env::var("ENABLE_EVENTS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let mut token_aliases = default_aliases();
        for (key, value) in env::vars() {
            if let Some(alias) = key.strip_prefix("TOKEN_ALIAS_") {
                token_aliases.insert(alias.to_string(), value);
            }
        }

        let mut asset_decimals = default_decimals();
        for (key, value) in env::vars() {
            if let Some(type_key) = key.strip_prefix("ASSET_DECIMALS_") {
                if let Ok(decimals) = value.parse::<u8>() {
                    // Env keys can't carry "::", so overrides are keyed by alias
                    // and resolved through `token_aliases` at lookup time.
                    if let Some(asset_type) = token_aliases.get(type_key) {
                        asset_decimals.insert(asset_type.clone(), decimals);
                    }
                }
            }
        }

        let mut pool_overrides = HashMap::new();
        for (key, value) in env::vars() {
            if let Some(pair) = key.strip_prefix("POOL_ID_") {
                pool_overrides.insert(pair.to_string(), value);
            }
        }

        let solver_private_key = env::var("SOLVER_PRIVATE_KEY").ok();
        let test_user_private_key = env::var("TEST_USER_PRIVATE_KEY").ok();

        Ok(Self {
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            rpc_url,
            ws_url,
            package_id,
            protocol_config_id,
            deepbook_package_id,
            api_port,
            min_profit_bps,
            max_gas_price,
            polling_interval_ms,
            poll_event_limit,
            enable_events,
            token_aliases,
            asset_decimals,
            pool_overrides,
            solver_private_key,
            test_user_private_key,
        })
    }

    /// Resolve a user-facing alias (`"SUI"`) or raw type identifier to an
    /// asset type identifier. Unknown aliases pass through unchanged.
    pub fn resolve_alias(&self, alias_or_type: &str) -> String {
        self.token_aliases
            .get(alias_or_type)
            .cloned()
            .unwrap_or_else(|| alias_or_type.to_string())
    }

    /// Decimal exponent for an asset type, defaulting to 9.
    pub fn decimals_for(&self, asset_type: &str) -> u8 {
        self.asset_decimals
            .get(asset_type)
            .copied()
            .unwrap_or(DEFAULT_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_alias_passes_through() {
        let cfg = Config {
            log_level: "info".into(),
            log_format: "text".into(),
            rpc_url: "http://localhost".into(),
            ws_url: "ws://localhost".into(),
            package_id: "0x1".into(),
            protocol_config_id: "0x2".into(),
            deepbook_package_id: "0x1".into(),
            api_port: 8080,
            min_profit_bps: 50,
            max_gas_price: 1000,
            polling_interval_ms: 10_000,
            poll_event_limit: 100,
            enable_events: true,
            token_aliases: default_aliases(),
            asset_decimals: default_decimals(),
            pool_overrides: HashMap::new(),
            solver_private_key: None,
            test_user_private_key: None,
        };

        assert_eq!(cfg.resolve_alias("SUI"), "0x2::sui::SUI");
        assert_eq!(cfg.resolve_alias("0xdeadbeef::foo::BAR"), "0xdeadbeef::foo::BAR");
        assert_eq!(cfg.decimals_for("0x2::sui::SUI"), 9);
        assert_eq!(cfg.decimals_for("0xunknown::x::X"), DEFAULT_DECIMALS);
    }
}
