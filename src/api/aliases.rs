use crate::config::Config;

/// `human_to_raw(x, t) = round(x * 10^decimals(t))`.
pub fn human_to_raw(amount_human: f64, asset_type: &str, config: &Config) -> u64 {
    let scalar = 10f64.powi(config.decimals_for(asset_type) as i32);
    (amount_human * scalar).round() as u64
}

/// `raw_to_human(s, t) = s / 10^decimals(t)`.
pub fn raw_to_human(amount_raw: u64, asset_type: &str, config: &Config) -> f64 {
    let scalar = 10f64.powi(config.decimals_for(asset_type) as i32);
    amount_raw as f64 / scalar
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_config() -> Config {
        let mut asset_decimals = HashMap::new();
        asset_decimals.insert("0x2::sui::SUI".to_string(), 9u8);
        Config {
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
            token_aliases: HashMap::new(),
            asset_decimals,
            pool_overrides: HashMap::new(),
            solver_private_key: None,
            test_user_private_key: None,
        }
    }

    #[test]
    fn conversions_round_trip() {
        let config = test_config();
        let raw = human_to_raw(1.5, "0x2::sui::SUI", &config);
        assert_eq!(raw, 1_500_000_000);
        let human = raw_to_human(raw, "0x2::sui::SUI", &config);
        assert!((human - 1.5).abs() < 1e-9);
    }
}
