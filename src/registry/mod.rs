pub mod helpers;
pub mod parse;
pub mod tx_builder;
pub mod types;

pub use helpers::{fetch_config, fetch_created_events, fetch_executed_events, fetch_intent};
pub use parse::{parse_config, parse_event, parse_intent, split_type_params};
pub use tx_builder::TxBuilder;
pub use types::{fee, Intent, IntentEvent, IntentStatus, ProtocolConfig};
