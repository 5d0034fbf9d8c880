use std::sync::Arc;

use crate::clob::Quoter;
use crate::config::Config;
use crate::engine::{Metrics, Pipeline};
use crate::registry::TxBuilder;
use crate::rpc::RpcClient;
use crate::signing::Signer;

/// Shared façade state: the pool registry and config are read-only after
/// init, metrics is the only other shared mutable surface.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub rpc: Arc<RpcClient>,
    pub quoter: Arc<Quoter>,
    pub tx_builder: Arc<TxBuilder>,
    pub pipeline: Arc<Pipeline>,
    pub metrics: Arc<Metrics>,
    pub solver_signer: Option<Arc<dyn Signer>>,
    pub test_user_signer: Option<Arc<dyn Signer>>,
}
