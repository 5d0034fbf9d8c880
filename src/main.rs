use std::sync::Arc;

use intent_solver::api;
use intent_solver::api::state::AppState;
use intent_solver::clob::{fetch_pool, PoolRegistry, Quoter};
use intent_solver::config::Config;
use intent_solver::engine::SolverEngine;
use intent_solver::error::{Result, SolverError};
use intent_solver::registry::TxBuilder;
use intent_solver::rpc::RpcClient;
use intent_solver::signing::{Ed25519Signer, Signer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Every pool the solver can route through must be listed in
/// `POOL_ID_*` env vars; there is no on-chain pool discovery.
async fn load_pool_registry(rpc: &RpcClient, config: &Config) -> Result<PoolRegistry> {
    let mut registry = PoolRegistry::new();
    for pool_id in config.pool_overrides.values() {
        let pool = fetch_pool(rpc, pool_id, |asset_type| config.decimals_for(asset_type)).await?;
        registry.insert(pool)?;
    }
    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_logging(&config);

    info!("starting intent solver, rpc={}", config.rpc_url);

    let rpc = Arc::new(RpcClient::new(config.rpc_url.clone())?);
    let registry = load_pool_registry(&rpc, &config).await?;
    info!("loaded {} CLOB pools", registry.len());

    let quoter = Arc::new(Quoter::new((*rpc).clone(), registry, config.deepbook_package_id.clone()));

    let solver_signer: Arc<dyn Signer> = match &config.solver_private_key {
        Some(key) => Arc::new(Ed25519Signer::from_hex(key)?),
        None => {
            error!("SOLVER_PRIVATE_KEY not set; generating an ephemeral key (no funds, execution will fail)");
            Arc::new(Ed25519Signer::generate())
        }
    };

    let mut engine = SolverEngine::new(config.clone(), rpc.clone(), quoter.clone(), solver_signer.clone());

    let sui_type = config.resolve_alias("SUI");
    let usdc_type = config.resolve_alias("USDC");
    if let Err(e) = engine.cold_start_check(&sui_type, &usdc_type, 1_000_000_000).await {
        return Err(SolverError::Fatal(format!("cold start check failed, refusing to start: {e}")));
    }
    info!("cold start check passed");

    engine.start();

    let test_user_signer: Option<Arc<dyn Signer>> = config
        .test_user_private_key
        .as_ref()
        .map(|key| Ed25519Signer::from_hex(key))
        .transpose()?
        .map(|signer| Arc::new(signer) as Arc<dyn Signer>);

    let tx_builder = Arc::new(TxBuilder::new(config.package_id.clone(), config.protocol_config_id.clone()));

    let app_state = Arc::new(AppState {
        config: Arc::new(config.clone()),
        rpc: rpc.clone(),
        quoter: quoter.clone(),
        tx_builder,
        pipeline: engine.pipeline(),
        metrics: engine.metrics(),
        solver_signer: Some(solver_signer),
        test_user_signer,
    });

    let api_port = config.api_port;
    tokio::select! {
        result = api::serve("0.0.0.0", api_port, app_state) => {
            if let Err(e) = result {
                error!("HTTP façade exited with error: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl-c received, shutting down");
        }
    }

    engine.stop().await;
    Ok(())
}
