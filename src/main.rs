use anyhow::Context;
use std::net::SocketAddr;

use v2_swap_estimator::SwapEstimator;
use v2_swap_estimator::common::EstimatorConfig;
use v2_swap_estimator::http_api::build_api_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EstimatorConfig::from_env()?;
    let estimator =
        SwapEstimator::from_config(&config).context("failed to create Ethereum client")?;

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!(
        "Starting server on {bind_addr} (policy {:?}, rpc timeout {:?})",
        config.reconcile_policy,
        config.call_timeout
    );
    build_api_server(estimator, bind_addr)?.await?;
    Ok(())
}
