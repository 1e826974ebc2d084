//! HTTP 接口
//!
//! `GET /health` and `GET /estimate?pool=&src=&dst=&src_amount=`.

use actix_web::web::{self, Data};
use actix_web::{App, HttpResponse, HttpServer, Responder, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io;
use std::net::SocketAddr;

use crate::SwapEstimator;
use crate::error::EstimateError;

pub const MISSING_PARAMETERS: &str = "Missing required parameters: pool, src, dst, src_amount";
pub const ESTIMATE_FAILED: &str = "Failed to estimate swap";

#[derive(Debug, Default, Deserialize)]
pub struct EstimateQuery {
    pub pool: Option<String>,
    pub src: Option<String>,
    pub dst: Option<String>,
    pub src_amount: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub dst_amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_json(status: StatusCode, error: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse { error: error.into() })
}

/// Maps an estimate failure to a status code and a client-facing message.
///
/// Ledger failures are reported generically; the detail only goes to the log.
fn error_response(err: &EstimateError) -> HttpResponse {
    match err {
        e if e.is_input_error() => error_json(StatusCode::BAD_REQUEST, e.to_string()),
        EstimateError::TokenMismatch { .. } | EstimateError::ZeroReserves { .. } => {
            error_json(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        _ => error_json(StatusCode::BAD_GATEWAY, ESTIMATE_FAILED),
    }
}

/// Log level of a failed request: node-side failures are errors, caller faults warnings.
fn failure_level(err: &EstimateError) -> log::Level {
    match err.ledger_op() {
        Some(_) => log::Level::Error,
        None => log::Level::Warn,
    }
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn estimate(query: web::Query<EstimateQuery>, estimator: Data<SwapEstimator>) -> HttpResponse {
    let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);
    let (Some(pool), Some(src), Some(dst), Some(src_amount)) = (
        non_empty(&query.pool),
        non_empty(&query.src),
        non_empty(&query.dst),
        non_empty(&query.src_amount),
    ) else {
        return error_json(StatusCode::BAD_REQUEST, MISSING_PARAMETERS);
    };

    match estimator.estimate_str(&pool, &src, &dst, &src_amount).await {
        Ok(quote) => HttpResponse::Ok().json(EstimateResponse { dst_amount: quote.amount_out.to_string() }),
        Err(err) => {
            log::log!(
                failure_level(&err),
                "estimate pool={pool} src={src} dst={dst} src_amount={src_amount} failed: {err}"
            );
            error_response(&err)
        }
    }
}

/// Registers the estimator routes; the app must carry `Data<SwapEstimator>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/estimate", web::get().to(estimate));
}

pub fn build_api_server(
    estimator: SwapEstimator,
    bind_addr: SocketAddr,
) -> Result<impl Future<Output = io::Result<()>>, io::Error> {
    let estimator = Data::new(estimator);
    Ok(HttpServer::new(move || App::new().app_data(estimator.clone()).configure(configure))
        .bind(bind_addr)?
        .run())
}
