mod basic;
mod heatmap;
mod predict;
mod segment;


use crate::Result;
use crate::context::PredictionContext;
use crate::error::Error;
use crate::logging::*;
use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub struct AppState {
    pub context: PredictionContext,
}

pub async fn run(context: PredictionContext, bind_address: &str, origins: &[String]) -> Result<()> {
    let log = DEFAULT.new(o!(
        "function" => "web::run",
        "bind_address" => bind_address.to_owned(),
    ));

    let state = Arc::new(AppState { context });
    let app = router(state).layer(cors_layer(origins)?);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(log, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    add_routes(
        Router::new(),
        &[
            basic::add_route,
            predict::add_route,
            segment::add_route,
            heatmap::add_route,
        ],
    )
    .with_state(state)
}

/// "*" を含む場合はすべての Origin を許可する
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}")))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

fn add_routes<T>(app: Router<T>, funcs: &[fn(Router<T>) -> Router<T>]) -> Router<T> {
    let mut app = app;
    for func in funcs {
        app = func(app);
    }
    app
}

/// 呼び出し側の誤りは info、サーバ側の失敗は error で残す
fn log_failure(log: &Logger, err: &Error) {
    match err {
        Error::InvalidTimestamp(_) => info!(log, "rejected request"; "error" => %err),
        Error::Model(_) => error!(log, "prediction failed"; "error" => %err),
    }
}
