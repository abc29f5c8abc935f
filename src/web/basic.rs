use super::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/healthcheck", get(healthcheck))
}

pub(super) async fn healthcheck() -> &'static str {
    "OK"
}
