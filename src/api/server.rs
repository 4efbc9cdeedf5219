use crate::api::routes;
use crate::bot::EventRouter;
use crate::config::Shared;
use axum::Router;
use std::future::Future;
use std::sync::Arc;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: Shared,
    pub router: Arc<EventRouter>,
}

/// The webhook application without a listener, for serving or for driving with
/// `tower::ServiceExt::oneshot`.
pub fn app(config: Shared, router: Arc<EventRouter>) -> Router {
    routes::new(AppState { config, router })
}

/// Bind the webhook API to the configured address and serve it until the listener fails.
pub fn new(
    config: Shared,
    router: Arc<EventRouter>,
) -> impl Future<Output = hyper::Result<()>> {
    let addr = config.api_bind_addr;
    axum::Server::bind(&addr).serve(app(config, router).into_make_service())
}
