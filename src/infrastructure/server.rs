// Server module - HTTP router assembly and the serve loop

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, header},
    middleware,
    response::Response,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api::{self, error, views::redirect};
use crate::infrastructure::AppState;

/// Scripts and styles may only come from the site itself and the two CDNs
/// the page templates pull jQuery and Bootstrap from.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self' code.jquery.com cdn.jsdelivr.net; \
    style-src 'self' cdn.jsdelivr.net; \
    img-src 'self' data:";

async fn home() -> Response {
    redirect("/catalog")
}

/// Build the full application router
///
/// Anything outside `/catalog` is looked up in `static_dir`; a miss there is
/// a 404 rendered through the error view like any other fault.
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    let static_files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(error::not_found.into_service());

    Router::new()
        .route("/", get(home))
        .nest("/catalog", api::catalog_router())
        .fallback_service(static_files)
        .layer(middleware::map_response_with_state(
            state.clone(),
            error::render_faults,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .with_state(state)
}

/// Serve `app` until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Local library listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, draining connections"),
        Err(e) => {
            // Without a signal handler the server just runs until killed
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
