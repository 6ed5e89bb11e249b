use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::PluginState;

pub fn build_router(plugin_state: PluginState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/tfplugin6/GetMetadata",
            post(handlers::get_metadata_handler),
        )
        .route(
            "/tfplugin6/GetProviderSchema",
            post(handlers::get_provider_schema_handler),
        )
        .route(
            "/tfplugin6/ValidateProviderConfig",
            post(handlers::validate_provider_config_handler),
        )
        .route(
            "/tfplugin6/ConfigureProvider",
            post(handlers::configure_provider_handler),
        )
        .route(
            "/tfplugin6/ValidateResourceConfig",
            post(handlers::validate_resource_config_handler),
        )
        .route(
            "/tfplugin6/PlanResourceChange",
            post(handlers::plan_resource_change_handler),
        )
        .route(
            "/tfplugin6/ApplyResourceChange",
            post(handlers::apply_resource_change_handler),
        )
        .route(
            "/tfplugin6/ReadResource",
            post(handlers::read_resource_handler),
        )
        .route(
            "/tfplugin6/ImportResourceState",
            post(handlers::import_resource_state_handler),
        )
        .route(
            "/tfplugin6/StopProvider",
            post(handlers::stop_provider_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(plugin_state)
}
