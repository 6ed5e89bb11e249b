use authress_core::Diagnostics;
use tracing::info;

use super::*;

pub async fn get_metadata_handler(State(state): State<PluginState>) -> Json<GetMetadataResponse> {
    Json(GetMetadataResponse {
        provider: state.provider.metadata(),
        diagnostics: Diagnostics::new(),
    })
}

pub async fn get_provider_schema_handler(
    State(state): State<PluginState>,
) -> Json<GetProviderSchemaResponse> {
    Json(GetProviderSchemaResponse {
        schema: state.provider.schema(),
        diagnostics: Diagnostics::new(),
    })
}

pub async fn validate_provider_config_handler(
    State(state): State<PluginState>,
    Json(payload): Json<ProviderConfigRequest>,
) -> Json<DiagnosticsResponse> {
    Json(state.provider.validate_config(&payload.config).into())
}

pub async fn configure_provider_handler(
    State(state): State<PluginState>,
    Json(payload): Json<ProviderConfigRequest>,
) -> Json<DiagnosticsResponse> {
    Json(state.provider.configure(&payload.config).await.into())
}

/// Drops the configured client and asks the server to shut down.
pub async fn stop_provider_handler(State(state): State<PluginState>) -> Json<DiagnosticsResponse> {
    state.provider.stop().await;
    state.shutdown.notify_one();
    info!("plugin shutdown requested");

    Json(DiagnosticsResponse::default())
}
