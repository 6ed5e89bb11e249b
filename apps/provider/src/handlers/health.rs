use super::*;

pub async fn health_handler(State(state): State<PluginState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        configured: state.provider.is_configured().await,
    })
}
