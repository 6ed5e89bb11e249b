use axum::Json;
use axum::extract::State;

use crate::dto::{
    ApplyResourceChangeRequest, DiagnosticsResponse, GetMetadataResponse,
    GetProviderSchemaResponse, HealthResponse, ImportResourceStateRequest,
    ImportResourceStateResponse, ImportedResource, PlanResourceChangeRequest,
    PlanResourceChangeResponse, ProviderConfigRequest, ReadResourceRequest,
    ResourceStateResponse, ValidateResourceConfigRequest,
};
use crate::error::PluginResult;
use crate::state::PluginState;

mod health;
mod provider;
mod resources;

pub use health::health_handler;
pub use provider::{
    configure_provider_handler, get_metadata_handler, get_provider_schema_handler,
    stop_provider_handler, validate_provider_config_handler,
};
pub use resources::{
    apply_resource_change_handler, import_resource_state_handler, plan_resource_change_handler,
    read_resource_handler, validate_resource_config_handler,
};

#[cfg(test)]
mod tests;
