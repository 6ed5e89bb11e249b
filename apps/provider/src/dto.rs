use authress_application::{ProviderConfig, ProviderMetadata, ProviderSchema, RoleState};
use authress_core::{AttributePath, Diagnostics};
use serde::{Deserialize, Serialize};

/// Health payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub configured: bool,
}

/// Response carrying only diagnostics.
#[derive(Debug, Default, Serialize)]
pub struct DiagnosticsResponse {
    pub diagnostics: Diagnostics,
}

impl From<Diagnostics> for DiagnosticsResponse {
    fn from(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }
}

#[derive(Debug, Serialize)]
pub struct GetMetadataResponse {
    pub provider: ProviderMetadata,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Serialize)]
pub struct GetProviderSchemaResponse {
    #[serde(flatten)]
    pub schema: ProviderSchema,
    pub diagnostics: Diagnostics,
}

/// Incoming provider block for validation or configuration.
#[derive(Debug, Deserialize)]
pub struct ProviderConfigRequest {
    #[serde(default)]
    pub config: ProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct ValidateResourceConfigRequest {
    pub type_name: String,
    #[serde(default)]
    pub config: RoleState,
}

#[derive(Debug, Deserialize)]
pub struct PlanResourceChangeRequest {
    pub type_name: String,
    #[serde(default)]
    pub prior_state: Option<RoleState>,
    #[serde(default)]
    pub proposed_new_state: Option<RoleState>,
}

#[derive(Debug, Serialize)]
pub struct PlanResourceChangeResponse {
    pub planned_state: Option<RoleState>,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Deserialize)]
pub struct ApplyResourceChangeRequest {
    pub type_name: String,
    #[serde(default)]
    pub prior_state: Option<RoleState>,
    #[serde(default)]
    pub planned_state: Option<RoleState>,
}

#[derive(Debug, Deserialize)]
pub struct ReadResourceRequest {
    pub type_name: String,
    pub current_state: RoleState,
}

/// State returned by apply and read; `null` removes the instance.
#[derive(Debug, Serialize)]
pub struct ResourceStateResponse {
    pub new_state: Option<RoleState>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Deserialize)]
pub struct ImportResourceStateRequest {
    pub type_name: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ImportedResource {
    pub type_name: String,
    pub state: RoleState,
}

#[derive(Debug, Serialize)]
pub struct ImportResourceStateResponse {
    pub imported_resources: Vec<ImportedResource>,
    pub diagnostics: Diagnostics,
}
