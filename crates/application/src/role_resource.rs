mod mapping;
mod plan;

use std::collections::BTreeMap;
use std::sync::Arc;

use authress_core::{AttributePath, Diagnostics, TfValue};
use authress_domain::RoleId;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::roles_api::RolesApi;

pub use mapping::{
    INVALID_CUSTOM_DOMAIN_MESSAGE, remote_error_detail, role_from_state, state_from_role,
    validate_role_config,
};
pub use plan::PlanResult;

/// `authress_role` attributes as stored in configuration, plan and state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleState {
    /// Legacy identifier mirroring `role_id`.
    #[serde(default)]
    pub id: TfValue<String>,
    /// Role identifier.
    #[serde(default)]
    pub role_id: TfValue<String>,
    /// Display name.
    #[serde(default)]
    pub name: TfValue<String>,
    /// Optional description.
    #[serde(default)]
    pub description: TfValue<String>,
    /// Local timestamp of the last create or update.
    #[serde(default)]
    pub last_updated: TfValue<String>,
    /// Permissions keyed by action.
    #[serde(default)]
    pub permissions: TfValue<BTreeMap<String, PermissionState>>,
}

/// Flags of one permission entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    /// Whether the action may be executed.
    #[serde(default)]
    pub allow: TfValue<bool>,
    /// Whether the permission may be granted to others.
    #[serde(default)]
    pub grant: TfValue<bool>,
    /// Whether the permission may be delegated.
    #[serde(default)]
    pub delegate: TfValue<bool>,
}

/// Outcome of one lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleResult {
    /// State the host should store; `None` removes the instance.
    pub new_state: Option<RoleState>,
    /// Problems reported to the operator.
    pub diagnostics: Diagnostics,
}

impl LifecycleResult {
    fn stored(state: RoleState) -> Self {
        Self {
            new_state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    fn failed(new_state: Option<RoleState>, diagnostics: Diagnostics) -> Self {
        Self {
            new_state,
            diagnostics,
        }
    }
}

/// Lifecycle operations of the `authress_role` resource.
#[derive(Clone)]
pub struct RoleResource {
    roles_api: Arc<dyn RolesApi>,
}

impl RoleResource {
    /// Creates the resource over a configured roles API.
    #[must_use]
    pub fn new(roles_api: Arc<dyn RolesApi>) -> Self {
        Self { roles_api }
    }

    /// Checks configuration values that are already known.
    #[must_use]
    pub fn validate_config(&self, config: &RoleState) -> Diagnostics {
        validate_role_config(config)
    }

    /// Computes the planned state for a change.
    #[must_use]
    pub fn plan(&self, prior: Option<&RoleState>, proposed: Option<RoleState>) -> PlanResult {
        plan::plan_role_change(prior, proposed)
    }

    /// Creates the role and returns the state to store.
    ///
    /// A failed create leaves nothing tracked.
    pub async fn create(&self, planned: &RoleState) -> LifecycleResult {
        let role = match role_from_state(planned) {
            Ok(role) => role,
            Err(diagnostics) => return LifecycleResult::failed(None, diagnostics),
        };

        match self.roles_api.create_role(&role).await {
            Ok(created) => {
                info!(role_id = %created.role_id(), "created Authress role");
                LifecycleResult::stored(state_from_role(&created, TfValue::Known(timestamp_now())))
            }
            Err(error) => {
                warn!(role_id = %role.role_id(), error = %error, "failed to create Authress role");
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error(
                    "Authress API Response: Attempted to create role:",
                    remote_error_detail("Could not create role, unexpected error", &error),
                );
                LifecycleResult::failed(None, diagnostics)
            }
        }
    }

    /// Refreshes the state from the remote service.
    ///
    /// The local `last_updated` value is carried over. A role that no longer
    /// exists is dropped from state with a warning.
    pub async fn read(&self, current: &RoleState) -> LifecycleResult {
        let role_id = match state_role_id(current) {
            Ok(role_id) => role_id,
            Err(diagnostics) => return LifecycleResult::failed(Some(current.clone()), diagnostics),
        };

        match self.roles_api.get_role(&role_id).await {
            Ok(role) => LifecycleResult::stored(state_from_role(&role, current.last_updated.clone())),
            Err(error) if error.remote_status() == Some(404) => {
                warn!(role_id = %role_id, "Authress role no longer exists, removing from state");
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_warning(
                    "Authress role not found",
                    format!(
                        "Role {role_id} no longer exists in Authress and was removed from state. \
                         It will be created again on the next apply."
                    ),
                );
                LifecycleResult::failed(None, diagnostics)
            }
            Err(error) => {
                warn!(role_id = %role_id, error = %error, "failed to read Authress role");
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error(
                    "Authress API Response: Attempted to get role:",
                    remote_error_detail(
                        format!("Could not read Authress role ID {role_id}").as_str(),
                        &error,
                    ),
                );
                LifecycleResult::failed(Some(current.clone()), diagnostics)
            }
        }
    }

    /// Replaces the remote role with the planned one.
    ///
    /// On failure the prior state stays the last known good state.
    pub async fn update(&self, prior: &RoleState, planned: &RoleState) -> LifecycleResult {
        let role = match role_from_state(planned) {
            Ok(role) => role,
            Err(diagnostics) => return LifecycleResult::failed(Some(prior.clone()), diagnostics),
        };

        match self.roles_api.update_role(role.role_id(), &role).await {
            Ok(updated) => {
                info!(role_id = %updated.role_id(), "updated Authress role");
                LifecycleResult::stored(state_from_role(&updated, TfValue::Known(timestamp_now())))
            }
            Err(error) => {
                warn!(role_id = %role.role_id(), error = %error, "failed to update Authress role");
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error(
                    "Authress API Response: Attempted to update role:",
                    remote_error_detail("Could not update role, unexpected error", &error),
                );
                LifecycleResult::failed(Some(prior.clone()), diagnostics)
            }
        }
    }

    /// Deletes the remote role; the state is kept when the call fails.
    pub async fn delete(&self, current: &RoleState) -> LifecycleResult {
        let role_id = match state_role_id(current) {
            Ok(role_id) => role_id,
            Err(diagnostics) => return LifecycleResult::failed(Some(current.clone()), diagnostics),
        };

        match self.roles_api.delete_role(&role_id).await {
            Ok(()) => {
                info!(role_id = %role_id, "deleted Authress role");
                LifecycleResult {
                    new_state: None,
                    diagnostics: Diagnostics::new(),
                }
            }
            Err(error) => {
                warn!(role_id = %role_id, error = %error, "failed to delete Authress role");
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error(
                    "Authress API Response: Attempted to delete role:",
                    remote_error_detail("Could not delete role, unexpected error", &error),
                );
                LifecycleResult::failed(Some(current.clone()), diagnostics)
            }
        }
    }

    /// Starts tracking an existing role by its identifier.
    ///
    /// Only `role_id` is populated; the host refreshes the rest through
    /// [`RoleResource::read`].
    #[must_use]
    pub fn import_state(&self, id: &str) -> LifecycleResult {
        match RoleId::new(id) {
            Ok(role_id) => LifecycleResult::stored(RoleState {
                role_id: TfValue::Known(role_id.into()),
                ..RoleState::default()
            }),
            Err(error) => {
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error(
                    "Invalid Import ID",
                    format!("Expected an Authress role ID to import: {error}"),
                );
                LifecycleResult::failed(None, diagnostics)
            }
        }
    }
}

fn state_role_id(state: &RoleState) -> Result<RoleId, Diagnostics> {
    let mut diagnostics = Diagnostics::new();

    match state.role_id.known().map(|value| RoleId::new(value.as_str())) {
        Some(Ok(role_id)) => Ok(role_id),
        Some(Err(error)) => {
            diagnostics.add_attribute_error(
                AttributePath::root("role_id"),
                "Invalid Role Attribute",
                error.to_string(),
            );
            Err(diagnostics)
        }
        None => {
            diagnostics.add_attribute_error(
                AttributePath::root("role_id"),
                "Missing Required Attribute",
                "role_id must be present in state",
            );
            Err(diagnostics)
        }
    }
}

fn timestamp_now() -> String {
    chrono::Utc::now()
        .format("%A, %d-%b-%y %H:%M:%S UTC")
        .to_string()
}
