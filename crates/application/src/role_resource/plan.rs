use authress_core::{AttributePath, Diagnostics, TfValue};

use super::RoleState;
use super::mapping::validate_role_config;

/// Planned change for one role instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanResult {
    /// State expected after apply; `None` plans a destroy.
    pub planned_state: Option<RoleState>,
    /// Attributes whose change requires destroy and re-create.
    pub requires_replace: Vec<AttributePath>,
    /// Problems found while planning.
    pub diagnostics: Diagnostics,
}

/// Computes the planned state from the prior state and the proposed config.
pub(super) fn plan_role_change(prior: Option<&RoleState>, proposed: Option<RoleState>) -> PlanResult {
    let Some(proposed) = proposed else {
        return PlanResult {
            planned_state: None,
            requires_replace: Vec::new(),
            diagnostics: Diagnostics::new(),
        };
    };

    let diagnostics = validate_role_config(&proposed);
    let mut planned = apply_permission_defaults(proposed);
    let mut requires_replace = Vec::new();

    match prior {
        None => {
            planned.id = TfValue::Unknown;
            planned.last_updated = TfValue::Unknown;
            if planned.description.is_null() {
                planned.description = TfValue::Unknown;
            }
        }
        Some(prior) if planned.role_id != prior.role_id => {
            requires_replace.push(AttributePath::root("role_id"));
            planned.id = TfValue::Unknown;
            planned.last_updated = TfValue::Unknown;
            if planned.description.is_null() {
                planned.description = TfValue::Unknown;
            }
        }
        Some(prior) => {
            planned.id = prior.id.clone();

            let description_changed =
                !planned.description.is_null() && planned.description != prior.description;
            let changed = description_changed
                || planned.name != prior.name
                || planned.permissions != prior.permissions;

            if changed {
                planned.last_updated = TfValue::Unknown;
                if planned.description.is_null() {
                    planned.description = TfValue::Unknown;
                }
            } else {
                planned.last_updated = prior.last_updated.clone();
                if planned.description.is_null() {
                    planned.description = prior.description.clone();
                }
            }
        }
    }

    PlanResult {
        planned_state: Some(planned),
        requires_replace,
        diagnostics,
    }
}

/// Unset `grant` and `delegate` flags default to `false`.
fn apply_permission_defaults(mut state: RoleState) -> RoleState {
    if let TfValue::Known(permissions) = &mut state.permissions {
        for permission in permissions.values_mut() {
            if permission.grant.is_null() {
                permission.grant = TfValue::Known(false);
            }
            if permission.delegate.is_null() {
                permission.delegate = TfValue::Known(false);
            }
        }
    }

    state
}
