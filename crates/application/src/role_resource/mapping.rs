use std::collections::BTreeMap;

use authress_core::{AppError, AttributePath, Diagnostics, TfValue};
use authress_domain::{
    PermissionAction, PermissionGrant, Role, RoleId, RoleName, validate_role_description,
};

use super::{PermissionState, RoleState};

const ERROR_BANNER: &str = "************************************************************";

/// Detail shown when the custom domain serves a web page instead of the API.
pub const INVALID_CUSTOM_DOMAIN_MESSAGE: &str =
    "The custom_domain configured is not valid, please review the Authress provider configuration.";

/// Frames a remote failure for the operator.
///
/// HTML bodies mean the custom domain does not point at the Authress API, so
/// the raw decoder message is replaced by configuration guidance.
#[must_use]
pub fn remote_error_detail(message: &str, error: &AppError) -> String {
    let details = if error.indicates_html_response() {
        INVALID_CUSTOM_DOMAIN_MESSAGE.to_owned()
    } else {
        format!("{message}: {error}")
    };

    format!("\n{ERROR_BANNER}\nError Details:\n\n{details}\n{ERROR_BANNER}\n\n")
}

/// Builds the state stored for a role returned by the API.
#[must_use]
pub fn state_from_role(role: &Role, last_updated: TfValue<String>) -> RoleState {
    let permissions = role
        .permissions()
        .iter()
        .map(|(action, grant)| {
            (
                action.as_str().to_owned(),
                PermissionState {
                    allow: TfValue::Known(grant.allow),
                    grant: TfValue::Known(grant.grant),
                    delegate: TfValue::Known(grant.delegate),
                },
            )
        })
        .collect();

    RoleState {
        id: TfValue::Known(role.role_id().as_str().to_owned()),
        role_id: TfValue::Known(role.role_id().as_str().to_owned()),
        name: TfValue::Known(role.name().as_str().to_owned()),
        description: TfValue::Known(role.description().unwrap_or_default().to_owned()),
        last_updated,
        permissions: TfValue::Known(permissions),
    }
}

/// Builds the API model from a planned state.
///
/// Every required attribute must be known at this point; unset optional flags
/// count as `false` and an unknown description counts as absent.
pub fn role_from_state(state: &RoleState) -> Result<Role, Diagnostics> {
    let mut diagnostics = Diagnostics::new();

    let role_id = known_string(&state.role_id, "role_id", &mut diagnostics)
        .and_then(|value| report(RoleId::new(value), AttributePath::root("role_id"), &mut diagnostics));
    let name = known_string(&state.name, "name", &mut diagnostics)
        .and_then(|value| report(RoleName::new(value), AttributePath::root("name"), &mut diagnostics));

    // Optional and computed: an unconfigured description is sent as absent.
    let description = state.description.known().cloned();

    let permissions = match &state.permissions {
        TfValue::Known(permissions) => permissions_from_state(permissions, &mut diagnostics),
        TfValue::Null | TfValue::Unknown => {
            diagnostics.add_attribute_error(
                AttributePath::root("permissions"),
                "Unknown Role Attribute",
                "permissions must be known before the role can be sent to Authress",
            );
            BTreeMap::new()
        }
    };

    match (role_id, name) {
        (Some(role_id), Some(name)) if !diagnostics.has_error() => {
            Role::new(role_id, name, description, permissions).map_err(|error| {
                diagnostics.add_attribute_error(
                    AttributePath::root("description"),
                    "Invalid Role Attribute",
                    error.to_string(),
                );
                diagnostics
            })
        }
        _ => Err(diagnostics),
    }
}

/// Checks known configuration values against the domain rules.
///
/// Unknown values are skipped; they are checked again once known.
#[must_use]
pub fn validate_role_config(config: &RoleState) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    if let Some(role_id) = config.role_id.known() {
        report(
            RoleId::new(role_id.as_str()),
            AttributePath::root("role_id"),
            &mut diagnostics,
        );
    }

    if let Some(name) = config.name.known() {
        report(
            RoleName::new(name.as_str()),
            AttributePath::root("name"),
            &mut diagnostics,
        );
    }

    if let Some(description) = config.description.known() {
        report(
            validate_role_description(description),
            AttributePath::root("description"),
            &mut diagnostics,
        );
    }

    if let Some(permissions) = config.permissions.known() {
        for (action, permission) in permissions {
            report(
                PermissionAction::new(action.as_str()),
                AttributePath::root("permissions").key(action.as_str()),
                &mut diagnostics,
            );
            if permission.allow.is_null() {
                diagnostics.add_attribute_error(
                    AttributePath::root("permissions")
                        .key(action.as_str())
                        .attribute("allow"),
                    "Missing Required Attribute",
                    "allow is required for every permission",
                );
            }
        }
    }

    diagnostics
}

fn permissions_from_state(
    permissions: &BTreeMap<String, PermissionState>,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<PermissionAction, PermissionGrant> {
    let mut mapped = BTreeMap::new();

    for (action, permission) in permissions {
        let path = AttributePath::root("permissions").key(action.as_str());
        let Some(action) = report(PermissionAction::new(action.as_str()), path.clone(), diagnostics)
        else {
            continue;
        };

        for (flag, value) in [
            ("allow", &permission.allow),
            ("grant", &permission.grant),
            ("delegate", &permission.delegate),
        ] {
            if value.is_unknown() {
                diagnostics.add_attribute_error(
                    path.clone().attribute(flag),
                    "Unknown Role Attribute",
                    format!("{flag} must be known before the role can be sent to Authress"),
                );
            }
        }

        mapped.insert(
            action,
            PermissionGrant {
                allow: permission.allow.value_or_default(),
                grant: permission.grant.value_or_default(),
                delegate: permission.delegate.value_or_default(),
            },
        );
    }

    mapped
}

fn known_string(
    value: &TfValue<String>,
    attribute: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match value {
        TfValue::Known(value) => Some(value.clone()),
        TfValue::Null => {
            diagnostics.add_attribute_error(
                AttributePath::root(attribute),
                "Missing Required Attribute",
                format!("{attribute} is required"),
            );
            None
        }
        TfValue::Unknown => {
            diagnostics.add_attribute_error(
                AttributePath::root(attribute),
                "Unknown Role Attribute",
                format!("{attribute} must be known before the role can be sent to Authress"),
            );
            None
        }
    }
}

fn report<T>(
    result: Result<T, AppError>,
    attribute: AttributePath,
    diagnostics: &mut Diagnostics,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            diagnostics.add_attribute_error(attribute, "Invalid Role Attribute", error.to_string());
            None
        }
    }
}
