use std::collections::BTreeMap;

use authress_domain::{PermissionAction, PermissionGrant, Role, RoleId, RoleName};
use serde::{Deserialize, Serialize};

/// Role as exchanged with the Authress API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RolePayload {
    pub role_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<PermissionPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct PermissionPayload {
    pub action: String,
    #[serde(default)]
    pub allow: bool,
    #[serde(default)]
    pub grant: bool,
    #[serde(default)]
    pub delegate: bool,
}

/// `GET /v1/roles` answers either with a wrapper object or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RoleListPayload {
    Wrapped { roles: Vec<RolePayload> },
    Bare(Vec<RolePayload>),
}

impl RoleListPayload {
    pub fn into_roles(self) -> Vec<RolePayload> {
        match self {
            Self::Wrapped { roles } | Self::Bare(roles) => roles,
        }
    }
}

impl From<&Role> for RolePayload {
    fn from(role: &Role) -> Self {
        Self {
            role_id: role.role_id().as_str().to_owned(),
            name: role.name().as_str().to_owned(),
            description: role.description().map(str::to_owned),
            permissions: role
                .permissions()
                .iter()
                .map(|(action, grant)| PermissionPayload {
                    action: action.as_str().to_owned(),
                    allow: grant.allow,
                    grant: grant.grant,
                    delegate: grant.delegate,
                })
                .collect(),
        }
    }
}

/// Authress owns stored roles, so returned values are taken as-is.
impl From<RolePayload> for Role {
    fn from(payload: RolePayload) -> Self {
        let permissions = payload
            .permissions
            .into_iter()
            .map(|permission| {
                (
                    PermissionAction::new_unchecked(permission.action),
                    PermissionGrant {
                        allow: permission.allow,
                        grant: permission.grant,
                        delegate: permission.delegate,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();

        Role::new_unchecked(
            RoleId::new_unchecked(payload.role_id),
            RoleName::new_unchecked(payload.name),
            payload.description,
            permissions,
        )
    }
}
