//! Domain entities and invariants for Authress roles.

#![forbid(unsafe_code)]

mod permission;
mod role;

pub use permission::{PERMISSION_ACTION_MAX_LENGTH, PermissionAction, PermissionGrant};
pub use role::{
    ROLE_DESCRIPTION_MAX_LENGTH, ROLE_ID_MAX_LENGTH, ROLE_NAME_MAX_LENGTH, Role, RoleId, RoleName,
    validate_role_description,
};
