use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use authress_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::permission::{PermissionAction, PermissionGrant};

/// Maximum length of a role identifier.
pub const ROLE_ID_MAX_LENGTH: usize = 64;

/// Maximum length of a role display name.
pub const ROLE_NAME_MAX_LENGTH: usize = 128;

/// Maximum length of a role description.
pub const ROLE_DESCRIPTION_MAX_LENGTH: usize = 1024;

/// Stable role identifier, chosen by the operator at creation time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleId(String);

impl RoleId {
    /// Creates a validated role identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.is_empty() || value.chars().count() > ROLE_ID_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role id '{value}' must be between 1 and {ROLE_ID_MAX_LENGTH} characters"
            )));
        }

        if !value
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || "-._:@".contains(character))
        {
            return Err(AppError::Validation(format!(
                "role id '{value}' must contain only alphanumeric characters and [-._:@]"
            )));
        }

        Ok(Self(value))
    }

    /// Wraps an identifier reported by Authress without local validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleId> for String {
    fn from(value: RoleId) -> Self {
        value.0
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Human readable role name shown in the management portal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "role name must not be empty or whitespace".to_owned(),
            ));
        }

        if value.chars().count() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must not exceed {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    /// Wraps a name reported by Authress without local validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the name string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Checks the length limit on role descriptions.
pub fn validate_role_description(value: &str) -> AppResult<()> {
    if value.chars().count() > ROLE_DESCRIPTION_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "role description must not exceed {ROLE_DESCRIPTION_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    role_id: RoleId,
    name: RoleName,
    description: Option<String>,
    permissions: BTreeMap<PermissionAction, PermissionGrant>,
}

impl Role {
    /// Creates a role; an empty description is stored as absent.
    pub fn new(
        role_id: RoleId,
        name: RoleName,
        description: Option<String>,
        permissions: BTreeMap<PermissionAction, PermissionGrant>,
    ) -> AppResult<Self> {
        let description = description.filter(|value| !value.is_empty());
        if let Some(description) = description.as_deref() {
            validate_role_description(description)?;
        }

        Ok(Self {
            role_id,
            name,
            description,
            permissions,
        })
    }

    /// Builds a role as reported by Authress, which owns the stored data.
    ///
    /// Only the empty description is normalized; no length or character
    /// rules are applied.
    #[must_use]
    pub fn new_unchecked(
        role_id: RoleId,
        name: RoleName,
        description: Option<String>,
        permissions: BTreeMap<PermissionAction, PermissionGrant>,
    ) -> Self {
        Self {
            role_id,
            name,
            description: description.filter(|value| !value.is_empty()),
            permissions,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn role_id(&self) -> &RoleId {
        &self.role_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the description, if one is set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns permissions keyed by action.
    #[must_use]
    pub fn permissions(&self) -> &BTreeMap<PermissionAction, PermissionGrant> {
        &self.permissions
    }
}
