use std::fmt::{Display, Formatter};
use std::str::FromStr;

use authress_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum length of a permission action.
pub const PERMISSION_ACTION_MAX_LENGTH: usize = 64;

/// Action a permission applies to.
///
/// Actions are namespaced with `:`; a trailing `:*` (or the bare action)
/// implies every sub-action. Matching itself happens in the Authress service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionAction(String);

impl PermissionAction {
    /// Creates a validated permission action.
    ///
    /// Accepted forms are `*` or `[a-zA-Z0-9-_:]+` optionally followed by `:*`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.is_empty() || value.chars().count() > PERMISSION_ACTION_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "permission action '{value}' must be between 1 and {PERMISSION_ACTION_MAX_LENGTH} characters"
            )));
        }

        if value == "*" {
            return Ok(Self(value));
        }

        let stem = value.strip_suffix(":*").unwrap_or(value.as_str());
        let stem_is_valid = !stem.is_empty()
            && stem
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || "-_:".contains(character));

        if !stem_is_valid {
            return Err(AppError::Validation(format!(
                "permission action '{value}' must contain only alphanumeric characters and colons used as namespace separators"
            )));
        }

        Ok(Self(value))
    }

    /// Wraps an action reported by Authress without local validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the action string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for PermissionAction {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionAction> for String {
    fn from(value: PermissionAction) -> Self {
        value.0
    }
}

impl Display for PermissionAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Flags attached to one action inside a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// The holder may execute the action.
    pub allow: bool,
    /// The holder may give the permission to others without executing it.
    pub grant: bool,
    /// The holder may delegate the permission without executing it.
    pub delegate: bool,
}

impl PermissionGrant {
    /// Creates a grant that only allows executing the action.
    #[must_use]
    pub fn allow_only() -> Self {
        Self {
            allow: true,
            grant: false,
            delegate: false,
        }
    }
}
