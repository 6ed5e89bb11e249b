use std::fmt::{Debug, Formatter};

use authress_core::{AppError, AppResult, AttributePath, Diagnostics, NonEmptyString, TfValue};
use serde::Deserialize;
use url::Url;

/// Environment variable consulted when `access_key` is not configured.
pub const ACCESS_KEY_ENV: &str = "AUTHRESS_KEY";

/// Provider block as received from the plugin host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Authress custom domain or account API host.
    #[serde(default)]
    pub custom_domain: TfValue<String>,
    /// Access key for the Authress API.
    #[serde(default)]
    pub access_key: TfValue<String>,
}

/// Fully resolved settings used to build the API client.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    custom_domain: String,
    access_key: NonEmptyString,
}

impl ProviderSettings {
    /// Creates settings from raw values, normalizing the custom domain.
    pub fn new(custom_domain: &str, access_key: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            custom_domain: normalize_custom_domain(custom_domain)?,
            access_key: NonEmptyString::new(access_key)?,
        })
    }

    /// Returns the API base URL without a trailing slash.
    #[must_use]
    pub fn custom_domain(&self) -> &str {
        self.custom_domain.as_str()
    }

    /// Returns the access key.
    #[must_use]
    pub fn access_key(&self) -> &str {
        self.access_key.as_str()
    }
}

impl Debug for ProviderSettings {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ProviderSettings")
            .field("custom_domain", &self.custom_domain)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Turns a configured domain into an absolute API base URL.
///
/// Values without an `http` prefix are served over `https://`.
pub fn normalize_custom_domain(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "custom domain must not be empty".to_owned(),
        ));
    }

    let with_scheme = if trimmed.starts_with("http") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };
    let normalized = with_scheme.trim_end_matches('/').to_owned();

    let parsed = Url::parse(normalized.as_str()).map_err(|error| {
        AppError::Validation(format!("custom domain '{trimmed}' is not a valid URL: {error}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::Validation(format!(
            "custom domain '{trimmed}' must be an http(s) host"
        )));
    }

    Ok(normalized)
}

/// Resolves provider settings from configuration with environment fallback.
///
/// Every problem is reported before returning so the operator sees all
/// missing settings at once.
pub fn resolve_provider_settings(
    config: &ProviderConfig,
    env_lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<ProviderSettings, Diagnostics> {
    let mut diagnostics = Diagnostics::new();

    if config.custom_domain.is_unknown() {
        diagnostics.add_attribute_error(
            AttributePath::root("custom_domain"),
            "Unknown Authress API CustomDomain",
            "Cannot connect to the Authress API as there is an unknown configuration value for the Authress custom_domain. \
             Set the value in the provider configuration",
        );
    }

    if config.access_key.is_unknown() {
        diagnostics.add_attribute_error(
            AttributePath::root("access_key"),
            "Unknown Authress API Access Key",
            "Cannot connect to the Authress API as there is an unknown configuration value for the Authress access key. \
             Set the value by following the OIDC CI/CD guide in the Authress Knowledge Base: https://authress.io/knowledge-base/docs/category/cicd",
        );
    }

    if diagnostics.has_error() {
        return Err(diagnostics);
    }

    let access_key = config
        .access_key
        .known()
        .cloned()
        .or_else(|| env_lookup(ACCESS_KEY_ENV))
        .filter(|value| !value.trim().is_empty());

    let custom_domain = match config
        .custom_domain
        .known()
        .filter(|value| !value.trim().is_empty())
    {
        Some(value) => match normalize_custom_domain(value) {
            Ok(normalized) => Some(normalized),
            Err(error) => {
                diagnostics.add_attribute_error(
                    AttributePath::root("custom_domain"),
                    "Invalid Authress API CustomDomain",
                    format!(
                        "Cannot connect to the Authress API: {error}. \
                         Set 'custom_domain' to your Authress custom domain or account API host"
                    ),
                );
                None
            }
        },
        None => {
            diagnostics.add_attribute_error(
                AttributePath::root("custom_domain"),
                "Missing Authress API CustomDomain",
                "Cannot connect to the Authress API: Missing Authress custom_domain. \
                 Set the 'custom_domain' value by adding a terraform provider block for authress",
            );
            None
        }
    };

    if access_key.is_none() {
        diagnostics.add_attribute_error(
            AttributePath::root("access_key"),
            "Missing Authress API Access Key",
            "Cannot connect to the Authress API: Missing Authress Access Key. \
             Set the 'access_key' value by running the CI/CD Automation https://authress.io/knowledge-base/docs/category/cicd, \
             or adding a terraform provider block for authress",
        );
    }

    match (custom_domain, access_key) {
        (Some(custom_domain), Some(access_key)) if !diagnostics.has_error() => {
            NonEmptyString::new(access_key)
                .map(|access_key| ProviderSettings {
                    custom_domain,
                    access_key,
                })
                .map_err(|error| {
                    diagnostics.add_attribute_error(
                        AttributePath::root("access_key"),
                        "Invalid Authress API Access Key",
                        error.to_string(),
                    );
                    diagnostics
                })
        }
        _ => Err(diagnostics),
    }
}
