use std::sync::Arc;

use authress_core::{AppError, AppResult, AttributePath, Diagnostics};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::provider_config::{ProviderConfig, normalize_custom_domain, resolve_provider_settings};
use crate::role_resource::{RoleResource, RoleState, validate_role_config};
use crate::roles_api::{RolesApi, RolesApiFactory};
use crate::schema::{PROVIDER_TYPE_NAME, ProviderSchema, ROLE_RESOURCE_TYPE, provider_schema};

/// Reads one environment variable.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Provider identity and the resource types it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    /// Provider type name.
    pub type_name: &'static str,
    /// Provider build version.
    pub version: String,
    /// Resource type names.
    pub resources: Vec<&'static str>,
}

/// Provider service holding the configured roles API client.
#[derive(Clone)]
pub struct AuthressProvider {
    version: String,
    roles_api_factory: Arc<dyn RolesApiFactory>,
    env_lookup: EnvLookup,
    roles_api: Arc<RwLock<Option<Arc<dyn RolesApi>>>>,
}

impl AuthressProvider {
    /// Creates an unconfigured provider reading the process environment.
    #[must_use]
    pub fn new(version: impl Into<String>, roles_api_factory: Arc<dyn RolesApiFactory>) -> Self {
        Self {
            version: version.into(),
            roles_api_factory,
            env_lookup: Arc::new(|name: &str| std::env::var(name).ok()),
            roles_api: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the environment source used for setting fallbacks.
    #[must_use]
    pub fn with_env_lookup(mut self, env_lookup: EnvLookup) -> Self {
        self.env_lookup = env_lookup;
        self
    }

    /// Returns provider metadata.
    #[must_use]
    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME,
            version: self.version.clone(),
            resources: vec![ROLE_RESOURCE_TYPE],
        }
    }

    /// Returns the provider and resource schemas.
    #[must_use]
    pub fn schema(&self) -> ProviderSchema {
        provider_schema()
    }

    /// Validates known provider settings without touching the network.
    #[must_use]
    pub fn validate_config(&self, config: &ProviderConfig) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        if let Some(custom_domain) = config.custom_domain.known()
            && let Err(error) = normalize_custom_domain(custom_domain)
        {
            diagnostics.add_attribute_error(
                AttributePath::root("custom_domain"),
                "Invalid Authress API CustomDomain",
                error.to_string(),
            );
        }

        diagnostics
    }

    /// Resolves settings and builds the roles API client.
    ///
    /// No client is built while any setting is missing or unknown.
    pub async fn configure(&self, config: &ProviderConfig) -> Diagnostics {
        info!("configuring Authress client");

        let settings = match resolve_provider_settings(config, self.env_lookup.as_ref()) {
            Ok(settings) => settings,
            Err(diagnostics) => return diagnostics,
        };

        debug!(
            custom_domain = %settings.custom_domain(),
            "creating Authress client"
        );

        let mut diagnostics = Diagnostics::new();
        match self
            .roles_api_factory
            .build(&settings, self.version.as_str())
        {
            Ok(roles_api) => {
                *self.roles_api.write().await = Some(roles_api);
                info!(success = true, "configured Authress client");
            }
            Err(error) => diagnostics.add_error(
                "Unable to Create Authress API Client",
                format!(
                    "An unexpected error occurred when creating the Authress API client. \
                     If the error is not clear, please contact the provider developers.\n\n\
                     Authress Client Error: {error}"
                ),
            ),
        }

        diagnostics
    }

    /// Returns the role resource bound to the configured client.
    pub async fn role_resource(&self) -> AppResult<RoleResource> {
        self.roles_api
            .read()
            .await
            .clone()
            .map(RoleResource::new)
            .ok_or_else(|| {
                AppError::Configuration(
                    "the Authress provider has not been configured yet".to_owned(),
                )
            })
    }

    /// Reports whether a roles API client is configured.
    pub async fn is_configured(&self) -> bool {
        self.roles_api.read().await.is_some()
    }

    /// Resolves a resource type name served by this provider.
    pub async fn resource(&self, type_name: &str) -> AppResult<RoleResource> {
        ensure_served(type_name)?;
        self.role_resource().await
    }

    /// Validates resource configuration; usable before `configure`.
    pub fn validate_resource_config(
        &self,
        type_name: &str,
        config: &RoleState,
    ) -> AppResult<Diagnostics> {
        ensure_served(type_name)?;
        Ok(validate_role_config(config))
    }

    /// Drops the configured client.
    pub async fn stop(&self) {
        info!("stopping Authress provider");
        *self.roles_api.write().await = None;
    }
}

fn ensure_served(type_name: &str) -> AppResult<()> {
    if type_name == ROLE_RESOURCE_TYPE {
        return Ok(());
    }

    Err(AppError::NotFound(format!(
        "resource type '{type_name}' is not served by the {PROVIDER_TYPE_NAME} provider"
    )))
}

#[cfg(test)]
mod tests;
