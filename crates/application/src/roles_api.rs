use std::sync::Arc;

use async_trait::async_trait;

use authress_core::AppResult;
use authress_domain::{Role, RoleId};

use crate::provider_config::ProviderSettings;

/// Port for the remote Authress roles endpoints.
#[async_trait]
pub trait RolesApi: Send + Sync {
    /// Lists every role in the account.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Fetches one role.
    async fn get_role(&self, role_id: &RoleId) -> AppResult<Role>;

    /// Creates a role and returns the stored representation.
    async fn create_role(&self, role: &Role) -> AppResult<Role>;

    /// Replaces a role wholesale and returns the stored representation.
    async fn update_role(&self, role_id: &RoleId, role: &Role) -> AppResult<Role>;

    /// Deletes a role.
    async fn delete_role(&self, role_id: &RoleId) -> AppResult<()>;
}

/// Builds the roles API client once provider settings are resolved.
pub trait RolesApiFactory: Send + Sync {
    /// Creates a client bound to the configured account.
    fn build(&self, settings: &ProviderSettings, version: &str) -> AppResult<Arc<dyn RolesApi>>;
}
