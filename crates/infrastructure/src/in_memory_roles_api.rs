use std::collections::BTreeMap;

use async_trait::async_trait;
use authress_application::RolesApi;
use authress_core::{AppError, AppResult};
use authress_domain::{Role, RoleId};
use tokio::sync::RwLock;

/// In-memory roles API answering the way the Authress service does.
///
/// Missing roles yield a remote `404` and duplicate creates a remote `409`,
/// so resource lifecycles can be exercised without a network.
#[derive(Debug, Default)]
pub struct InMemoryRolesApi {
    roles: RwLock<BTreeMap<String, Role>>,
}

impl InMemoryRolesApi {
    /// Creates an empty roles store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a store seeded with existing roles.
    #[must_use]
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: RwLock::new(
                roles
                    .into_iter()
                    .map(|role| (role.role_id().as_str().to_owned(), role))
                    .collect(),
            ),
        }
    }
}

fn not_found(role_id: &RoleId) -> AppError {
    AppError::Remote {
        status: 404,
        body: format!(r#"{{"title":"Role '{role_id}' does not exist"}}"#),
    }
}

#[async_trait]
impl RolesApi for InMemoryRolesApi {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.read().await.values().cloned().collect())
    }

    async fn get_role(&self, role_id: &RoleId) -> AppResult<Role> {
        self.roles
            .read()
            .await
            .get(role_id.as_str())
            .cloned()
            .ok_or_else(|| not_found(role_id))
    }

    async fn create_role(&self, role: &Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        let key = role.role_id().as_str();

        if roles.contains_key(key) {
            return Err(AppError::Remote {
                status: 409,
                body: format!(r#"{{"title":"Role '{key}' already exists"}}"#),
            });
        }

        roles.insert(key.to_owned(), role.clone());
        Ok(role.clone())
    }

    async fn update_role(&self, role_id: &RoleId, role: &Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        let Some(stored) = roles.get_mut(role_id.as_str()) else {
            return Err(not_found(role_id));
        };

        *stored = role.clone();
        Ok(role.clone())
    }

    async fn delete_role(&self, role_id: &RoleId) -> AppResult<()> {
        self.roles
            .write()
            .await
            .remove(role_id.as_str())
            .map(|_| ())
            .ok_or_else(|| not_found(role_id))
    }
}
