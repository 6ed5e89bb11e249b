mod payloads;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authress_application::{ProviderSettings, RolesApi, RolesApiFactory};
use authress_core::{AppError, AppResult};
use authress_domain::{Role, RoleId};
use reqwest::header;
use serde::de::DeserializeOwned;
use tracing::debug;

use self::payloads::{RoleListPayload, RolePayload};

/// Client-wide timeout for every Authress API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the Authress roles endpoints.
pub struct HttpRolesApi {
    http_client: reqwest::Client,
    base_url: String,
    access_key: String,
    user_agent: String,
}

impl HttpRolesApi {
    /// Creates a client for the configured account.
    pub fn new(settings: &ProviderSettings, version: &str) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http_client,
            base_url: settings.custom_domain().to_owned(),
            access_key: settings.access_key().to_owned(),
            user_agent: format!("Terraform SDK {version}"),
        })
    }

    fn roles_url(&self) -> String {
        format!("{}/v1/roles", self.base_url)
    }

    fn role_url(&self, role_id: &RoleId) -> String {
        format!("{}/v1/roles/{}", self.base_url, role_id.as_str())
    }

    /// Sends a request and returns the body of a 200 response.
    async fn send(&self, request: reqwest::RequestBuilder, operation: &str) -> AppResult<String> {
        let response = request
            .bearer_auth(self.access_key.as_str())
            .header(header::USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|error| {
                AppError::Transport(format!("failed to call Authress {operation}: {error}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            AppError::Transport(format!(
                "failed to read Authress {operation} response body: {error}"
            ))
        })?;

        debug!(operation, status = status.as_u16(), "Authress API responded");

        if status != reqwest::StatusCode::OK {
            return Err(AppError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn send_role(&self, request: reqwest::RequestBuilder, operation: &str) -> AppResult<Role> {
        let body = self.send(request, operation).await?;
        decode::<RolePayload>(body).map(Role::from)
    }
}

fn decode<T: DeserializeOwned>(body: String) -> AppResult<T> {
    match serde_json::from_str::<T>(body.as_str()) {
        Ok(value) => Ok(value),
        Err(error) => Err(AppError::Decode {
            message: error.to_string(),
            body,
        }),
    }
}

#[async_trait]
impl RolesApi for HttpRolesApi {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let body = self
            .send(self.http_client.get(self.roles_url()), "list roles")
            .await?;

        Ok(decode::<RoleListPayload>(body)?
            .into_roles()
            .into_iter()
            .map(Role::from)
            .collect())
    }

    async fn get_role(&self, role_id: &RoleId) -> AppResult<Role> {
        debug!(role_id = %role_id, "fetching Authress role");
        self.send_role(self.http_client.get(self.role_url(role_id)), "get role")
            .await
    }

    async fn create_role(&self, role: &Role) -> AppResult<Role> {
        debug!(role_id = %role.role_id(), "creating Authress role");
        let request = self
            .http_client
            .post(self.roles_url())
            .json(&RolePayload::from(role));

        self.send_role(request, "create role").await
    }

    async fn update_role(&self, role_id: &RoleId, role: &Role) -> AppResult<Role> {
        debug!(role_id = %role_id, "updating Authress role");
        let request = self
            .http_client
            .put(self.role_url(role_id))
            .json(&RolePayload::from(role));

        self.send_role(request, "update role").await
    }

    async fn delete_role(&self, role_id: &RoleId) -> AppResult<()> {
        debug!(role_id = %role_id, "deleting Authress role");
        self.send(self.http_client.delete(self.role_url(role_id)), "delete role")
            .await
            .map(|_| ())
    }
}

/// Builds [`HttpRolesApi`] clients for the provider service.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRolesApiFactory;

impl RolesApiFactory for HttpRolesApiFactory {
    fn build(&self, settings: &ProviderSettings, version: &str) -> AppResult<Arc<dyn RolesApi>> {
        Ok(Arc::new(HttpRolesApi::new(settings, version)?))
    }
}

#[cfg(test)]
mod tests;
