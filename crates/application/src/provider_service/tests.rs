use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use authress_core::{AppError, AppResult, TfValue};
use authress_domain::{Role, RoleId};

use crate::provider_config::{ProviderConfig, ProviderSettings};
use crate::roles_api::{RolesApi, RolesApiFactory};

use crate::role_resource::RoleState;

use super::AuthressProvider;

struct EmptyRolesApi;

#[async_trait]
impl RolesApi for EmptyRolesApi {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(Vec::new())
    }

    async fn get_role(&self, role_id: &RoleId) -> AppResult<Role> {
        Err(AppError::Remote {
            status: 404,
            body: format!("role {role_id} not found"),
        })
    }

    async fn create_role(&self, role: &Role) -> AppResult<Role> {
        Ok(role.clone())
    }

    async fn update_role(&self, _role_id: &RoleId, role: &Role) -> AppResult<Role> {
        Ok(role.clone())
    }

    async fn delete_role(&self, _role_id: &RoleId) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingFactory {
    builds: AtomicUsize,
    last_domain: std::sync::Mutex<Option<String>>,
}

impl RolesApiFactory for CountingFactory {
    fn build(&self, settings: &ProviderSettings, _version: &str) -> AppResult<Arc<dyn RolesApi>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last_domain) = self.last_domain.lock() {
            *last_domain = Some(settings.custom_domain().to_owned());
        }
        Ok(Arc::new(EmptyRolesApi))
    }
}

fn provider(factory: Arc<CountingFactory>, env_key: Option<&'static str>) -> AuthressProvider {
    AuthressProvider::new("1.2.3", factory).with_env_lookup(Arc::new(move |name: &str| {
        (name == "AUTHRESS_KEY")
            .then_some(env_key)
            .flatten()
            .map(str::to_owned)
    }))
}

#[tokio::test]
async fn configure_builds_client_once_settings_resolve() {
    let factory = Arc::new(CountingFactory::default());
    let provider = provider(factory.clone(), Some("sk_env"));

    let diagnostics = provider
        .configure(&ProviderConfig {
            custom_domain: TfValue::Known("auth.example.com".to_owned()),
            access_key: TfValue::Null,
        })
        .await;

    assert!(diagnostics.is_empty());
    assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
    assert_eq!(
        factory
            .last_domain
            .lock()
            .ok()
            .and_then(|last_domain| last_domain.clone()),
        Some("https://auth.example.com".to_owned())
    );
    assert!(provider.role_resource().await.is_ok());
}

#[tokio::test]
async fn configure_fails_fast_without_access_key() {
    let factory = Arc::new(CountingFactory::default());
    let provider = provider(factory.clone(), None);

    let diagnostics = provider
        .configure(&ProviderConfig {
            custom_domain: TfValue::Known("auth.example.com".to_owned()),
            access_key: TfValue::Null,
        })
        .await;

    assert!(diagnostics.has_error());
    assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
    assert!(matches!(
        provider.role_resource().await,
        Err(AppError::Configuration(_))
    ));
}

#[tokio::test]
async fn unknown_resource_type_is_rejected() {
    let factory = Arc::new(CountingFactory::default());
    let provider = provider(factory, Some("sk_env"));

    let result = provider.resource("authress_record").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn stop_drops_the_configured_client() {
    let factory = Arc::new(CountingFactory::default());
    let provider = provider(factory, Some("sk_env"));
    let diagnostics = provider
        .configure(&ProviderConfig {
            custom_domain: TfValue::Known("https://auth.example.com".to_owned()),
            access_key: TfValue::Null,
        })
        .await;
    assert!(diagnostics.is_empty());

    provider.stop().await;

    assert!(provider.resource("authress_role").await.is_err());
}

#[test]
fn metadata_lists_role_resource() {
    let provider = provider(Arc::new(CountingFactory::default()), None);

    let metadata = provider.metadata();

    assert_eq!(metadata.type_name, "authress");
    assert_eq!(metadata.version, "1.2.3");
    assert_eq!(metadata.resources, vec!["authress_role"]);
}

#[test]
fn validate_config_reports_unusable_domain() {
    let provider = provider(Arc::new(CountingFactory::default()), None);

    let diagnostics = provider.validate_config(&ProviderConfig {
        custom_domain: TfValue::Known("https://".to_owned()),
        access_key: TfValue::Unknown,
    });

    assert!(diagnostics.has_error());
}

#[tokio::test]
async fn resource_config_validates_before_configure() {
    let provider = provider(Arc::new(CountingFactory::default()), None);
    let config = RoleState {
        role_id: TfValue::Known("bad role id".to_owned()),
        name: TfValue::Known("Reader".to_owned()),
        ..RoleState::default()
    };

    let diagnostics = provider.validate_resource_config("authress_role", &config);

    assert!(matches!(diagnostics, Ok(ref diagnostics) if diagnostics.has_error()));
    assert!(!provider.is_configured().await);
    assert!(matches!(
        provider.validate_resource_config("authress_user", &config),
        Err(AppError::NotFound(_))
    ));
}
