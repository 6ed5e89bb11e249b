use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tokio::sync::Notify;

use authress_application::{
    AuthressProvider, PermissionState, ProviderConfig, ProviderSettings, RoleState, RolesApi,
    RolesApiFactory,
};
use authress_core::{AppError, AppResult, TfValue};
use authress_domain::RoleId;
use authress_infrastructure::InMemoryRolesApi;

use crate::dto::{
    ApplyResourceChangeRequest, ImportResourceStateRequest, PlanResourceChangeRequest,
    ProviderConfigRequest, ReadResourceRequest, ValidateResourceConfigRequest,
};
use crate::error::PluginError;
use crate::state::PluginState;

use super::{
    apply_resource_change_handler, configure_provider_handler, get_metadata_handler,
    get_provider_schema_handler, health_handler, import_resource_state_handler,
    plan_resource_change_handler, read_resource_handler, stop_provider_handler,
    validate_resource_config_handler,
};

struct SharedRolesApiFactory(Arc<InMemoryRolesApi>);

impl RolesApiFactory for SharedRolesApiFactory {
    fn build(&self, _settings: &ProviderSettings, _version: &str) -> AppResult<Arc<dyn RolesApi>> {
        Ok(self.0.clone())
    }
}

fn plugin_state() -> (PluginState, Arc<InMemoryRolesApi>) {
    let roles_api = Arc::new(InMemoryRolesApi::new());
    let provider = AuthressProvider::new(
        "0.1.0",
        Arc::new(SharedRolesApiFactory(roles_api.clone())),
    )
    .with_env_lookup(Arc::new(|name: &str| {
        (name == "AUTHRESS_KEY").then(|| "sk_env".to_owned())
    }));

    (
        PluginState {
            provider,
            shutdown: Arc::new(Notify::new()),
        },
        roles_api,
    )
}

async fn configured_state() -> (PluginState, Arc<InMemoryRolesApi>) {
    let (state, roles_api) = plugin_state();
    let Json(response) = configure_provider_handler(
        State(state.clone()),
        Json(ProviderConfigRequest {
            config: ProviderConfig {
                custom_domain: TfValue::Known("acme.login.authress.io".to_owned()),
                access_key: TfValue::Null,
            },
        }),
    )
    .await;
    assert!(response.diagnostics.is_empty());

    (state, roles_api)
}

fn editor_config() -> RoleState {
    RoleState {
        role_id: TfValue::Known("editor".to_owned()),
        name: TfValue::Known("Editor".to_owned()),
        permissions: TfValue::Known(BTreeMap::from([(
            "documents:read".to_owned(),
            PermissionState {
                allow: TfValue::Known(true),
                ..PermissionState::default()
            },
        )])),
        ..RoleState::default()
    }
}

fn status_of(error: PluginError) -> StatusCode {
    error.into_response().status()
}

#[tokio::test]
async fn plan_then_apply_creates_role_upstream() {
    let (state, roles_api) = configured_state().await;

    let Ok(Json(plan)) = plan_resource_change_handler(
        State(state.clone()),
        Json(PlanResourceChangeRequest {
            type_name: "authress_role".to_owned(),
            prior_state: None,
            proposed_new_state: Some(editor_config()),
        }),
    )
    .await
    else {
        panic!("plan must succeed once configured");
    };
    assert!(plan.diagnostics.is_empty());
    assert!(
        plan.planned_state
            .as_ref()
            .is_some_and(|planned| planned.last_updated.is_unknown())
    );

    let Ok(Json(applied)) = apply_resource_change_handler(
        State(state),
        Json(ApplyResourceChangeRequest {
            type_name: "authress_role".to_owned(),
            prior_state: None,
            planned_state: plan.planned_state,
        }),
    )
    .await
    else {
        panic!("apply must succeed once configured");
    };

    assert!(applied.diagnostics.is_empty());
    assert_eq!(
        applied
            .new_state
            .as_ref()
            .and_then(|new_state| new_state.id.known().cloned()),
        Some("editor".to_owned())
    );
    let Ok(role_id) = RoleId::new("editor") else {
        panic!("editor is a valid role id");
    };
    assert!(roles_api.get_role(&role_id).await.is_ok());
}

#[tokio::test]
async fn import_then_read_refreshes_every_attribute() {
    let (state, _) = configured_state().await;
    let Ok(Json(created)) = apply_resource_change_handler(
        State(state.clone()),
        Json(ApplyResourceChangeRequest {
            type_name: "authress_role".to_owned(),
            prior_state: None,
            planned_state: Some(editor_config()),
        }),
    )
    .await
    else {
        panic!("create must succeed");
    };
    assert!(created.diagnostics.is_empty());

    let Ok(Json(imported)) = import_resource_state_handler(
        State(state.clone()),
        Json(ImportResourceStateRequest {
            type_name: "authress_role".to_owned(),
            id: "editor".to_owned(),
        }),
    )
    .await
    else {
        panic!("import must succeed");
    };
    let Some(imported) = imported.imported_resources.into_iter().next() else {
        panic!("import must return one resource");
    };
    assert_eq!(imported.type_name, "authress_role");

    let Ok(Json(read)) = read_resource_handler(
        State(state),
        Json(ReadResourceRequest {
            type_name: "authress_role".to_owned(),
            current_state: imported.state,
        }),
    )
    .await
    else {
        panic!("read must succeed");
    };

    let Some(read_state) = read.new_state else {
        panic!("imported role must stay tracked");
    };
    let Some(created_state) = created.new_state else {
        panic!("create must return a state");
    };
    assert_eq!(read_state.name, created_state.name);
    assert_eq!(read_state.permissions, created_state.permissions);
    assert!(read_state.last_updated.is_null());
}

#[tokio::test]
async fn resource_calls_before_configure_are_a_precondition_failure() {
    let (state, _) = plugin_state();

    let result = read_resource_handler(
        State(state),
        Json(ReadResourceRequest {
            type_name: "authress_role".to_owned(),
            current_state: editor_config(),
        }),
    )
    .await;

    let Err(error) = result else {
        panic!("unconfigured provider must refuse reads");
    };
    assert!(matches!(error.0, AppError::Configuration(_)));
    assert_eq!(status_of(error), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn unknown_resource_type_is_not_found() {
    let (state, _) = configured_state().await;

    let result = validate_resource_config_handler(
        State(state),
        Json(ValidateResourceConfigRequest {
            type_name: "authress_group".to_owned(),
            config: editor_config(),
        }),
    )
    .await;

    let Err(error) = result else {
        panic!("unknown type must be rejected");
    };
    assert_eq!(status_of(error), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn apply_without_states_is_a_bad_request() {
    let (state, _) = configured_state().await;

    let result = apply_resource_change_handler(
        State(state),
        Json(ApplyResourceChangeRequest {
            type_name: "authress_role".to_owned(),
            prior_state: None,
            planned_state: None,
        }),
    )
    .await;

    let Err(error) = result else {
        panic!("empty apply must be rejected");
    };
    assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stop_drops_client_and_signals_shutdown() {
    let (state, _) = configured_state().await;

    let _ = stop_provider_handler(State(state.clone())).await;

    let notified = tokio::time::timeout(Duration::from_secs(1), state.shutdown.notified()).await;
    assert!(notified.is_ok());
    let Json(health) = health_handler(State(state)).await;
    assert!(!health.configured);
}

#[tokio::test]
async fn metadata_and_schema_serialize_for_the_host() {
    let (state, _) = plugin_state();

    let Json(metadata) = get_metadata_handler(State(state.clone())).await;
    let Json(schema) = get_provider_schema_handler(State(state)).await;

    let metadata = serde_json::to_value(&metadata).unwrap_or_default();
    let schema = serde_json::to_value(&schema).unwrap_or_default();
    assert_eq!(metadata["provider"]["type_name"], json!("authress"));
    assert_eq!(metadata["diagnostics"], json!([]));
    assert_eq!(
        schema["provider"]["attributes"]["access_key"]["sensitive"],
        json!(true)
    );
    assert!(schema["resource_schemas"]["authress_role"].is_object());
}
