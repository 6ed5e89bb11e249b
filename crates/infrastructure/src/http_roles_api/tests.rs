use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use authress_application::{ProviderSettings, RolesApi};
use authress_core::AppError;
use authress_domain::{PermissionAction, PermissionGrant, Role, RoleId, RoleName};

use super::HttpRolesApi;

const ACCESS_KEY: &str = "sk_test_key";

#[derive(Clone, Default)]
struct FakeAuthress {
    roles: Arc<Mutex<BTreeMap<String, Value>>>,
    user_agents: Arc<Mutex<Vec<String>>>,
}

impl FakeAuthress {
    async fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        self.user_agents.lock().await.push(user_agent);

        let expected = format!("Bearer {ACCESS_KEY}");
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some(expected.as_str());

        if authorized {
            Ok(())
        } else {
            Err((StatusCode::UNAUTHORIZED, r#"{"title":"Unauthorized"}"#).into_response())
        }
    }
}

async fn list_roles(State(fake): State<FakeAuthress>, headers: HeaderMap) -> Response {
    if let Err(response) = fake.authorize(&headers).await {
        return response;
    }
    let roles: Vec<Value> = fake.roles.lock().await.values().cloned().collect();
    Json(json!({ "roles": roles })).into_response()
}

async fn create_role(
    State(fake): State<FakeAuthress>,
    headers: HeaderMap,
    Json(role): Json<Value>,
) -> Response {
    if let Err(response) = fake.authorize(&headers).await {
        return response;
    }
    let role_id = role["roleId"].as_str().unwrap_or_default().to_owned();
    let mut roles = fake.roles.lock().await;
    if roles.contains_key(role_id.as_str()) {
        return (StatusCode::CONFLICT, r#"{"title":"Role already exists"}"#).into_response();
    }
    roles.insert(role_id, role.clone());
    Json(role).into_response()
}

async fn get_role(
    State(fake): State<FakeAuthress>,
    Path(role_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = fake.authorize(&headers).await {
        return response;
    }
    match fake.roles.lock().await.get(role_id.as_str()) {
        Some(role) => Json(role.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"title":"Role not found"}"#).into_response(),
    }
}

async fn update_role(
    State(fake): State<FakeAuthress>,
    Path(role_id): Path<String>,
    headers: HeaderMap,
    Json(role): Json<Value>,
) -> Response {
    if let Err(response) = fake.authorize(&headers).await {
        return response;
    }
    fake.roles.lock().await.insert(role_id, role.clone());
    Json(role).into_response()
}

async fn delete_role(
    State(fake): State<FakeAuthress>,
    Path(role_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = fake.authorize(&headers).await {
        return response;
    }
    fake.roles.lock().await.remove(role_id.as_str());
    StatusCode::OK.into_response()
}

async fn serve(router: Router) -> String {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind fake Authress listener");
    };
    let Ok(address) = listener.local_addr() else {
        panic!("fake Authress listener has no local address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{address}")
}

async fn fake_authress() -> (String, FakeAuthress) {
    let fake = FakeAuthress::default();
    let router = Router::new()
        .route("/v1/roles", get(list_roles).post(create_role))
        .route(
            "/v1/roles/{role_id}",
            get(get_role).put(update_role).delete(delete_role),
        )
        .with_state(fake.clone());

    (serve(router).await, fake)
}

fn client(base_url: &str, access_key: &str) -> HttpRolesApi {
    let Ok(settings) = ProviderSettings::new(base_url, access_key) else {
        panic!("test settings must be valid");
    };
    let Ok(client) = HttpRolesApi::new(&settings, "0.1.0") else {
        panic!("test client must build");
    };
    client
}

fn role(role_id: &str, actions: &[&str]) -> Role {
    let permissions: BTreeMap<_, _> = actions
        .iter()
        .filter_map(|action| PermissionAction::new(*action).ok())
        .map(|action| (action, PermissionGrant::allow_only()))
        .collect();

    let role = RoleId::new(role_id).and_then(|role_id| {
        Role::new(
            role_id,
            RoleName::new("Editor")?,
            Some("Edits documents".to_owned()),
            permissions,
        )
    });
    let Ok(role) = role else {
        panic!("test role must be valid");
    };
    role
}

#[tokio::test]
async fn create_then_get_returns_matching_role() {
    let (base_url, fake) = fake_authress().await;
    let client = client(base_url.as_str(), ACCESS_KEY);
    let editor = role("editor", &["documents:read", "documents:*"]);

    let created = client.create_role(&editor).await;
    assert!(matches!(created.as_ref(), Ok(created) if created == &editor));

    let fetched = client.get_role(editor.role_id()).await;
    assert!(matches!(fetched.as_ref(), Ok(fetched) if fetched == &editor));

    let stored = fake.roles.lock().await;
    assert_eq!(stored["editor"]["roleId"], "editor");
    assert_eq!(stored["editor"]["permissions"][0]["allow"], true);
}

#[tokio::test]
async fn requests_carry_version_tagged_user_agent() {
    let (base_url, fake) = fake_authress().await;
    let client = client(base_url.as_str(), ACCESS_KEY);

    let listed = client.list_roles().await;

    assert!(matches!(listed.as_deref(), Ok([])));
    assert_eq!(
        fake.user_agents.lock().await.clone(),
        vec!["Terraform SDK 0.1.0".to_owned()]
    );
}

#[tokio::test]
async fn list_roles_decodes_wrapped_payload() {
    let (base_url, _) = fake_authress().await;
    let client = client(base_url.as_str(), ACCESS_KEY);
    for role_id in ["viewer", "editor"] {
        assert!(client.create_role(&role(role_id, &["documents:read"])).await.is_ok());
    }

    let listed = client.list_roles().await.unwrap_or_default();

    assert_eq!(
        listed
            .iter()
            .map(|role| role.role_id().as_str())
            .collect::<Vec<_>>(),
        vec!["editor", "viewer"]
    );
}

#[tokio::test]
async fn update_replaces_permissions() {
    let (base_url, fake) = fake_authress().await;
    let client = client(base_url.as_str(), ACCESS_KEY);
    let editor = role("editor", &["documents:read", "documents:write"]);
    assert!(client.create_role(&editor).await.is_ok());

    let reduced = role("editor", &["documents:read"]);
    let updated = client.update_role(reduced.role_id(), &reduced).await;

    assert!(matches!(updated.as_ref(), Ok(updated) if updated.permissions().len() == 1));
    assert_eq!(
        fake.roles.lock().await["editor"]["permissions"]
            .as_array()
            .map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn delete_then_get_reports_remote_not_found() {
    let (base_url, _) = fake_authress().await;
    let client = client(base_url.as_str(), ACCESS_KEY);
    let editor = role("editor", &["documents:read"]);
    assert!(client.create_role(&editor).await.is_ok());

    assert!(client.delete_role(editor.role_id()).await.is_ok());
    let fetched = client.get_role(editor.role_id()).await;

    assert!(matches!(
        fetched,
        Err(AppError::Remote { status: 404, ref body }) if body.contains("Role not found")
    ));
}

#[tokio::test]
async fn non_200_status_carries_status_and_body() {
    let (base_url, _) = fake_authress().await;
    let client = client(base_url.as_str(), "wrong-key");

    let result = client.list_roles().await;

    let Err(error) = result else {
        panic!("unauthorized call must fail");
    };
    assert_eq!(error.remote_status(), Some(401));
    assert_eq!(
        error.to_string(),
        r#"status: 401, body: {"title":"Unauthorized"}"#
    );
}

#[tokio::test]
async fn html_page_is_reported_as_decode_error_with_body() {
    let router = Router::new().fallback(|| async {
        Html("<!DOCTYPE html><html><body>Marketing site</body></html>")
    });
    let base_url = serve(router).await;
    let client = client(base_url.as_str(), ACCESS_KEY);

    let result = client.get_role(role("editor", &[]).role_id()).await;

    let Err(error) = result else {
        panic!("html must not decode as a role");
    };
    assert!(matches!(error, AppError::Decode { .. }));
    assert!(error.indicates_html_response());
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let client = client("http://127.0.0.1:9", ACCESS_KEY);

    let result = client.list_roles().await;

    assert!(matches!(result, Err(AppError::Transport(_))));
}

#[tokio::test]
async fn role_edited_outside_terraform_is_returned_as_stored() {
    let (base_url, fake) = fake_authress().await;
    fake.roles.lock().await.insert(
        "editor".to_owned(),
        json!({
            "roleId": "editor",
            "name": "Editor",
            "permissions": [{ "action": "documents.read", "allow": true }]
        }),
    );
    let client = client(base_url.as_str(), ACCESS_KEY);

    let fetched = client.get_role(role("editor", &[]).role_id()).await;

    let Ok(fetched) = fetched else {
        panic!("stored role must refresh");
    };
    assert_eq!(
        fetched
            .permissions()
            .iter()
            .map(|(action, grant)| (action.as_str(), grant.allow, grant.grant))
            .collect::<Vec<_>>(),
        vec![("documents.read", true, false)]
    );
    assert_eq!(fetched.description(), None);
}
