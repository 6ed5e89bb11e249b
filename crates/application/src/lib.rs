//! Application services and ports for the Authress provider.

#![forbid(unsafe_code)]

mod provider_config;
mod provider_service;
mod role_resource;
mod roles_api;
mod schema;

pub use provider_config::{
    ACCESS_KEY_ENV, ProviderConfig, ProviderSettings, normalize_custom_domain,
    resolve_provider_settings,
};
pub use provider_service::{AuthressProvider, EnvLookup, ProviderMetadata};
pub use role_resource::{
    INVALID_CUSTOM_DOMAIN_MESSAGE, LifecycleResult, PermissionState, PlanResult, RoleResource,
    RoleState, remote_error_detail, role_from_state, state_from_role, validate_role_config,
};
pub use roles_api::{RolesApi, RolesApiFactory};
pub use schema::{
    Attribute, AttributeType, PROVIDER_TYPE_NAME, ProviderSchema, ROLE_RESOURCE_TYPE, Schema,
    provider_block_schema, provider_schema, role_schema,
};
