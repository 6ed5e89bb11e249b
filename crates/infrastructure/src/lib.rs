//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_roles_api;
mod in_memory_roles_api;

pub use http_roles_api::{HttpRolesApi, HttpRolesApiFactory, REQUEST_TIMEOUT};
pub use in_memory_roles_api::InMemoryRolesApi;
