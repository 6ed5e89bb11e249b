use std::sync::Arc;

use authress_application::AuthressProvider;
use tokio::sync::Notify;

/// Shared plugin state.
#[derive(Clone)]
pub struct PluginState {
    pub provider: AuthressProvider,
    pub shutdown: Arc<Notify>,
}
