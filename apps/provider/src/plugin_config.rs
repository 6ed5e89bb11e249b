use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use authress_core::{AppError, AppResult};

/// Environment variable the plugin host sets before launching the provider.
pub const MAGIC_COOKIE_KEY: &str = "TF_PLUGIN_MAGIC_COOKIE";

/// Expected value of [`MAGIC_COOKIE_KEY`].
pub const MAGIC_COOKIE_VALUE: &str =
    "d602bf8f470bc67ca7faa0386276bbdd4330efaf76d1a219cb4d6991ca9872b2";

/// Plugin protocol version announced in the handshake.
pub const PROTOCOL_VERSION: u8 = 6;

/// Runtime settings of the plugin process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub address: SocketAddr,
}

impl PluginConfig {
    /// Loads settings from the process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        if lookup(MAGIC_COOKIE_KEY).as_deref() != Some(MAGIC_COOKIE_VALUE) {
            return Err(AppError::Configuration(
                "This binary is a plugin. These are not meant to be executed directly. \
                 Please execute the program that consumes these plugins, which will \
                 load any plugins automatically"
                    .to_owned(),
            ));
        }

        let host = lookup("AUTHRESS_PROVIDER_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let port = match lookup("AUTHRESS_PROVIDER_PORT") {
            Some(value) => value.parse::<u16>().map_err(|error| {
                AppError::Validation(format!("invalid AUTHRESS_PROVIDER_PORT '{value}': {error}"))
            })?,
            None => 0,
        };

        let host = IpAddr::from_str(host.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid AUTHRESS_PROVIDER_HOST '{host}': {error}"))
        })?;

        Ok(Self {
            address: SocketAddr::from((host, port)),
        })
    }
}

/// Line printed to stdout so the host can connect to the plugin.
#[must_use]
pub fn handshake_line(address: SocketAddr) -> String {
    format!("1|{PROTOCOL_VERSION}|tcp|{address}|jsonrpc")
}
