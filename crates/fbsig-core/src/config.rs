//! Configuration for the signed-request interceptor and the demo server.
//!
//! All configuration can be driven by environment variables. Loading goes
//! through a lookup function so that tests never have to touch the process
//! environment.

use crate::error::{FbSigError, FbSigResult};

/// Namespace token used by canvas POST parameters (`fb_sig`, `fb_sig_user`, ...).
pub const DEFAULT_SIGNATURE_PREFIX: &str = "fb_sig";

/// Settings shared by both trust paths of the interceptor.
///
/// Immutable once the interceptor is built; the service holds it behind an
/// `Arc` and every request reads from the same instance.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacebookConfig {
    /// Shared secret appended to the canonical string before hashing.
    #[serde(skip_serializing)]
    pub application_secret: String,
    /// API key. Names the signature cookie and prefixes the signed cookies.
    /// The cookie trust path is disabled when unset.
    pub api_key: Option<String>,
    /// Application name, published verbatim as `facebook.app_name`.
    pub application_name: Option<String>,
    /// Prefix of the signed POST parameters. The bare prefix carries the signature.
    #[serde(default = "default_signature_prefix")]
    pub signature_prefix: String,
    /// Whether app name, api key and secret are published on success.
    #[serde(default = "default_publish_metadata")]
    pub publish_metadata: bool,
}

fn default_signature_prefix() -> String {
    DEFAULT_SIGNATURE_PREFIX.to_owned()
}

fn default_publish_metadata() -> bool {
    true
}

impl std::fmt::Debug for FacebookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacebookConfig")
            .field("application_secret", &"...")
            .field("api_key", &self.api_key)
            .field("application_name", &self.application_name)
            .field("signature_prefix", &self.signature_prefix)
            .field("publish_metadata", &self.publish_metadata)
            .finish()
    }
}

impl FacebookConfig {
    /// Create a configuration with the given secret and default settings.
    #[must_use]
    pub fn new(application_secret: impl Into<String>) -> Self {
        Self {
            application_secret: application_secret.into(),
            api_key: None,
            application_name: None,
            signature_prefix: default_signature_prefix(),
            publish_metadata: true,
        }
    }

    /// Set the API key, enabling the cookie trust path.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the application name.
    #[must_use]
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Toggle publishing of app name, api key and secret.
    #[must_use]
    pub fn with_publish_metadata(mut self, publish: bool) -> Self {
        self.publish_metadata = publish;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> FbSigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `FACEBOOK_SECRET` | *(required)* |
    /// | `FACEBOOK_API_KEY` | unset |
    /// | `FACEBOOK_APP_NAME` | unset |
    /// | `FACEBOOK_SIGNATURE_PREFIX` | `fb_sig` |
    /// | `FACEBOOK_PUBLISH_METADATA` | `true` |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FbSigResult<Self> {
        let secret = lookup("FACEBOOK_SECRET").ok_or(FbSigError::MissingSecret)?;
        let mut config = Self::new(secret);

        config.api_key = lookup("FACEBOOK_API_KEY").filter(|v| !v.is_empty());
        config.application_name = lookup("FACEBOOK_APP_NAME").filter(|v| !v.is_empty());
        if let Some(v) = lookup("FACEBOOK_SIGNATURE_PREFIX") {
            config.signature_prefix = v;
        }
        if let Some(v) = lookup("FACEBOOK_PUBLISH_METADATA") {
            config.publish_metadata = parse_flag(&v);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values that would make every request fail
    /// or every signature trivially forgeable.
    pub fn validate(&self) -> FbSigResult<()> {
        if self.application_secret.is_empty() {
            return Err(FbSigError::MissingSecret);
        }
        if self.signature_prefix.is_empty() {
            return Err(FbSigError::Config(
                "signature prefix must not be empty".to_owned(),
            ));
        }
        if self.api_key.as_deref().is_some_and(str::is_empty) {
            return Err(FbSigError::Config("api key must not be empty".to_owned()));
        }
        Ok(())
    }
}

/// Settings for the demo server binary.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind address.
    pub gateway_listen: String,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Only requests whose path starts with this prefix are inspected.
    pub path_prefix: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            gateway_listen: "0.0.0.0:8080".to_owned(),
            log_level: "info".to_owned(),
            path_prefix: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        config.path_prefix = lookup("FACEBOOK_PATH_PREFIX").filter(|v| !v.is_empty());

        config
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
