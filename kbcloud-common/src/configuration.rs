//! Client configuration: target servers, credentials, headers and the
//! retry policy.

use std::collections::HashMap;
use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue};
use http::StatusCode;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").unwrap();
}

const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("server index {index} out of range, {len} servers configured")]
    ServerIndexOutOfRange { index: usize, len: usize },
    #[error("the variable {name} in the server URL has invalid value {value}, must be one of {allowed:?}")]
    InvalidServerVariable {
        name: String,
        value: String,
        allowed: Vec<String>,
    },
    #[error("invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerVariable {
    pub default_value: String,
    /// Permitted values. Empty means any value is accepted.
    pub enum_values: Vec<String>,
}

impl ServerVariable {
    pub fn new(default_value: &str, enum_values: &[&str]) -> Self {
        Self {
            default_value: default_value.to_owned(),
            enum_values: enum_values.iter().map(|v| (*v).to_owned()).collect(),
        }
    }
}

/// A server URL template. `{name}` placeholders are filled from
/// `variables`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfiguration {
    pub url: String,
    pub description: String,
    pub variables: IndexMap<String, ServerVariable>,
}

impl ServerConfiguration {
    pub fn new(url: &str, description: &str) -> Self {
        Self {
            url: url.to_owned(),
            description: description.to_owned(),
            variables: IndexMap::new(),
        }
    }

    pub fn with_variable(mut self, name: &str, variable: ServerVariable) -> Self {
        self.variables.insert(name.to_owned(), variable);
        self
    }

    /// Substitutes the template's placeholders. Variables not given in
    /// `values` take their default.
    pub fn url(&self, values: &HashMap<String, String>) -> Result<String, ConfigurationError> {
        let mut resolved = HashMap::with_capacity(self.variables.len());
        for (name, variable) in &self.variables {
            let value = values.get(name).unwrap_or(&variable.default_value);
            if !variable.enum_values.is_empty() && !variable.enum_values.contains(value) {
                return Err(ConfigurationError::InvalidServerVariable {
                    name: name.clone(),
                    value: value.clone(),
                    allowed: variable.enum_values.clone(),
                });
            }
            resolved.insert(name.as_str(), value.as_str());
        }
        let url = PLACEHOLDER.replace_all(&self.url, |caps: &Captures| {
            match resolved.get(&caps[1]) {
                Some(value) => (*value).to_owned(),
                None => caps[0].to_owned(),
            }
        });
        Ok(url.into_owned())
    }
}

/// Resolves `servers[index]`.
pub fn server_url(
    servers: &[ServerConfiguration],
    index: usize,
    values: &HashMap<String, String>,
) -> Result<String, ConfigurationError> {
    servers
        .get(index)
        .ok_or(ConfigurationError::ServerIndexOutOfRange {
            index,
            len: servers.len(),
        })?
        .url(values)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    /// Sent as `name: value` on every request.
    ApiKey { header: String, value: String },
    BasicAuth {
        username: String,
        password: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfiguration {
    pub enable_retry: bool,
    pub back_off_multiplier: f64,
    pub back_off_base: Duration,
    pub http_retry_timeout: Duration,
    pub max_retries: u32,
}

impl Default for RetryConfiguration {
    fn default() -> Self {
        Self {
            enable_retry: false,
            back_off_multiplier: 2.0,
            back_off_base: Duration::from_secs(2),
            http_retry_timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

impl RetryConfiguration {
    /// Whether a response with `status` is retried after `retry_count`
    /// earlier retries.
    pub fn should_retry(&self, status: StatusCode, retry_count: u32) -> bool {
        self.enable_retry
            && retry_count < self.max_retries
            && (status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
    }

    /// How long to wait before retry number `retry_count`.
    ///
    /// A rate limited response carrying `x-ratelimit-reset` is honored as
    /// is. Otherwise the wait grows geometrically from `back_off_base`.
    pub fn back_off(&self, status: StatusCode, headers: &HeaderMap, retry_count: u32) -> Duration {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset = headers
                .get(RATE_LIMIT_RESET)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            if let Some(seconds) = reset {
                return Duration::from_secs(seconds);
            }
        }
        let factor = self.back_off_multiplier.powi(retry_count as i32);
        Duration::try_from_secs_f64(self.back_off_base.as_secs_f64() * factor)
            .unwrap_or(self.http_retry_timeout)
    }
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub servers: Vec<ServerConfiguration>,
    pub server_index: usize,
    pub server_variables: HashMap<String, String>,
    /// Server lists that replace `servers` for single operations.
    pub operation_servers: HashMap<String, Vec<ServerConfiguration>>,
    pub operation_server_indices: HashMap<String, usize>,
    pub default_headers: HeaderMap,
    pub user_agent: String,
    /// Dumps every request and response at debug level.
    pub debug: bool,
    pub timeout: Option<Duration>,
    pub credentials: Option<Credentials>,
    pub retry: RetryConfiguration,
}

/// The index of the templated `{protocol}://{site}` server.
pub const SITE_SERVER_INDEX: usize = 2;

fn default_servers() -> Vec<ServerConfiguration> {
    vec![
        ServerConfiguration::new("https://api.apecloud.com", "KB Cloud"),
        ServerConfiguration::new("http://localhost:8080", "Local development server"),
        ServerConfiguration::new("{protocol}://{site}", "Any KB Cloud deployment")
            .with_variable("protocol", ServerVariable::new("https", &["https", "http"]))
            .with_variable("site", ServerVariable::new("api.apecloud.com", &[])),
    ]
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            server_index: 0,
            server_variables: HashMap::new(),
            operation_servers: HashMap::new(),
            operation_server_indices: HashMap::new(),
            default_headers: HeaderMap::new(),
            user_agent: format!(
                "kbcloud-client-rust/{} (os {}; arch {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH,
            ),
            debug: false,
            timeout: None,
            credentials: None,
            retry: RetryConfiguration::default(),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `KB_CLOUD_SITE`, `KB_CLOUD_API_KEY_NAME`,
    /// `KB_CLOUD_API_KEY_SECRET` and `KB_CLOUD_DEBUG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(site) = lookup("KB_CLOUD_SITE") {
            config.server_index = SITE_SERVER_INDEX;
            config.server_variables.insert("site".to_owned(), site);
        }
        if let Some(username) = lookup("KB_CLOUD_API_KEY_NAME") {
            config.credentials = Some(Credentials::BasicAuth {
                username,
                password: lookup("KB_CLOUD_API_KEY_SECRET"),
            });
        }
        config.debug = lookup("KB_CLOUD_DEBUG").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        config
    }

    pub fn add_default_header(&mut self, name: &str, value: &str) -> Result<(), ConfigurationError> {
        let name = HeaderName::try_from(name)?;
        let value = HeaderValue::try_from(value)?;
        self.default_headers.insert(name, value);
        Ok(())
    }

    pub fn set_operation_servers(&mut self, operation: &str, servers: Vec<ServerConfiguration>) {
        self.operation_servers.insert(operation.to_owned(), servers);
    }

    pub fn server_url(
        &self,
        index: usize,
        values: &HashMap<String, String>,
    ) -> Result<String, ConfigurationError> {
        server_url(&self.servers, index, values)
    }

    /// The base URL for `operation`: its own server list if one is
    /// registered, the global one otherwise.
    pub fn server_url_for(&self, operation: &str) -> Result<String, ConfigurationError> {
        match self.operation_servers.get(operation) {
            Some(servers) => {
                let index = self
                    .operation_server_indices
                    .get(operation)
                    .copied()
                    .unwrap_or_default();
                server_url(servers, index, &self.server_variables)
            }
            None => self.server_url(self.server_index, &self.server_variables),
        }
    }
}
