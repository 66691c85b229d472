//! Request construction and dispatch shared by every API operation.

use std::future::Future;
use std::time::Instant;

use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, Method, StatusCode};
use reqwest::{Request, Url};

use crate::configuration::{Configuration, ConfigurationError, Credentials};
use crate::error::{ApiError, Error};
use crate::model::{Decoded, Model, decode};

#[cfg(any(test, feature = "testing"))]
mod replay;

#[cfg(any(test, feature = "testing"))]
pub use replay::{RecordedRequest, ReplayTransport};

const JSON: &str = "application/json";

/// Sends a prepared request and collects the whole response.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<http::Response<Vec<u8>>, Error>> + Send;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<http::Response<Vec<u8>>, Error> {
        let response = self.client.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

/// A decoded response together with its status and headers.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub value: T,
}

#[derive(Debug)]
pub struct ApiClient<T = ReqwestTransport> {
    config: Configuration,
    client: reqwest::Client,
    transport: T,
}

fn build_client(config: &Configuration) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

impl ApiClient<ReqwestTransport> {
    pub fn new(config: Configuration) -> Result<Self, Error> {
        let client = build_client(&config)?;
        Ok(Self {
            transport: ReqwestTransport::new(client.clone()),
            client,
            config,
        })
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: Configuration, transport: T) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(&config)?,
            config,
            transport,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the request for `operation`.
    ///
    /// `segments` are appended to the server URL's path one by one and
    /// percent-encoded, so a `/` inside a parameter stays inside its
    /// segment.
    pub fn prepare_request(
        &self,
        operation: &str,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<Request, Error> {
        let base = self.config.server_url_for(operation)?;
        let invalid = |reason: &str| ConfigurationError::InvalidUrl {
            url: base.clone(),
            reason: reason.to_owned(),
        };
        let mut url = Url::parse(&base).map_err(|err| invalid(&err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, JSON)
            .header(USER_AGENT, &self.config.user_agent);
        for (name, value) in &self.config.default_headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, JSON).body(body);
        }
        builder = match &self.config.credentials {
            Some(Credentials::ApiKey { header, value }) => builder.header(header.as_str(), value.as_str()),
            Some(Credentials::BasicAuth { username, password }) => {
                builder.basic_auth(username, password.as_ref())
            }
            None => builder,
        };
        Ok(builder.build()?)
    }

    /// Sends `request`, retrying throttled and failed attempts as the
    /// retry configuration allows.
    pub async fn call_api(&self, request: Request) -> Result<http::Response<Vec<u8>>, Error> {
        let retry = &self.config.retry;
        let started = Instant::now();
        let mut retry_count = 0;
        loop {
            let attempt = request.try_clone().ok_or(Error::UnclonableRequest)?;
            if self.config.debug {
                dump_request(&attempt);
            }
            let response = self.transport.execute(attempt).await?;
            if self.config.debug {
                dump_response(&response);
            }

            let status = response.status();
            if !retry.should_retry(status, retry_count) {
                return Ok(response);
            }
            let wait = retry.back_off(status, response.headers(), retry_count);
            if started.elapsed() + wait > retry.http_retry_timeout {
                return Ok(response);
            }
            retry_count += 1;
            log::warn!(
                "{} {} returned {status}, retry {retry_count} of {} in {wait:?}",
                request.method(),
                request.url(),
                retry.max_retries,
            );
            tokio::time::sleep(wait).await;
        }
    }
}

fn dump_request(request: &Request) {
    let body = request
        .body()
        .and_then(|body| body.as_bytes())
        .map(String::from_utf8_lossy)
        .unwrap_or_default();
    log::debug!(
        "request: {} {}\n{:?}\n{body}",
        request.method(),
        request.url(),
        request.headers(),
    );
}

fn dump_response(response: &http::Response<Vec<u8>>) {
    log::debug!(
        "response: {}\n{:?}\n{}",
        response.status(),
        response.headers(),
        String::from_utf8_lossy(response.body()),
    );
}

fn check_status(
    response: http::Response<Vec<u8>>,
) -> Result<(http::response::Parts, Vec<u8>), ApiError> {
    let (parts, body) = response.into_parts();
    if parts.status.as_u16() >= 300 {
        return Err(ApiError {
            status: parts.status,
            headers: parts.headers,
            body,
        });
    }
    Ok((parts, body))
}

/// Turns a response into its model, or an [`ApiError`] for statuses of
/// 300 and above.
pub fn decode_response<M: Model>(
    response: http::Response<Vec<u8>>,
) -> Result<ApiResponse<Decoded<M>>, Error> {
    let (parts, body) = check_status(response)?;
    Ok(ApiResponse {
        status: parts.status,
        headers: parts.headers,
        value: decode::<M>(&body)?,
    })
}

/// For operations without a response body.
pub fn expect_empty(response: http::Response<Vec<u8>>) -> Result<ApiResponse<()>, Error> {
    let (parts, _) = check_status(response)?;
    Ok(ApiResponse {
        status: parts.status,
        headers: parts.headers,
        value: (),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::HeaderValue;

    use super::*;
    use crate::configuration::{RetryConfiguration, ServerConfiguration};

    fn config() -> Configuration {
        let mut config = Configuration::new();
        config.servers = vec![ServerConfiguration::new("http://kb.test/base/", "test")];
        config
    }

    fn quick_retry(max_retries: u32) -> RetryConfiguration {
        RetryConfiguration {
            enable_retry: true,
            back_off_base: Duration::ZERO,
            max_retries,
            ..RetryConfiguration::default()
        }
    }

    #[test_log::test]
    fn test_prepare_request() -> anyhow::Result<()> {
        let mut config = config();
        config.add_default_header("X-Trace", "abc")?;
        config.credentials = Some(Credentials::ApiKey {
            header: "X-Api-Key".to_owned(),
            value: "secret".to_owned(),
        });
        let client = ApiClient::with_transport(config, ReplayTransport::new())?;
        let request = client.prepare_request(
            "Test.op",
            Method::PATCH,
            &["api", "v1", "organizations", "my org/one"],
            &[("page", "2".to_owned())],
            Some(b"{}".to_vec()),
        )?;

        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(
            request.url().as_str(),
            "http://kb.test/base/api/v1/organizations/my%20org%2Fone?page=2"
        );
        let headers = request.headers();
        assert_eq!(headers[ACCEPT], JSON);
        assert_eq!(headers[CONTENT_TYPE], JSON);
        assert_eq!(headers["x-trace"], "abc");
        assert_eq!(headers["x-api-key"], "secret");
        assert!(headers.contains_key(USER_AGENT));
        Ok(())
    }

    #[test_log::test]
    fn test_basic_auth_and_no_body() -> anyhow::Result<()> {
        let mut config = config();
        config.credentials = Some(Credentials::BasicAuth {
            username: "name".to_owned(),
            password: Some("secret".to_owned()),
        });
        let client = ApiClient::with_transport(config, ReplayTransport::new())?;
        let request = client.prepare_request("Test.op", Method::GET, &["x"], &[], None)?;
        assert_eq!(request.url().as_str(), "http://kb.test/base/x");
        assert!(!request.headers().contains_key(CONTENT_TYPE));
        // base64("name:secret")
        assert_eq!(request.headers()["authorization"], "Basic bmFtZTpzZWNyZXQ=");
        Ok(())
    }

    #[test_log::test]
    fn test_bad_server_url() -> anyhow::Result<()> {
        let mut config = config();
        config.servers = vec![ServerConfiguration::new("not a url", "")];
        let client = ApiClient::with_transport(config, ReplayTransport::new())?;
        let err = client
            .prepare_request("Test.op", Method::GET, &[], &[], None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::InvalidUrl { .. })
        ));
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_retries_until_success() -> anyhow::Result<()> {
        let mut config = config();
        config.retry = quick_retry(3);
        config.debug = true;
        let transport = ReplayTransport::new()
            .respond(StatusCode::SERVICE_UNAVAILABLE, b"")
            .respond(StatusCode::TOO_MANY_REQUESTS, b"")
            .respond(StatusCode::OK, b"{}");
        let client = ApiClient::with_transport(config, transport)?;
        let request = client.prepare_request("Test.op", Method::GET, &["x"], &[], None)?;

        let response = client.call_api(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(client.transport().requests().len(), 3);
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_gives_up_after_max_retries() -> anyhow::Result<()> {
        let mut config = config();
        config.retry = quick_retry(1);
        let transport = ReplayTransport::new()
            .respond(StatusCode::BAD_GATEWAY, b"")
            .respond(StatusCode::BAD_GATEWAY, b"")
            .respond(StatusCode::OK, b"");
        let client = ApiClient::with_transport(config, transport)?;
        let request = client.prepare_request("Test.op", Method::GET, &["x"], &[], None)?;

        let response = client.call_api(request).await?;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(client.transport().requests().len(), 2);
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_rate_limit_reset_past_timeout_stops() -> anyhow::Result<()> {
        let mut config = config();
        config.retry = RetryConfiguration {
            http_retry_timeout: Duration::from_secs(1),
            ..quick_retry(3)
        };
        let mut throttled = http::Response::new(Vec::new());
        *throttled.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        throttled
            .headers_mut()
            .insert("x-ratelimit-reset", HeaderValue::from_static("30"));
        let transport = ReplayTransport::new().respond_with(throttled);
        let client = ApiClient::with_transport(config, transport)?;
        let request = client.prepare_request("Test.op", Method::GET, &["x"], &[], None)?;

        let response = client.call_api(request).await?;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(client.transport().requests().len(), 1);
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_exhausted_replay() -> anyhow::Result<()> {
        let client = ApiClient::with_transport(config(), ReplayTransport::new())?;
        let request = client.prepare_request("Test.op", Method::GET, &["x"], &[], None)?;
        let err = client.call_api(request).await.unwrap_err();
        assert!(matches!(err, Error::ReplayExhausted));
        Ok(())
    }

    #[test_log::test]
    fn test_status_handling() {
        let mut response = http::Response::new(b"{\"message\":\"gone\"}".to_vec());
        *response.status_mut() = StatusCode::NOT_FOUND;
        let err = expect_empty(response).unwrap_err();
        match err {
            Error::Api(api) => {
                assert_eq!(api.status, StatusCode::NOT_FOUND);
                assert_eq!(api.json(), Some(serde_json::json!({"message": "gone"})));
                assert_eq!(
                    api.to_string(),
                    "server responded with 404 Not Found: {\"message\":\"gone\"}"
                );
            }
            other => panic!("expected an API error, got {other}"),
        }

        let mut response = http::Response::new(Vec::new());
        *response.status_mut() = StatusCode::NO_CONTENT;
        assert_eq!(expect_empty(response).unwrap().status, StatusCode::NO_CONTENT);
    }
}
