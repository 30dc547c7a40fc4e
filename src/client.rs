use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::credentials::BUSINESS_ID_KEY;
use crate::auth::signature::{SIGNATURE_KEY, SIGNATURE_METHOD_KEY};
use crate::auth::{Credentials, SignatureMethod, sign};
use crate::config::ClientConfig;
use crate::params::RequestParams;
use crate::response::ApiResponse;
use crate::{Result, YidunError};

/// Exclusive upper bound of the per-request nonce.
pub const NONCE_BOUND: u32 = 100_000_000;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One remote operation: where to POST and which `version` literal to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path joined to the client's base url, or an absolute `http(s)://` url.
    pub path: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub requires_business_id: bool,
}

impl Endpoint {
    pub const fn new(path: &'static str, version: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            version: Cow::Borrowed(version),
            requires_business_id: true,
        }
    }

    pub fn custom(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: Cow::Owned(path.into()),
            version: Cow::Owned(version.into()),
            requires_business_id: true,
        }
    }

    pub const fn without_business_id(mut self) -> Self {
        self.requires_business_id = false;
        self
    }

    /// Pins the endpoint to `host`, ignoring the client's base url.
    pub fn on_host(mut self, host: &str) -> Self {
        let path = self.path.trim_start_matches('/');
        self.path = Cow::Owned(format!("{}/{path}", host.trim_end_matches('/')));
        self
    }
}

/// Final parameter set of a call, signature included, not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub params: RequestParams,
    pub signature: String,
}

/// Signs and dispatches calls with one set of credentials.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct SignedRequestClient {
    http: reqwest::Client,
    credentials: Credentials,
    base_url: String,
    signature_method: SignatureMethod,
}

impl SignedRequestClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()?;
        Ok(Self::from_parts(config, http))
    }

    /// Uses a caller-built transport; its timeouts apply instead of the config's.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, http))
    }

    fn from_parts(config: ClientConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            credentials: config.credentials,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            signature_method: config.signature_method,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn signature_method(&self) -> SignatureMethod {
        self.signature_method
    }

    pub fn endpoint_url(&self, endpoint: &Endpoint) -> String {
        let path = endpoint.path.trim();
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Injects the auth parameters and signs, without any I/O.
    pub fn prepare(
        &self,
        endpoint: &Endpoint,
        mut params: RequestParams,
        timestamp_ms: i64,
        nonce: u32,
    ) -> Result<SignedRequest> {
        params.remove(SIGNATURE_KEY);
        params.insert("secretId", self.credentials.secret_id());
        if endpoint.requires_business_id {
            let business_id = self.credentials.business_id().ok_or_else(|| {
                YidunError::InvalidConfig(format!(
                    "endpoint {} requires a business id (set {BUSINESS_ID_KEY})",
                    endpoint.path
                ))
            })?;
            params.insert("businessId", business_id);
        }
        params.insert("version", &*endpoint.version);
        params.insert("timestamp", timestamp_ms);
        params.insert("nonce", i64::from(nonce));
        match self.signature_method {
            SignatureMethod::Sm3 => {
                params.insert(SIGNATURE_METHOD_KEY, SignatureMethod::Sm3.as_str());
            }
            SignatureMethod::Md5 => {
                params.remove(SIGNATURE_METHOD_KEY);
            }
        }

        let signature = sign(&params, self.credentials.secret_key(), self.signature_method);
        params.insert(SIGNATURE_KEY, signature.as_str());

        Ok(SignedRequest {
            url: self.endpoint_url(endpoint),
            params,
            signature,
        })
    }

    /// Sends one signed POST and decodes the JSON envelope.
    ///
    /// A `code != 200` reply is still `Ok`; only transport and decode
    /// failures are errors. There is exactly one attempt.
    pub async fn call(&self, endpoint: &Endpoint, params: RequestParams) -> Result<ApiResponse> {
        let nonce = random_nonce();
        let signed = self.prepare(endpoint, params, now_millis(), nonce)?;
        debug!(
            url = %signed.url,
            version = %endpoint.version,
            nonce,
            signature_method = %self.signature_method,
            "dispatching signed request"
        );

        let req = self
            .http
            .post(signed.url.as_str())
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(&signed.params.to_form());
        match crate::utils::http::send_checked_json::<ApiResponse>(req).await {
            Ok(response) => {
                if !response.is_success() {
                    debug!(
                        url = %signed.url,
                        code = response.code,
                        msg = %response.msg,
                        "service returned non-success code"
                    );
                }
                Ok(response)
            }
            Err(err) => {
                warn!(url = %signed.url, error = %err, "signed request failed");
                Err(err)
            }
        }
    }

    /// [`call`](Self::call), then decodes `result` into `T` on success.
    pub async fn call_typed<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: RequestParams,
    ) -> Result<ApiResponse<T>> {
        let response = self.call(endpoint, params).await?;
        response.decode::<T>().inspect_err(|err| {
            warn!(path = %endpoint.path, error = %err, "result payload did not match schema");
        })
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}

fn random_nonce() -> u32 {
    let mut bytes = [0u8; 4];
    if getrandom::fill(&mut bytes).is_err() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.subsec_nanos())
            .unwrap_or(0);
        return nanos % NONCE_BOUND;
    }
    u32::from_le_bytes(bytes) % NONCE_BOUND
}
