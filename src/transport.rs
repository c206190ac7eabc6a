use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::Params;
use crate::config::SessionConfig;
use crate::error::{Result, api_error};
use crate::util::{encode_form, make_url, truncate_for_log};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Blocking HTTP transport bound to one base URL.
///
/// The underlying client keeps a cookie jar, so the session cookie set by
/// `POST /login` rides along on every later request. Each verb helper returns
/// the raw body of a successful (< 400) response.
#[derive(Debug, Clone)]
pub struct Transport {
    base_url: String,
    http: HttpClient,
}

impl Transport {
    pub(crate) fn new(cfg: &SessionConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("cdnapi-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("cdnapi-rs")),
        );

        let mut builder = HttpClient::builder()
            .default_headers(default_headers)
            .cookie_store(true)
            .connect_timeout(cfg.connect_timeout)
            .timeout(cfg.read_timeout);

        if !cfg.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            base_url: cfg.url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `path`, cleaned and joined onto the base URL.
    pub fn url(&self, path: &str) -> String {
        make_url(&self.base_url, path)
    }

    pub fn get(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        self.execute("GET", &url, self.http.get(&url))
    }

    pub fn get_with_query(&self, path: &str, params: &Params) -> Result<String> {
        let url = self.url(path);
        self.execute("GET", &url, self.http.get(&url).query(params))
    }

    pub fn post_form(&self, path: &str, params: &Params) -> Result<String> {
        let url = self.url(path);
        self.execute("POST", &url, self.http.post(&url).form(params))
    }

    pub fn post_raw(&self, path: &str, content_type: &str, body: impl Into<String>) -> Result<String> {
        let url = self.url(path);
        let req = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(body.into());
        self.execute("POST", &url, req)
    }

    /// PUT with `params` url-encoded as the body, sent under `content_type`.
    pub fn put(&self, path: &str, params: &Params, content_type: &str) -> Result<String> {
        let url = self.url(path);
        let req = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .body(encode_form(params));
        self.execute("PUT", &url, req)
    }

    pub fn delete(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        self.execute("DELETE", &url, self.http.delete(&url))
    }

    /// Sends a request without interpreting its status. Used by the login
    /// handshake, which maps failures to `Error::Auth` instead of `Error::Api`.
    pub(crate) fn send(&self, method: &str, url: &str, req: RequestBuilder) -> Result<Response> {
        log::debug!("{method} {url}");
        let resp = req.send()?;
        log::debug!("{method} {url} -> {}", resp.status());
        Ok(resp)
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    fn execute(&self, method: &str, url: &str, req: RequestBuilder) -> Result<String> {
        let resp = self.send(method, url, req)?;
        let status = resp.status();
        let text = resp.text()?;

        if status.as_u16() >= 400 {
            log::warn!(
                "{method} {url} failed with HTTP {status}: {}",
                truncate_for_log(&text)
            );
            return Err(api_error(status, &text));
        }

        log::debug!("response body: {}", truncate_for_log(&text));
        Ok(text)
    }
}
