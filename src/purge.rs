use serde_json::Value;

use crate::error::{Error, Result};
use crate::json::{Fields, Object, parse_object};
use crate::service::service_path;
use crate::transport::{JSON_CONTENT_TYPE, Transport};
use crate::util::{purge_target, segment};

/// Cache invalidation endpoints.
///
/// Every purge is a POST with an empty JSON body. A reply whose `status` is not
/// exactly `"ok"` is an [`Error::Purge`] carrying the full reply.
#[derive(Debug, Clone, Copy)]
pub struct Purger<'a> {
    transport: &'a Transport,
}

impl<'a> Purger<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Purges a single URL and returns the purge id. The scheme, if any, is
    /// dropped: `http://example.com/img.png` purges `/purge/example.com/img.png`.
    /// The rest of the URL is sent as given, trailing slash included.
    pub fn purge_url(&self, url: &str) -> Result<String> {
        let full = format!("{}/purge/{}", self.transport.base_url(), purge_target(url));
        let reply = self.post(&full, url)?;
        Fields::new("purge", &reply).required("id")
    }

    /// Purges everything cached for a service.
    pub fn purge_all(&self, service_id: &str) -> Result<()> {
        let path = format!("{}/purge_all", service_path(service_id));
        self.post(&path, &format!("all of service {service_id}"))
            .map(|_| ())
    }

    /// Purges every object tagged with surrogate key `key`.
    pub fn purge_key(&self, service_id: &str, key: &str) -> Result<()> {
        let path = format!("{}/purge/{}", service_path(service_id), segment(key));
        self.post(&path, &format!("key {key} of service {service_id}"))
            .map(|_| ())
    }

    fn post(&self, path: &str, target: &str) -> Result<Object> {
        let body = self.transport.post_raw(path, JSON_CONTENT_TYPE, "")?;
        let reply = parse_object(&body)?;
        check_status(target, reply)
    }
}

fn check_status(target: &str, reply: Object) -> Result<Object> {
    if reply.get("status").and_then(Value::as_str) == Some("ok") {
        return Ok(reply);
    }
    let body = Value::Object(reply);
    log::warn!("purge of {target} was not ok: {body}");
    Err(Error::Purge {
        target: target.to_string(),
        body,
    })
}
