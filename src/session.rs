use crate::Params;
use crate::backend::Backends;
use crate::config::{SessionConfig, load_config};
use crate::domain::Domains;
use crate::error::{Error, Result};
use crate::purge::Purger;
use crate::service::Services;
use crate::transport::Transport;
use crate::version::{VersionRef, Versions};

/// An authenticated connection to the API.
///
/// Created once by logging in; the session cookie lives in the transport's
/// cookie jar. There is no refresh: when the cookie expires, log in again.
#[derive(Debug, Clone)]
pub struct Session {
    user: String,
    transport: Transport,
}

impl Session {
    /// Logs in with explicit credentials. `base_url` defaults to
    /// `https://api.fastly.com`.
    pub fn login(username: &str, password: &str, base_url: Option<&str>) -> Result<Self> {
        let mut cfg = SessionConfig::new(username, password);
        if let Some(url) = base_url {
            cfg = cfg.with_url(url);
        }
        Self::with_config(cfg)
    }

    /// Logs in using `FASTLY_USER` / `FASTLY_PASSWORD` / `FASTLY_URL` and/or a
    /// `.fastlyrc` file.
    pub fn from_env() -> Result<Self> {
        Self::with_config(load_config(None, None, None)?)
    }

    /// Logs in with a fully specified configuration, timeouts included.
    pub fn with_config(cfg: SessionConfig) -> Result<Self> {
        let transport = Transport::new(&cfg)?;

        let form = Params::from([
            ("user".to_string(), cfg.user.clone()),
            ("password".to_string(), cfg.password.clone()),
        ]);
        let url = transport.url("/login");
        let req = transport.http().post(&url).form(&form);
        let resp = transport.send("POST", &url, req)?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("login as {} failed with HTTP {status}", cfg.user);
            return Err(Error::Auth {
                status: status.as_u16(),
            });
        }

        log::info!("logged in to {} as {}", transport.base_url(), cfg.user);
        Ok(Self {
            user: cfg.user,
            transport,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Raw verb helpers, for endpoints this crate does not wrap.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn services(&self) -> Services<'_> {
        Services::new(&self.transport)
    }

    pub fn versions(&self, service_id: &str) -> Versions<'_> {
        Versions::new(&self.transport, service_id)
    }

    pub fn domains(&self, version: &VersionRef) -> Domains<'_> {
        Domains::new(&self.transport, version.clone())
    }

    pub fn backends(&self, version: &VersionRef) -> Backends<'_> {
        Backends::new(&self.transport, version.clone())
    }

    pub fn purge(&self) -> Purger<'_> {
        Purger::new(&self.transport)
    }
}
