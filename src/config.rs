use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.fastly.com";
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything needed to open a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base API URL, `https://api.fastly.com` unless overridden.
    pub url: String,
    /// Account login (usually an e-mail address).
    pub user: String,
    pub password: String,
    /// Whether to verify TLS certificates.
    pub verify: bool,
    /// Upper bound on establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    /// Upper bound on a whole request, reading the response included.
    pub read_timeout: Duration,
}

impl SessionConfig {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            user: user.into(),
            password: password.into(),
            verify: true,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Overrides the base URL. An empty string keeps the current one.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.is_empty() {
            self.url = url;
        }
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    user: Option<String>,
    password: Option<String>,
    verify: Option<bool>,
}

/// Resolves the configuration from (in order of precedence) explicit arguments,
/// `FASTLY_USER` / `FASTLY_PASSWORD` / `FASTLY_URL`, then a `.fastlyrc` file.
pub(crate) fn load_config(
    user: Option<String>,
    password: Option<String>,
    url: Option<String>,
) -> Result<SessionConfig> {
    resolve(user, password, url, |key| std::env::var(key).ok())
}

fn resolve(
    user: Option<String>,
    password: Option<String>,
    url: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SessionConfig> {
    // Set-but-empty variables count as unset.
    let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

    let mut user = user.or_else(|| lookup("FASTLY_USER"));
    let mut password = password.or_else(|| lookup("FASTLY_PASSWORD"));
    let mut url = url.or_else(|| lookup("FASTLY_URL"));

    let rc_candidates = rc_candidates(lookup("FASTLY_RC"));
    let mut file_verify: Option<bool> = None;

    for rc_path in &rc_candidates {
        if rc_path.exists() {
            let cfg = read_rc(rc_path).map_err(|e| {
                Error::Config(format!(
                    "failed to read configuration file {}: {e}",
                    rc_path.display()
                ))
            })?;
            log::debug!("read configuration from {}", rc_path.display());
            user = user.or(cfg.user);
            password = password.or(cfg.password);
            url = url.or(cfg.url);
            file_verify = cfg.verify;
            break;
        }
    }

    let searched = rc_candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let user = user.ok_or_else(|| missing("user", "FASTLY_USER", &searched))?;
    let password = password.ok_or_else(|| missing("password", "FASTLY_PASSWORD", &searched))?;

    let mut cfg = SessionConfig::new(user, password).with_verify(file_verify.unwrap_or(true));
    if let Some(url) = url {
        cfg = cfg.with_url(url);
    }
    Ok(cfg)
}

fn missing(key: &str, var: &str, searched: &str) -> Error {
    if searched.is_empty() {
        Error::Config(format!(
            "Missing configuration: {key} (set {var} or create .fastlyrc)"
        ))
    } else {
        Error::Config(format!(
            "Missing configuration: {key} (set {var} or put `{key}:` in one of: {searched})"
        ))
    }
}

fn read_rc(path: &Path) -> std::io::Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // A key may be left empty with its value on the following line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') {
                cfg.set(pk, strip_quotes(line));
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" | "user" | "password" if v.is_empty() => pending_key = Some(k),
                "url" | "user" | "password" => cfg.set(k, v),
                "verify" if !v.is_empty() => cfg.verify = Some(v != "0"),
                _ => {}
            }
        }
    }

    cfg
}

impl RcConfig {
    fn set(&mut self, key: &str, value: &str) {
        let value = Some(value.to_string());
        match key {
            "url" => self.url = value,
            "user" => self.user = value,
            "password" => self.password = value,
            _ => {}
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates(explicit: Option<String>) -> Vec<PathBuf> {
    // 1) FASTLY_RC  2) ./.fastlyrc  3) ~/.fastlyrc
    if let Some(p) = explicit {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".fastlyrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".fastlyrc"));
    }
    v
}
