//! A small blocking Rust client for the Fastly CDN management API.
//!
//! Log in once to get a [`Session`]; the session cookie is kept in the HTTP
//! client's cookie jar. From the session, reach each resource family through an
//! accessor: [`Session::services`], [`Session::versions`], [`Session::domains`],
//! [`Session::backends`] and [`Session::purge`].
//!
//! ## Quick start
//! Credentials come from the arguments, from `FASTLY_USER` / `FASTLY_PASSWORD` /
//! `FASTLY_URL`, or from a `.fastlyrc` file (current directory, then home).
//!
//! ```no_run
//! use cdnapi::{Session, params};
//!
//! fn main() -> cdnapi::Result<()> {
//!     let session = Session::from_env()?;
//!     let service = session.services().create(&params(&[("name", "svc-1")]))?;
//!     let version = session.versions(&service.id).create(&params(&[]))?;
//!     session
//!         .domains(&version.reference())
//!         .create(&params(&[("name", "www.example.com")]))?;
//!     session.purge().purge_key(&service.id, "images")?;
//!     Ok(())
//! }
//! ```
//!
//! Nothing is retried: every call returns the first [`Error`] it hits.

#![forbid(unsafe_code)]

mod backend;
mod config;
mod domain;
mod error;
mod json;
mod purge;
mod resource;
mod service;
mod session;
mod transport;
mod util;
mod version;

use std::collections::BTreeMap;

pub use backend::{Backend, Backends};
pub use config::SessionConfig;
pub use domain::{Domain, DomainCheck, Domains};
pub use error::{Error, Result};
pub use purge::Purger;
pub use resource::Record;
pub use service::{Service, Services};
pub use session::Session;
pub use transport::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, Transport};
pub use version::{Version, VersionNetwork, VersionRef, Versions};

/// Request parameters: field name to string value.
pub type Params = BTreeMap<String, String>;

/// Builds [`Params`] from string pairs.
pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
