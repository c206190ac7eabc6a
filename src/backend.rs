use crate::Params;
use crate::error::Result;
use crate::json::{FieldType, Fields, param};
use crate::resource::{self, Record, Resource};
use crate::transport::Transport;
use crate::util::segment;
use crate::version::VersionRef;

/// An origin server that a version of a service fetches content from.
#[derive(Debug, Clone, PartialEq)]
pub struct Backend {
    pub name: String,
    pub address: String,
    pub port: u16,
    pub use_ssl: bool,
    pub connect_timeout: u32,
    pub first_byte_timeout: u32,
    pub between_bytes_timeout: u32,
    pub error_threshold: u32,
    pub max_conn: u32,
    pub weight: u32,
    pub auto_loadbalance: bool,
    pub request_condition: String,
    pub healthcheck: String,
    pub ssl_client_cert: String,
    pub ssl_client_key: String,
    pub ssl_hostname: String,
    pub ssl_ca_cert: String,
    pub client_cert: String,
    pub comment: String,
    pub hostname: String,
    pub ipv4: String,
    pub ipv6: String,
    version: VersionRef,
}

impl Backend {
    pub fn version_ref(&self) -> &VersionRef {
        &self.version
    }

    pub fn path(&self) -> String {
        self.version.task_path(&format!("backend/{}", segment(&self.name)))
    }
}

// Field name plus accessors for every writable field, so that decoding,
// updating and re-encoding walk the same list.
macro_rules! backend_fields {
    ($mac:ident) => {
        $mac! {
            bools: use_ssl, auto_loadbalance;
            numbers: connect_timeout, first_byte_timeout, between_bytes_timeout,
                error_threshold, max_conn, weight;
            strings: request_condition, healthcheck, ssl_client_cert, ssl_client_key,
                ssl_hostname, ssl_ca_cert, client_cert, comment, hostname, ipv4, ipv6;
        }
    };
}

macro_rules! apply_optional {
    (bools: $($b:ident),*; numbers: $($n:ident),*; strings: $($s:ident),*;) => {
        fn apply_optional(&mut self, key: &str, value: &str) -> Result<()> {
            match key {
                $(stringify!($b) => self.$b = param(Self::KIND, key, value)?,)*
                $(stringify!($n) => self.$n = param(Self::KIND, key, value)?,)*
                $(stringify!($s) => self.$s = param(Self::KIND, key, value)?,)*
                _ => {}
            }
            Ok(())
        }

        fn optional_params(&self, out: &mut Params) {
            $(out.insert(stringify!($b).to_string(), self.$b.to_param());)*
            $(out.insert(stringify!($n).to_string(), self.$n.to_param());)*
            $(out.insert(stringify!($s).to_string(), self.$s.to_param());)*
        }
    };
}

impl Backend {
    backend_fields!(apply_optional);
}

impl Record for Backend {
    const KIND: &'static str = "backend";

    fn to_params(&self) -> Params {
        let mut out = Params::from([
            ("name".to_string(), self.name.clone()),
            ("address".to_string(), self.address.clone()),
            ("port".to_string(), self.port.to_param()),
        ]);
        self.optional_params(&mut out);
        out
    }
}

impl Resource for Backend {
    type Parent = VersionRef;

    fn populate(f: &Fields<'_>, parent: &VersionRef) -> Result<Self> {
        Ok(Self {
            name: f.required("name")?,
            address: f.required("address")?,
            port: f.required("port")?,
            use_ssl: f.optional("use_ssl"),
            connect_timeout: f.optional("connect_timeout"),
            first_byte_timeout: f.optional("first_byte_timeout"),
            between_bytes_timeout: f.optional("between_bytes_timeout"),
            error_threshold: f.optional("error_threshold"),
            max_conn: f.optional("max_conn"),
            weight: f.optional("weight"),
            auto_loadbalance: f.optional("auto_loadbalance"),
            request_condition: f.optional("request_condition"),
            healthcheck: f.optional("healthcheck"),
            ssl_client_cert: f.optional("ssl_client_cert"),
            ssl_client_key: f.optional("ssl_client_key"),
            ssl_hostname: f.optional("ssl_hostname"),
            ssl_ca_cert: f.optional("ssl_ca_cert"),
            client_cert: f.optional("client_cert"),
            comment: f.optional("comment"),
            hostname: f.optional("hostname"),
            ipv4: f.optional("ipv4"),
            ipv6: f.optional("ipv6"),
            version: parent.clone(),
        })
    }

    fn apply_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "name" => self.name = param(Self::KIND, key, value)?,
            "address" => self.address = param(Self::KIND, key, value)?,
            "port" => self.port = param(Self::KIND, key, value)?,
            _ => self.apply_optional(key, value)?,
        }
        Ok(())
    }
}

/// Backend endpoints under `/service/{id}/version/{n}/backend`.
#[derive(Debug, Clone)]
pub struct Backends<'a> {
    transport: &'a Transport,
    version: VersionRef,
}

impl<'a> Backends<'a> {
    pub(crate) fn new(transport: &'a Transport, version: VersionRef) -> Self {
        Self { transport, version }
    }

    fn path(&self, task: &str) -> String {
        self.version.task_path(task)
    }

    /// Adds a backend. `name`, `address` and `port` are required by the API.
    pub fn create(&self, params: &Params) -> Result<Backend> {
        resource::create(self.transport, &self.path("backend"), params, &self.version)
    }

    pub fn get(&self, name: &str) -> Result<Backend> {
        resource::fetch(
            self.transport,
            &self.path(&format!("backend/{}", segment(name))),
            &self.version,
        )
    }

    pub fn list(&self) -> Result<Vec<Backend>> {
        resource::list(self.transport, &self.path("backend"), &self.version)
    }

    pub fn update(&self, backend: &mut Backend, params: &Params) -> Result<()> {
        let path = backend.path();
        resource::update(self.transport, &path, backend, params)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        resource::delete(self.transport, &self.path(&format!("backend/{}", segment(name))))
    }
}
