use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::Params;
use crate::error::Result;
use crate::json::{FieldType, Fields, param};
use crate::resource::{self, Record, Resource};
use crate::service::service_path;
use crate::transport::{FORM_CONTENT_TYPE, Transport};

/// Identifies one version of one service. Domains and backends keep it as their
/// back-reference to build request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRef {
    pub service_id: String,
    pub number: u64,
}

impl VersionRef {
    pub fn new(service_id: impl Into<String>, number: u64) -> Self {
        Self {
            service_id: service_id.into(),
            number,
        }
    }

    /// `/service/{id}/version/{n}`
    pub fn path(&self) -> String {
        format!("{}/version/{}", service_path(&self.service_id), self.number)
    }

    pub(crate) fn task_path(&self, task: &str) -> String {
        format!("{}/{task}", self.path())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionNetwork {
    pub name: String,
    pub description: String,
    pub available_all: bool,
    pub available_restricted: bool,
    pub available_private: bool,
    pub customer_id: String,
}

/// A numbered configuration snapshot of a service. Locked once activated.
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub number: u64,
    pub service_id: String,
    pub active: bool,
    pub locked: bool,
    pub testing: bool,
    pub staging: bool,
    pub deployed: bool,
    pub comment: String,
    pub network: VersionNetwork,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Version {
    pub fn reference(&self) -> VersionRef {
        VersionRef::new(self.service_id.clone(), self.number)
    }
}

impl Record for Version {
    const KIND: &'static str = "version";

    fn to_params(&self) -> Params {
        Params::from([
            ("comment".to_string(), self.comment.clone()),
            ("testing".to_string(), self.testing.to_param()),
            ("staging".to_string(), self.staging.to_param()),
        ])
    }
}

fn populate_network(value: Option<&Value>) -> VersionNetwork {
    let Some(Value::Object(obj)) = value else {
        return VersionNetwork::default();
    };
    let f = Fields::new("network", obj);
    VersionNetwork {
        name: f.optional("name"),
        description: f.optional("description"),
        available_all: f.optional("available_all"),
        available_restricted: f.optional("available_restricted"),
        available_private: f.optional("available_private"),
        customer_id: f.optional("customer_id"),
    }
}

impl Resource for Version {
    /// Owning service id.
    type Parent = String;

    fn populate(f: &Fields<'_>, _service_id: &String) -> Result<Self> {
        Ok(Self {
            number: f.required("number")?,
            service_id: f.required("service_id")?,
            active: f.optional("active"),
            locked: f.optional("locked"),
            testing: f.optional("testing"),
            staging: f.optional("staging"),
            deployed: f.optional("deployed"),
            comment: f.optional("comment"),
            network: populate_network(f.get("network")),
            deleted_at: f.nullable("deleted_at")?,
        })
    }

    fn apply_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "comment" => self.comment = param(Self::KIND, key, value)?,
            "testing" => self.testing = param(Self::KIND, key, value)?,
            "staging" => self.staging = param(Self::KIND, key, value)?,
            _ => {}
        }
        Ok(())
    }
}

/// Version endpoints under `/service/{id}/version`.
#[derive(Debug, Clone)]
pub struct Versions<'a> {
    transport: &'a Transport,
    service_id: String,
}

impl<'a> Versions<'a> {
    pub(crate) fn new(transport: &'a Transport, service_id: &str) -> Self {
        Self {
            transport,
            service_id: service_id.to_string(),
        }
    }

    fn collection(&self) -> String {
        format!("{}/version", service_path(&self.service_id))
    }

    fn at(&self, number: u64) -> VersionRef {
        VersionRef::new(self.service_id.clone(), number)
    }

    /// Creates a new, empty version.
    pub fn create(&self, params: &Params) -> Result<Version> {
        resource::create(self.transport, &self.collection(), params, &self.service_id)
    }

    pub fn get(&self, number: u64) -> Result<Version> {
        resource::fetch(self.transport, &self.at(number).path(), &self.service_id)
    }

    pub fn list(&self) -> Result<Vec<Version>> {
        resource::list(self.transport, &self.collection(), &self.service_id)
    }

    pub fn update(&self, version: &mut Version, params: &Params) -> Result<()> {
        let path = version.reference().path();
        resource::update(self.transport, &path, version, params)
    }

    /// Copies version `number` into a new, unlocked version and returns it.
    pub fn clone_version(&self, number: u64) -> Result<Version> {
        self.put_task(number, "clone")
    }

    pub fn activate(&self, number: u64) -> Result<Version> {
        self.put_task(number, "activate")
    }

    pub fn deactivate(&self, number: u64) -> Result<Version> {
        self.put_task(number, "deactivate")
    }

    pub fn lock(&self, number: u64) -> Result<Version> {
        self.put_task(number, "lock")
    }

    fn put_task(&self, number: u64, task: &str) -> Result<Version> {
        let path = self.at(number).task_path(task);
        let body = self
            .transport
            .put(&path, &Params::new(), FORM_CONTENT_TYPE)?;
        resource::decode_one(&body, &self.service_id)
    }
}
