use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::Params;
use crate::error::Result;
use crate::json::{Fields, into_object, param};
use crate::resource::{self, Record, Resource};
use crate::transport::Transport;
use crate::util::segment;
use crate::version::{Version, Versions};

/// A site or application served through the CDN. Its configuration lives in
/// numbered versions.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub customer_id: String,
    pub publish_key: String,
    pub comment: String,
    pub active_version: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    versions: BTreeMap<u64, Version>,
}

impl Service {
    /// Versions known so far: those embedded in a details response plus any
    /// fetched through [`Services::version`].
    pub fn versions(&self) -> &BTreeMap<u64, Version> {
        &self.versions
    }

    pub fn version(&self, number: u64) -> Option<&Version> {
        self.versions.get(&number)
    }

    pub fn path(&self) -> String {
        service_path(&self.id)
    }
}

pub(crate) fn service_path(id: &str) -> String {
    format!("/service/{}", segment(id))
}

impl Record for Service {
    const KIND: &'static str = "service";

    fn to_params(&self) -> Params {
        Params::from([
            ("name".to_string(), self.name.clone()),
            ("comment".to_string(), self.comment.clone()),
        ])
    }
}

impl Resource for Service {
    type Parent = ();

    fn populate(f: &Fields<'_>, _: &()) -> Result<Self> {
        let id: String = f.required("id")?;

        let mut versions = BTreeMap::new();
        if let Some(Value::Array(items)) = f.get("versions") {
            for item in items {
                let v: Version = resource::decode(&into_object(item.clone())?, &id)?;
                versions.insert(v.number, v);
            }
        }

        Ok(Self {
            name: f.required("name")?,
            customer_id: f.required("customer_id")?,
            publish_key: f.optional("publish_key"),
            comment: f.optional("comment"),
            active_version: f.lenient("active_version").or(f.lenient("version")),
            created_at: f.nullable("created_at")?,
            updated_at: f.nullable("updated_at")?,
            id,
            versions,
        })
    }

    fn apply_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "name" => self.name = param(Self::KIND, key, value)?,
            "comment" => self.comment = param(Self::KIND, key, value)?,
            _ => {}
        }
        Ok(())
    }
}

/// Service endpoints: `/service`, `/service/{id}`, `/service/{id}/details`,
/// `/service/search`.
#[derive(Debug, Clone, Copy)]
pub struct Services<'a> {
    transport: &'a Transport,
}

impl<'a> Services<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Creates a service. `params` must carry at least `name`.
    pub fn create(&self, params: &Params) -> Result<Service> {
        resource::create(self.transport, "/service", params, &())
    }

    pub fn get(&self, id: &str) -> Result<Service> {
        resource::fetch(self.transport, &service_path(id), &())
    }

    /// Fetches the service together with its versions.
    pub fn details(&self, id: &str) -> Result<Service> {
        resource::fetch(self.transport, &format!("{}/details", service_path(id)), &())
    }

    pub fn list(&self) -> Result<Vec<Service>> {
        resource::list(self.transport, "/service", &())
    }

    /// Looks a service up by its exact name; wildcards are not supported.
    pub fn search(&self, name: &str) -> Result<Service> {
        let query = Params::from([("name".to_string(), name.to_string())]);
        let body = self.transport.get_with_query("/service/search", &query)?;
        resource::decode_one(&body, &())
    }

    /// Version `number` of `service`, fetched on first use and cached on the
    /// service afterwards.
    pub fn version<'s>(&self, service: &'s mut Service, number: u64) -> Result<&'s Version> {
        match service.versions.entry(number) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let version = Versions::new(self.transport, &service.id).get(number)?;
                Ok(slot.insert(version))
            }
        }
    }

    /// Renames or re-comments `service`; only the fields in `params` change locally.
    pub fn update(&self, service: &mut Service, params: &Params) -> Result<()> {
        let path = service.path();
        resource::update(self.transport, &path, service, params)
    }

    /// Deletes the service and everything attached to it.
    pub fn delete(&self, id: &str) -> Result<()> {
        resource::delete(self.transport, &service_path(id))
    }
}
