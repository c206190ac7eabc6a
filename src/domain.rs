use serde_json::Value;

use crate::Params;
use crate::error::{Error, Result};
use crate::json::{Fields, into_object, parse_array, parse_value, param};
use crate::resource::{self, Record, Resource};
use crate::transport::Transport;
use crate::util::segment;
use crate::version::VersionRef;

/// A hostname served by one version of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub name: String,
    pub comment: String,
    pub service_id: String,
    pub version: u64,
    pub locked: bool,
}

impl Domain {
    pub fn version_ref(&self) -> VersionRef {
        VersionRef::new(self.service_id.clone(), self.version)
    }

    pub fn path(&self) -> String {
        self.version_ref().task_path(&format!("domain/{}", segment(&self.name)))
    }
}

/// Result of checking a domain's DNS: the CNAME it resolves to and whether that
/// points at the CDN.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainCheck {
    pub domain: Domain,
    pub cname: String,
    pub is_proper: bool,
}

impl Record for Domain {
    const KIND: &'static str = "domain";

    fn to_params(&self) -> Params {
        Params::from([
            ("name".to_string(), self.name.clone()),
            ("comment".to_string(), self.comment.clone()),
        ])
    }
}

impl Resource for Domain {
    type Parent = VersionRef;

    fn populate(f: &Fields<'_>, _: &VersionRef) -> Result<Self> {
        Ok(Self {
            name: f.required("name")?,
            comment: f.optional("comment"),
            service_id: f.required("service_id")?,
            version: f.required("version")?,
            locked: f.optional("locked"),
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

/// Decodes one `[domain, cname, is_proper]` tuple.
fn populate_check(item: Value, parent: &VersionRef) -> Result<DomainCheck> {
    let Value::Array(mut parts) = item else {
        return Err(Error::Decode(
            "expected a [domain, cname, is_proper] array".to_string(),
        ));
    };
    if parts.is_empty() {
        return Err(Error::Decode("empty domain check tuple".to_string()));
    }
    let is_proper = parts.get(2).and_then(Value::as_bool).unwrap_or(false);
    let cname = parts
        .get(1)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let domain = resource::decode(&into_object(parts.swap_remove(0))?, parent)?;
    Ok(DomainCheck {
        domain,
        cname,
        is_proper,
    })
}

/// Domain endpoints under `/service/{id}/version/{n}/domain`.
#[derive(Debug, Clone)]
pub struct Domains<'a> {
    transport: &'a Transport,
    version: VersionRef,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(transport: &'a Transport, version: VersionRef) -> Self {
        Self { transport, version }
    }

    fn path(&self, task: &str) -> String {
        self.version.task_path(task)
    }

    /// Adds a domain. Accepted parameters are `name` and `comment`.
    pub fn create(&self, params: &Params) -> Result<Domain> {
        resource::create(self.transport, &self.path("domain"), params, &self.version)
    }

    pub fn get(&self, name: &str) -> Result<Domain> {
        resource::fetch(
            self.transport,
            &self.path(&format!("domain/{}", segment(name))),
            &self.version,
        )
    }

    pub fn list(&self) -> Result<Vec<Domain>> {
        resource::list(self.transport, &self.path("domain"), &self.version)
    }

    /// Renames or re-comments `domain`. The request goes to the domain's
    /// current name.
    pub fn update(&self, domain: &mut Domain, params: &Params) -> Result<()> {
        let path = domain.path();
        resource::update(self.transport, &path, domain, params)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        resource::delete(self.transport, &self.path(&format!("domain/{}", segment(name))))
    }

    /// Checks the DNS of a single domain.
    pub fn check(&self, name: &str) -> Result<DomainCheck> {
        let body = self
            .transport
            .get(&self.path(&format!("domain/{}/check", segment(name))))?;
        populate_check(parse_value(&body)?, &self.version)
    }

    /// Checks the DNS of every domain on this version.
    pub fn check_all(&self) -> Result<Vec<DomainCheck>> {
        let body = self.transport.get(&self.path("domain/check_all"))?;
        parse_array(&body)?
            .into_iter()
            .map(|item| populate_check(item, &self.version))
            .collect()
    }
}
