//! The request/decode pattern every resource type shares.
//!
//! Accessors only know their paths; creating, fetching, listing, updating and
//! deleting go through the functions below.

use crate::Params;
use crate::error::Result;
use crate::json::{Fields, Object, into_object, parse_array, parse_object};
use crate::transport::{FORM_CONTENT_TYPE, Transport};

/// A typed record decoded from an API response.
pub trait Record {
    /// Name used in validation errors (`"service"`, `"backend"`, ...).
    const KIND: &'static str;

    /// Re-encodes the record's writable fields as request parameters.
    fn to_params(&self) -> Params;
}

pub(crate) trait Resource: Record + Clone + Sized {
    /// Handle of the owning object, kept for URL construction.
    type Parent;

    fn populate(fields: &Fields<'_>, parent: &Self::Parent) -> Result<Self>;

    /// Applies one update parameter. Keys the record does not model are ignored.
    fn apply_param(&mut self, key: &str, value: &str) -> Result<()>;
}

pub(crate) fn decode<R: Resource>(obj: &Object, parent: &R::Parent) -> Result<R> {
    R::populate(&Fields::new(R::KIND, obj), parent)
}

pub(crate) fn decode_one<R: Resource>(body: &str, parent: &R::Parent) -> Result<R> {
    decode(&parse_object(body)?, parent)
}

pub(crate) fn decode_many<R: Resource>(body: &str, parent: &R::Parent) -> Result<Vec<R>> {
    parse_array(body)?
        .into_iter()
        .map(|item| decode(&into_object(item)?, parent))
        .collect()
}

pub(crate) fn create<R: Resource>(
    t: &Transport,
    path: &str,
    params: &Params,
    parent: &R::Parent,
) -> Result<R> {
    decode_one(&t.post_form(path, params)?, parent)
}

pub(crate) fn fetch<R: Resource>(t: &Transport, path: &str, parent: &R::Parent) -> Result<R> {
    decode_one(&t.get(path)?, parent)
}

pub(crate) fn list<R: Resource>(t: &Transport, path: &str, parent: &R::Parent) -> Result<Vec<R>> {
    decode_many(&t.get(path)?, parent)
}

/// PUTs `params` to `path`, then copies exactly those fields onto `record`.
///
/// Values are converted before the request goes out and the record is only
/// replaced once the API accepted the change.
pub(crate) fn update<R: Resource>(
    t: &Transport,
    path: &str,
    record: &mut R,
    params: &Params,
) -> Result<()> {
    let mut updated = record.clone();
    for (key, value) in params {
        updated.apply_param(key, value)?;
    }
    t.put(path, params, FORM_CONTENT_TYPE)?;
    *record = updated;
    Ok(())
}

pub(crate) fn delete(t: &Transport, path: &str) -> Result<()> {
    t.delete(path).map(|_| ())
}
