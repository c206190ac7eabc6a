//! JSON decoding shared by every resource type.
//!
//! Responses are first decoded into a generic object or array, then each record
//! pulls its fields out through [`Fields`], which knows whether a field is
//! required and what type it must have.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::util::truncate_for_log;

pub(crate) type Object = Map<String, Value>;

pub(crate) fn parse_value(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("JSON parse failed: {e}; raw body: {}", truncate_for_log(body));
        Error::Decode(e.to_string())
    })
}

pub(crate) fn parse_object(body: &str) -> Result<Object> {
    into_object(parse_value(body)?)
}

pub(crate) fn parse_array(body: &str) -> Result<Vec<Value>> {
    match parse_value(body)? {
        Value::Array(items) => Ok(items),
        other => Err(Error::Decode(format!(
            "expected a JSON array, got {}",
            kind(&other)
        ))),
    }
}

pub(crate) fn into_object(value: Value) -> Result<Object> {
    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(Error::Decode(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A type a record field can hold. Knows how to read itself from a JSON value
/// and from / to the string form used in request parameters.
pub(crate) trait FieldType: Sized {
    const EXPECTED: &'static str;

    fn from_json(v: &Value) -> Option<Self>;
    fn from_param(s: &str) -> Option<Self>;
    fn to_param(&self) -> String;
}

impl FieldType for String {
    const EXPECTED: &'static str = "a string";

    fn from_json(v: &Value) -> Option<Self> {
        v.as_str().map(str::to_string)
    }

    fn from_param(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn to_param(&self) -> String {
        self.clone()
    }
}

impl FieldType for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_json(v: &Value) -> Option<Self> {
        v.as_bool()
    }

    fn from_param(s: &str) -> Option<Self> {
        match s {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        }
    }

    fn to_param(&self) -> String {
        self.to_string()
    }
}

// JSON numbers may arrive as floats (`3.0`); accept them when they are integral.
fn json_u64(v: &Value) -> Option<u64> {
    v.as_u64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

macro_rules! unsigned_field {
    ($($t:ty),*) => {$(
        impl FieldType for $t {
            const EXPECTED: &'static str = concat!("an integer fitting ", stringify!($t));

            fn from_json(v: &Value) -> Option<Self> {
                json_u64(v).and_then(|n| <$t>::try_from(n).ok())
            }

            fn from_param(s: &str) -> Option<Self> {
                s.trim().parse().ok()
            }

            fn to_param(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

unsigned_field!(u16, u32, u64);

impl FieldType for DateTime<Utc> {
    const EXPECTED: &'static str = "an RFC 3339 timestamp";

    fn from_json(v: &Value) -> Option<Self> {
        v.as_str().and_then(Self::from_param)
    }

    fn from_param(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    fn to_param(&self) -> String {
        self.to_rfc3339()
    }
}

/// Typed view over one decoded JSON object.
pub(crate) struct Fields<'a> {
    record: &'static str,
    obj: &'a Object,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(record: &'static str, obj: &'a Object) -> Self {
        Self { record, obj }
    }

    /// Field that must be present with the right type.
    pub(crate) fn required<T: FieldType>(&self, name: &str) -> Result<T> {
        self.obj
            .get(name)
            .and_then(T::from_json)
            .ok_or_else(|| Error::validation(self.record, name, T::EXPECTED))
    }

    /// Field that falls back to its zero value when absent or mistyped.
    pub(crate) fn optional<T: FieldType + Default>(&self, name: &str) -> T {
        self.lenient(name).unwrap_or_default()
    }

    /// Field that is `None` when absent or mistyped.
    pub(crate) fn lenient<T: FieldType>(&self, name: &str) -> Option<T> {
        self.obj.get(name).and_then(T::from_json)
    }

    /// Field that may be absent or null, but must have the right type otherwise.
    pub(crate) fn nullable<T: FieldType>(&self, name: &str) -> Result<Option<T>> {
        match self.obj.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::from_json(v)
                .map(Some)
                .ok_or_else(|| Error::validation(self.record, name, T::EXPECTED)),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&'a Value> {
        self.obj.get(name)
    }
}

/// Converts an update parameter to the field's type, naming the field on failure.
pub(crate) fn param<T: FieldType>(record: &'static str, name: &str, value: &str) -> Result<T> {
    T::from_param(value).ok_or_else(|| Error::validation(record, name, T::EXPECTED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Object {
        into_object(v).unwrap()
    }

    #[test]
    fn parse_object_rejects_arrays_and_garbage() {
        assert!(matches!(parse_object("[]"), Err(Error::Decode(_))));
        assert!(matches!(parse_object("not json"), Err(Error::Decode(_))));
        assert!(parse_object(r#"{"a":1}"#).is_ok());
    }

    #[test]
    fn parse_array_accepts_empty() {
        assert!(parse_array("[]").unwrap().is_empty());
        assert!(matches!(parse_array("{}"), Err(Error::Decode(_))));
    }

    #[test]
    fn required_names_the_field() {
        let o = obj(json!({"name": 5}));
        let f = Fields::new("backend", &o);
        let err = f.required::<String>("name").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { record: "backend", ref field, expected: "a string" } if field == "name"
        ));
        assert!(f.required::<String>("address").is_err());
    }

    #[test]
    fn optional_falls_back_to_zero_value() {
        let o = obj(json!({"comment": null, "ipv4": 10, "hostname": "origin.example"}));
        let f = Fields::new("backend", &o);
        assert_eq!(f.optional::<String>("comment"), "");
        assert_eq!(f.optional::<String>("ipv4"), "");
        assert_eq!(f.optional::<String>("hostname"), "origin.example");
        assert!(!f.optional::<bool>("locked"));
    }

    #[test]
    fn integers_accept_integral_floats() {
        let o = obj(json!({"number": 3.0, "port": 70000, "frac": 1.5, "neg": -1}));
        let f = Fields::new("version", &o);
        assert_eq!(f.required::<u64>("number").unwrap(), 3);
        assert!(f.required::<u16>("port").is_err());
        assert!(f.required::<u64>("frac").is_err());
        assert!(f.required::<u64>("neg").is_err());
    }

    #[test]
    fn nullable_distinguishes_absent_from_mistyped() {
        let o = obj(json!({"active_version": null, "created_at": "yesterday"}));
        let f = Fields::new("service", &o);
        assert_eq!(f.nullable::<u64>("active_version").unwrap(), None);
        assert_eq!(f.nullable::<u64>("missing").unwrap(), None);
        assert!(f.nullable::<DateTime<Utc>>("created_at").is_err());
    }

    #[test]
    fn timestamps_parse_rfc3339() {
        let o = obj(json!({"created_at": "2014-05-01T12:30:00+00:00"}));
        let f = Fields::new("service", &o);
        let t = f.nullable::<DateTime<Utc>>("created_at").unwrap().unwrap();
        assert_eq!(t.to_rfc3339(), "2014-05-01T12:30:00+00:00");
    }

    #[test]
    fn param_conversion() {
        assert!(param::<bool>("backend", "use_ssl", "1").unwrap());
        assert_eq!(param::<u16>("backend", "port", " 443 ").unwrap(), 443);
        assert!(matches!(
            param::<u16>("backend", "port", "https"),
            Err(Error::Validation { ref field, .. }) if field == "port"
        ));
    }
}
