use crate::field::FieldValue;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A value read from an [`AttributeSource`].
#[derive(Clone, Copy)]
pub enum Attribute<'a> {
    /// An already typed scalar
    Value(&'a FieldValue),
    /// A JSON value that is not an object
    Json(&'a Value),
    /// A plain mapping, projected with `set_from_mapping`
    Mapping(&'a Map<String, Value>),
    /// Another attribute-bearing value, projected with `set_from_source`
    Source(&'a dyn AttributeSource),
}

/// Anything that exposes named attributes a response object can be filled
/// from.
///
/// Returning `None` means the attribute is not exposed and the matching
/// member is left untouched. JSON `null` is reported as not exposed.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>>;
}

impl AttributeSource for Map<String, Value> {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        match self.get(name)? {
            Value::Null => None,
            Value::Object(map) => Some(Attribute::Mapping(map)),
            other => Some(Attribute::Json(other)),
        }
    }
}

impl AttributeSource for Value {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        match self {
            Value::Object(map) => map.attribute(name),
            _ => None,
        }
    }
}

impl AttributeSource for HashMap<String, FieldValue> {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        self.get(name).map(Attribute::Value)
    }
}

impl AttributeSource for BTreeMap<String, FieldValue> {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        self.get(name).map(Attribute::Value)
    }
}
