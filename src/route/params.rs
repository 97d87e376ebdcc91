use crate::error::BindError;
use crate::field::{FieldValue, RequestParameter};
use crate::schema::FieldSchema;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Untyped request parameters, as collected from the query string and body
pub type RawParams = HashMap<String, String>;

/// Bound and coerced parameters handed to a route handler.
///
/// Only declared parameters that were present in the request appear here;
/// an absent optional parameter is simply missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: HashMap<String, FieldValue>,
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }
}

impl FromIterator<(String, FieldValue)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Coerces `raw` against the declared parameters.
///
/// Keys without a declaration are dropped. The first value that fails to
/// coerce aborts binding; required parameters are checked afterwards, in
/// declaration order.
pub fn bind(
    declared: &IndexMap<String, FieldSchema>,
    raw: &RawParams,
) -> Result<Parameters, BindError> {
    let mut slots: Vec<RequestParameter<'_>> =
        declared.values().map(RequestParameter::new).collect();

    for slot in &mut slots {
        if let Some(text) = raw.get(&slot.schema().name) {
            slot.set(text.as_str())?;
        }
    }

    if let Some(missing) = slots.iter().find(|s| s.is_required() && !s.is_set()) {
        return Err(BindError::MissingParameter {
            name: missing.schema().name.clone(),
        });
    }

    Ok(slots
        .into_iter()
        .filter_map(|slot| {
            let name = slot.schema().name.clone();
            slot.into_value().map(|value| (name, value))
        })
        .collect())
}
