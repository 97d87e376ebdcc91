use super::source::{Attribute, AttributeSource};
use crate::error::{ConfigurationError, Error, FieldTypeError, ResponseError};
use crate::field::{FieldValue, ResponseField};
use crate::schema::{ObjectName, ObjectRegistry, ObjectSchema};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// A per-request instance of an [`ObjectSchema`].
///
/// Holds one [`ResponseField`] per declared field and one child instance per
/// nested object, all borrowed from the shared schema. Instances are built
/// fresh for every request and dropped with it.
#[derive(Debug)]
pub struct ResponseObject<'s> {
    schema: &'s ObjectSchema,
    fields: IndexMap<&'s str, ResponseField<'s>>,
    objects: IndexMap<&'s str, ResponseObject<'s>>,
}

impl<'s> ResponseObject<'s> {
    /// Builds the instance tree for `schema`, resolving nested object
    /// references against `registry`.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UndefinedObject`] for an unresolved reference
    /// - [`ConfigurationError::DuplicateMember`] when a name denotes both a
    ///   field and a nested object
    /// - [`ConfigurationError::RecursiveObject`] when an object contains itself
    pub fn new(
        schema: &'s ObjectSchema,
        registry: &'s ObjectRegistry,
    ) -> Result<Self, ConfigurationError> {
        Self::build(schema, registry, &mut Vec::new())
    }

    fn build(
        schema: &'s ObjectSchema,
        registry: &'s ObjectRegistry,
        ancestors: &mut Vec<&'s ObjectName>,
    ) -> Result<Self, ConfigurationError> {
        let mut objects = IndexMap::with_capacity(schema.objects.len());
        for (name, reference) in &schema.objects {
            let object_type = &reference.object_type;
            let child_schema =
                registry
                    .get(object_type)
                    .ok_or_else(|| ConfigurationError::UndefinedObject {
                        name: object_type.to_string(),
                    })?;

            if ancestors.contains(&object_type) {
                let mut chain: Vec<&str> = ancestors.iter().map(|n| n.as_str()).collect();
                chain.push(object_type.as_str());
                return Err(ConfigurationError::RecursiveObject {
                    name: object_type.to_string(),
                    chain: chain.join(" -> "),
                });
            }

            ancestors.push(object_type);
            let child = Self::build(child_schema, registry, ancestors)?;
            ancestors.pop();
            objects.insert(name.as_str(), child);
        }

        let fields: IndexMap<&'s str, ResponseField<'s>> = schema
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), ResponseField::new(field)))
            .collect();

        if let Some(name) = fields.keys().find(|name| objects.contains_key(*name)) {
            return Err(ConfigurationError::DuplicateMember {
                name: (*name).to_string(),
            });
        }

        Ok(Self {
            schema,
            fields,
            objects,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &'s ObjectSchema {
        self.schema
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'s str> + '_ {
        self.fields.keys().copied()
    }

    /// Declared nested object names, in declaration order
    pub fn object_names(&self) -> impl Iterator<Item = &'s str> + '_ {
        self.objects.keys().copied()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ResponseField<'s>> {
        self.fields.get(name)
    }

    /// Current value of field `name`; `None` when unset or not declared
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(ResponseField::value)
    }

    /// Sets field `name`. The value must already have the declared type.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), Error> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| ResponseError::UnknownMember {
                name: name.to_string(),
            })?;
        field.set(value.into())?;
        Ok(())
    }

    #[must_use]
    pub fn object(&self, name: &str) -> Option<&ResponseObject<'s>> {
        self.objects.get(name)
    }

    pub fn object_mut(&mut self, name: &str) -> Result<&mut ResponseObject<'s>, ResponseError> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| ResponseError::UnknownMember {
                name: name.to_string(),
            })
    }

    /// Sets fields and nested objects from the matching keys of `mapping`.
    ///
    /// Keys naming neither a field nor a nested object are ignored, as are
    /// `null` values. A nested object given a mapping recurses through this
    /// method; given anything else it is treated as an attribute source.
    pub fn set_from_mapping(&mut self, mapping: &Map<String, Value>) -> Result<(), Error> {
        for (key, value) in mapping {
            if value.is_null() {
                continue;
            }
            if let Some(field) = self.fields.get_mut(key.as_str()) {
                let typed = json_scalar(key, field, value)?;
                field.set(typed)?;
            } else if let Some(object) = self.objects.get_mut(key.as_str()) {
                match value {
                    Value::Object(map) => object.set_from_mapping(map)?,
                    other => object.set_from_source(other, &[])?,
                }
            }
        }
        Ok(())
    }

    /// Sets every member not in `exclude` that `source` exposes an attribute
    /// for. Nested objects recurse with the same mapping/source distinction
    /// as [`set_from_mapping`](Self::set_from_mapping).
    pub fn set_from_source(
        &mut self,
        source: &dyn AttributeSource,
        exclude: &[&str],
    ) -> Result<(), Error> {
        for (name, field) in &mut self.fields {
            if exclude.contains(name) {
                continue;
            }
            let typed = match source.attribute(name) {
                None => continue,
                Some(Attribute::Value(v)) => v.clone(),
                Some(Attribute::Json(v)) => json_scalar(name, field, v)?,
                Some(Attribute::Mapping(_)) | Some(Attribute::Source(_)) => {
                    return Err(FieldTypeError::new(*name, field.schema().field_type).into())
                }
            };
            field.set(typed)?;
        }

        for (name, object) in &mut self.objects {
            if exclude.contains(name) {
                continue;
            }
            match source.attribute(name) {
                None | Some(Attribute::Value(_)) => {}
                Some(Attribute::Mapping(map)) => object.set_from_mapping(map)?,
                Some(Attribute::Source(inner)) => object.set_from_source(inner, &[])?,
                Some(Attribute::Json(v)) => object.set_from_source(v, &[])?,
            }
        }
        Ok(())
    }

    /// Projects any serializable value as an attribute source.
    ///
    /// The value is serialized to JSON first, so struct fields become
    /// attributes and `None` options are skipped.
    pub fn set_from_serializable<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        exclude: &[&str],
    ) -> Result<(), Error> {
        let value = serde_json::to_value(value)?;
        self.set_from_source(&value, exclude)
    }

    /// Checks that every required field in this object and its children has
    /// been set. Children are checked first; their errors carry the child's
    /// name.
    pub fn validate(&self) -> Result<(), ResponseError> {
        for (name, object) in &self.objects {
            object.validate().map_err(|err| ResponseError::Nested {
                object: (*name).to_string(),
                source: Box::new(err),
            })?;
        }
        for (name, field) in &self.fields {
            if field.is_required() && !field.is_set() {
                return Err(ResponseError::FieldNotSet {
                    field: (*name).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Serializes to a nested mapping. Unset fields become `null`.
    #[must_use]
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(self.objects.len() + self.fields.len());
        for (name, object) in &self.objects {
            map.insert((*name).to_string(), Value::Object(object.to_mapping()));
        }
        for (name, field) in &self.fields {
            let value = field.value().cloned().map_or(Value::Null, Value::from);
            map.insert((*name).to_string(), value);
        }
        map
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_mapping())
    }
}

fn json_scalar(
    name: &str,
    field: &ResponseField<'_>,
    value: &Value,
) -> Result<FieldValue, FieldTypeError> {
    FieldValue::from_json(value)
        .ok_or_else(|| FieldTypeError::new(name, field.schema().field_type))
}
