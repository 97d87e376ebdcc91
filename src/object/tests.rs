use super::*;
use crate::error::{ConfigurationError, Error, ResponseError};
use crate::field::{FieldType, FieldValue};
use crate::schema::{ApiSchema, ApiSchemaBuilder, FieldOptions, ObjectSchema};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

fn widget_api() -> ApiSchema {
    let mut api = ApiSchemaBuilder::new();
    api.define_object("widget", |obj| {
        obj.field("name", FieldOptions::new(FieldType::String).required())?
            .field("id", FieldOptions::new(FieldType::Integer).required())?
            .field("note", FieldOptions::new(FieldType::String))?;
        Ok(())
    })
    .unwrap()
    .define_object("owner", |obj| {
        obj.field("email", FieldOptions::new(FieldType::String).required())?
            .field("verified", FieldOptions::new(FieldType::Boolean).required())?
            .object("widget", "widget")?;
        Ok(())
    })
    .unwrap()
    .define_route("/noop", |route| {
        route.response_object(|r| {
            r.object("owner", "owner")?
                .field("score", FieldOptions::new(FieldType::Float))?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();
    api.build()
}

fn response_shape(api: &ApiSchema) -> &ObjectSchema {
    &api.route("/noop").unwrap().response
}

#[test]
fn test_builds_nested_instances() {
    let api = widget_api();
    let obj = ResponseObject::new(response_shape(&api), &api.objects).unwrap();
    assert_eq!(obj.field_names().collect::<Vec<_>>(), vec!["score"]);
    assert_eq!(obj.object_names().collect::<Vec<_>>(), vec!["owner"]);
    let owner = obj.object("owner").unwrap();
    assert_eq!(owner.object_names().collect::<Vec<_>>(), vec!["widget"]);
    assert!(owner.object("widget").unwrap().get("name").is_none());
}

#[test]
fn test_undefined_object_reference() {
    let mut api = ApiSchemaBuilder::new();
    api.define_object("holder", |obj| {
        obj.object("thing", "missing")?;
        Ok(())
    })
    .unwrap();
    let api = api.build();
    let err = ResponseObject::new(api.object("holder").unwrap(), &api.objects).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::UndefinedObject {
            name: "missing".to_string()
        }
    );
}

#[test]
fn test_field_and_object_sharing_a_name_is_rejected() {
    let mut api = ApiSchemaBuilder::new();
    api.define_object("widget", |obj| {
        obj.field("name", FieldOptions::new(FieldType::String))?;
        Ok(())
    })
    .unwrap()
    .define_object("clash", |obj| {
        obj.field("widget", FieldOptions::new(FieldType::String))?
            .object("widget", "widget")?;
        Ok(())
    })
    .unwrap();
    let api = api.build();
    let err = ResponseObject::new(api.object("clash").unwrap(), &api.objects).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DuplicateMember {
            name: "widget".to_string()
        }
    );
}

#[test]
fn test_recursive_reference_is_rejected() {
    let mut api = ApiSchemaBuilder::new();
    api.define_object("node", |obj| {
        obj.field("value", FieldOptions::new(FieldType::Integer))?
            .object("next", "node")?;
        Ok(())
    })
    .unwrap();
    let api = api.build();
    let err = ResponseObject::new(api.object("node").unwrap(), &api.objects).unwrap_err();
    assert!(matches!(err, ConfigurationError::RecursiveObject { ref name, .. } if name == "node"));
}

#[test]
fn test_set_is_strict_and_names_must_exist() {
    let api = widget_api();
    let mut obj = ResponseObject::new(response_shape(&api), &api.objects).unwrap();

    obj.set("score", 1.5).unwrap();
    assert_eq!(obj.get("score"), Some(&FieldValue::Float(1.5)));

    let err = obj.set("score", "high").unwrap_err();
    assert!(matches!(err, Error::FieldType(_)));
    assert_eq!(err.to_string(), "score is not a float");

    let err = obj.set("nope", 1).unwrap_err();
    assert!(matches!(
        err,
        Error::Response(ResponseError::UnknownMember { .. })
    ));
    assert!(obj.object_mut("nope").is_err());
}

#[test]
fn test_validate_reports_nested_path() {
    let api = widget_api();
    let mut obj = ResponseObject::new(response_shape(&api), &api.objects).unwrap();
    {
        let owner = obj.object_mut("owner").unwrap();
        owner.set("email", "a@b.c").unwrap();
        owner.set("verified", false).unwrap();
        owner.object_mut("widget").unwrap().set("name", "w").unwrap();
    }
    let err = obj.validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Object: owner: Object: widget: Field id should be set!"
    );

    obj.object_mut("owner")
        .unwrap()
        .object_mut("widget")
        .unwrap()
        .set("id", 3)
        .unwrap();
    // optional fields may stay unset, and false counts as set
    obj.validate().unwrap();
}

#[test]
fn test_to_mapping_serializes_unset_as_null() {
    let api = widget_api();
    let mut obj = ResponseObject::new(response_shape(&api), &api.objects).unwrap();
    obj.object_mut("owner")
        .unwrap()
        .object_mut("widget")
        .unwrap()
        .set("id", 9)
        .unwrap();

    assert_eq!(
        obj.to_value(),
        json!({
            "owner": {
                "widget": { "name": null, "id": 9, "note": null },
                "email": null,
                "verified": null
            },
            "score": null
        })
    );
}

#[test]
fn test_mapping_round_trip_is_idempotent() {
    let api = widget_api();
    let input = json!({
        "owner": {
            "widget": { "name": "w", "id": 1, "note": "n" },
            "email": "a@b.c",
            "verified": true
        },
        "score": 0.5
    });

    let mut first = ResponseObject::new(response_shape(&api), &api.objects).unwrap();
    first.set_from_mapping(input.as_object().unwrap()).unwrap();
    let mapping = first.to_mapping();
    assert_eq!(Value::Object(mapping.clone()), input);

    let mut second = ResponseObject::new(response_shape(&api), &api.objects).unwrap();
    second.set_from_mapping(&mapping).unwrap();
    assert_eq!(second.to_mapping(), mapping);
}

#[test]
fn test_set_from_mapping_ignores_unknown_keys_and_nulls() {
    let api = widget_api();
    let mut obj = ResponseObject::new(api.object("widget").unwrap(), &api.objects).unwrap();
    obj.set_from_mapping(json!({ "name": "w", "extra": 1, "note": null }).as_object().unwrap())
        .unwrap();
    assert_eq!(obj.get("name"), Some(&FieldValue::String("w".into())));
    assert!(obj.get("note").is_none());

    let err = obj
        .set_from_mapping(json!({ "id": "12" }).as_object().unwrap())
        .unwrap_err();
    assert_eq!(err.to_string(), "id is not a integer");
}

#[derive(Serialize)]
struct Widget {
    name: String,
    id: i64,
    note: Option<String>,
}

#[derive(Serialize)]
struct Owner {
    email: String,
    verified: bool,
    widget: Widget,
}

#[test]
fn test_set_from_serializable_projects_nested_structs() {
    let api = widget_api();
    let mut obj = ResponseObject::new(response_shape(&api), &api.objects).unwrap();
    let owner = Owner {
        email: "a@b.c".into(),
        verified: true,
        widget: Widget {
            name: "w".into(),
            id: 4,
            note: None,
        },
    };
    obj.object_mut("owner")
        .unwrap()
        .set_from_serializable(&owner, &["verified"])
        .unwrap();

    let owner = obj.object("owner").unwrap();
    assert_eq!(owner.get("email"), Some(&FieldValue::String("a@b.c".into())));
    assert!(owner.get("verified").is_none());
    let widget = owner.object("widget").unwrap();
    assert_eq!(widget.get("id"), Some(&FieldValue::Integer(4)));
    assert!(widget.get("note").is_none());
}

#[test]
fn test_set_from_source_with_typed_map() {
    let api = widget_api();
    let mut obj = ResponseObject::new(api.object("widget").unwrap(), &api.objects).unwrap();
    let mut attrs = HashMap::new();
    attrs.insert("name".to_string(), FieldValue::from("typed"));
    attrs.insert("id".to_string(), FieldValue::from(2));
    obj.set_from_source(&attrs, &["id"]).unwrap();
    assert_eq!(obj.get("name"), Some(&FieldValue::String("typed".into())));
    assert!(obj.get("id").is_none());
}

#[test]
fn test_nested_object_given_scalar_is_left_untouched() {
    let api = widget_api();
    let mut obj = ResponseObject::new(api.object("owner").unwrap(), &api.objects).unwrap();
    obj.set_from_mapping(json!({ "widget": "not an object" }).as_object().unwrap())
        .unwrap();
    assert!(obj.object("widget").unwrap().get("name").is_none());
}

#[test]
fn test_non_finite_floats_are_rejected() {
    let api = widget_api();
    let mut obj = ResponseObject::new(response_shape(&api), &api.objects).unwrap();
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = obj.set("score", bad).unwrap_err();
        assert!(matches!(err, Error::FieldType(_)), "{bad}");
        assert_eq!(err.to_string(), "score is not a float");
    }
    assert!(obj.get("score").is_none());
}

/// An owner record held as plain Rust data rather than a map.
struct OwnerRecord {
    email: FieldValue,
    verified: FieldValue,
    widget: WidgetRecord,
}

struct WidgetRecord {
    name: FieldValue,
    id: FieldValue,
}

impl AttributeSource for WidgetRecord {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        match name {
            "name" => Some(Attribute::Value(&self.name)),
            "id" => Some(Attribute::Value(&self.id)),
            _ => None,
        }
    }
}

impl AttributeSource for OwnerRecord {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        match name {
            "email" => Some(Attribute::Value(&self.email)),
            "verified" => Some(Attribute::Value(&self.verified)),
            "widget" => Some(Attribute::Source(&self.widget)),
            _ => None,
        }
    }
}

fn owner_record() -> OwnerRecord {
    OwnerRecord {
        email: FieldValue::from("a@b.c"),
        verified: FieldValue::from(true),
        widget: WidgetRecord {
            name: FieldValue::from("w"),
            id: FieldValue::from(5),
        },
    }
}

#[test]
fn test_set_from_source_recurses_into_nested_sources() {
    let api = widget_api();
    let mut obj = ResponseObject::new(api.object("owner").unwrap(), &api.objects).unwrap();
    obj.set_from_source(&owner_record(), &[]).unwrap();
    obj.validate().unwrap();

    assert_eq!(
        obj.to_value(),
        json!({
            "widget": { "name": "w", "id": 5, "note": null },
            "email": "a@b.c",
            "verified": true
        })
    );
}

#[test]
fn test_set_from_source_exclude_skips_nested_objects() {
    let api = widget_api();
    let mut obj = ResponseObject::new(api.object("owner").unwrap(), &api.objects).unwrap();
    obj.set_from_source(&owner_record(), &["widget"]).unwrap();

    assert_eq!(obj.get("email"), Some(&FieldValue::String("a@b.c".into())));
    assert!(obj.object("widget").unwrap().get("name").is_none());
    assert_eq!(
        obj.validate().unwrap_err().to_string(),
        "Object: widget: Field name should be set!"
    );
}

/// Exposes a nested source under a name the schema declares as a scalar.
struct ScalarAsSource {
    inner: WidgetRecord,
}

impl AttributeSource for ScalarAsSource {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        (name == "email").then_some(Attribute::Source(&self.inner))
    }
}

#[test]
fn test_source_given_for_scalar_field_is_a_type_error() {
    let api = widget_api();
    let mut obj = ResponseObject::new(api.object("owner").unwrap(), &api.objects).unwrap();
    let source = ScalarAsSource {
        inner: WidgetRecord {
            name: FieldValue::from("w"),
            id: FieldValue::from(1),
        },
    };
    let err = obj.set_from_source(&source, &[]).unwrap_err();
    assert!(matches!(err, Error::FieldType(_)));
    assert_eq!(err.to_string(), "email is not a string");
    assert!(obj.get("email").is_none());
}
