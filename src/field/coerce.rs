//! Coercion strategies and the per-request field slot.
//!
//! Each [`FieldType`] owns one [`Strategy`] row in [`STRATEGIES`]: a parser for
//! untyped request input and a predicate for already-typed response values.
//! The two [`Coercion`] modes pick the column, the declared type picks the row.

use super::types::{FieldType, FieldValue};
use crate::error::FieldTypeError;
use crate::schema::FieldSchema;
use std::marker::PhantomData;

type ParseFn = fn(&str) -> Option<FieldValue>;
type AcceptFn = fn(&FieldValue) -> bool;

/// Coercion row for one field type.
pub struct Strategy {
    /// Converts raw request text
    pub parse: ParseFn,
    /// Checks a typed value without converting it
    pub accepts: AcceptFn,
}

fn parse_string(raw: &str) -> Option<FieldValue> {
    Some(FieldValue::String(raw.to_string()))
}

fn parse_integer(raw: &str) -> Option<FieldValue> {
    raw.trim().parse::<i64>().ok().map(FieldValue::Integer)
}

fn parse_float(raw: &str) -> Option<FieldValue> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(FieldValue::Float)
}

// Only the exact lowercase literals are booleans
fn parse_boolean(raw: &str) -> Option<FieldValue> {
    match raw {
        "true" => Some(FieldValue::Boolean(true)),
        "false" => Some(FieldValue::Boolean(false)),
        _ => None,
    }
}

fn is_string(v: &FieldValue) -> bool {
    matches!(v, FieldValue::String(_))
}

fn is_integer(v: &FieldValue) -> bool {
    matches!(v, FieldValue::Integer(_))
}

// NaN and the infinities have no JSON form
fn is_float(v: &FieldValue) -> bool {
    matches!(v, FieldValue::Float(f) if f.is_finite())
}

fn is_boolean(v: &FieldValue) -> bool {
    matches!(v, FieldValue::Boolean(_))
}

/// Indexed by [`FieldType`] discriminant, see [`FieldType::strategy`].
static STRATEGIES: [Strategy; 4] = [
    Strategy {
        parse: parse_string,
        accepts: is_string,
    },
    Strategy {
        parse: parse_integer,
        accepts: is_integer,
    },
    Strategy {
        parse: parse_float,
        accepts: is_float,
    },
    Strategy {
        parse: parse_boolean,
        accepts: is_boolean,
    },
];

impl FieldType {
    #[must_use]
    pub fn strategy(self) -> &'static Strategy {
        &STRATEGIES[self as usize]
    }
}

/// Selects how a field slot turns input into a stored value.
pub trait Coercion {
    /// What callers hand to [`FieldRuntime::set`]
    type Input<'a>;

    /// Returns the typed value, or `None` when `input` does not fit `ty`.
    fn coerce(ty: FieldType, input: Self::Input<'_>) -> Option<FieldValue>;
}

/// Untyped request input: always text, parsed per declared type.
#[derive(Debug, Clone, Copy)]
pub struct FromParameter;

impl Coercion for FromParameter {
    type Input<'a> = &'a str;

    fn coerce(ty: FieldType, input: Self::Input<'_>) -> Option<FieldValue> {
        (ty.strategy().parse)(input)
    }
}

/// Typed response input: accepted only when its kind matches exactly.
#[derive(Debug, Clone, Copy)]
pub struct FromTyped;

impl Coercion for FromTyped {
    type Input<'a> = FieldValue;

    fn coerce(ty: FieldType, input: Self::Input<'_>) -> Option<FieldValue> {
        (ty.strategy().accepts)(&input).then_some(input)
    }
}

/// One field's value for the duration of a request.
///
/// Borrows its [`FieldSchema`] from the shared, immutable API schema; the
/// value itself is owned by the request.
#[derive(Debug)]
pub struct FieldRuntime<'s, C> {
    schema: &'s FieldSchema,
    value: Option<FieldValue>,
    _mode: PhantomData<C>,
}

/// A request parameter slot
pub type RequestParameter<'s> = FieldRuntime<'s, FromParameter>;

/// A response field slot
pub type ResponseField<'s> = FieldRuntime<'s, FromTyped>;

impl<'s, C> FieldRuntime<'s, C> {
    #[must_use]
    pub fn new(schema: &'s FieldSchema) -> Self {
        Self {
            schema,
            value: None,
            _mode: PhantomData,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &'s FieldSchema {
        self.schema
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.schema.required
    }

    /// The last successfully set value
    #[must_use]
    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    #[must_use]
    pub fn into_value(self) -> Option<FieldValue> {
        self.value
    }
}

impl<'s, C: Coercion> FieldRuntime<'s, C> {
    /// Coerces `input` to the declared type and stores it.
    ///
    /// On failure the previous value is kept.
    pub fn set(&mut self, input: C::Input<'_>) -> Result<(), FieldTypeError> {
        let ty = self.schema.field_type;
        match C::coerce(ty, input) {
            Some(value) => {
                self.value = Some(value);
                Ok(())
            }
            None => Err(FieldTypeError::new(self.schema.name.as_str(), ty)),
        }
    }
}
