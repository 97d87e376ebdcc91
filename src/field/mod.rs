//! # Field Module
//!
//! Scalar types and the coercion engine that fills a single field.
//!
//! Request parameters arrive as text and are *parsed* into their declared
//! type ([`RequestParameter`]). Response fields are set by handler code with
//! values that already carry a type and are *checked*, never converted
//! ([`ResponseField`]). Both share one failure shape, [`FieldTypeError`].
//!
//! [`FieldTypeError`]: crate::error::FieldTypeError

mod coerce;
mod types;

pub use coerce::{
    Coercion, FieldRuntime, FromParameter, FromTyped, RequestParameter, ResponseField, Strategy,
};
pub use types::{FieldType, FieldValue, UnknownFieldType};
