//! Compile-time field registries for settings types.
//!
//! Each settings type declares which of its fields are persisted, as a static
//! slice of [`FieldDescriptor`]s. The slice is built once at compile time, so
//! there is no runtime type inspection and no "unsupported field" branch: a
//! field outside the four scalar kinds simply cannot be registered.

use crate::core::error::PrefstoreError;

/// The closed set of scalar kinds a persisted field may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Text,
}

/// An owned scalar moving between a settings object and the store.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }
}

/// One persisted field of a settings type: stable name, fixed kind, and
/// accessor/mutator function pointers.
///
/// The kind never changes for the lifetime of the type; a value saved under
/// this descriptor is read back under the same kind on a later load.
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> FieldValue,
    pub set: fn(&mut T, FieldValue),
}

/// A settings object the engine can persist.
///
/// `NAME` identifies the store collection; `fields()` returns the registry in
/// declaration order. Field names must be unique within one type (guaranteed
/// when the registry comes from [`settings_fields!`], since struct fields are
/// unique). Implemented by hand only when the macro's shape does not fit.
pub trait Settings {
    /// Stable collection name in the store.
    const NAME: &'static str;

    /// Persisted fields, in a fixed deterministic order.
    fn fields() -> &'static [FieldDescriptor<Self>]
    where
        Self: Sized;
}

/// Canonical textual encoding for floating-point values.
///
/// The store has no native float primitive, so floats are written as text.
/// Rust's `Display` for `f64` produces the shortest string that parses back
/// to the same value, so the round trip is exact.
pub fn encode_float(value: f64) -> String {
    value.to_string()
}

/// Parse a float back from its textual encoding.
pub fn parse_float(field: &str, raw: &str) -> Result<f64, PrefstoreError> {
    raw.parse::<f64>().map_err(|_| PrefstoreError::Conversion {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Generates a [`Settings`] impl from a declarative field list.
///
/// Supported kind tokens: `bool` (`bool` field), `int` (`i64`), `float`
/// (`f64`), `text` (`String`).
///
/// ```
/// use prefstore::settings_fields;
///
/// struct Editor {
///     enabled: bool,
///     font_size: i64,
/// }
///
/// settings_fields!(Editor, "Editor", {
///     enabled: bool,
///     font_size: int,
/// });
/// ```
#[macro_export]
macro_rules! settings_fields {
    (@kind bool) => { $crate::core::field::FieldKind::Bool };
    (@kind int) => { $crate::core::field::FieldKind::Int };
    (@kind float) => { $crate::core::field::FieldKind::Float };
    (@kind text) => { $crate::core::field::FieldKind::Text };

    (@get bool, $obj:ident, $field:ident) => {
        $crate::core::field::FieldValue::Bool($obj.$field)
    };
    (@get int, $obj:ident, $field:ident) => {
        $crate::core::field::FieldValue::Int($obj.$field)
    };
    (@get float, $obj:ident, $field:ident) => {
        $crate::core::field::FieldValue::Float($obj.$field)
    };
    (@get text, $obj:ident, $field:ident) => {
        $crate::core::field::FieldValue::Text($obj.$field.clone())
    };

    (@set bool, $obj:ident, $field:ident, $value:ident) => {
        if let $crate::core::field::FieldValue::Bool(v) = $value {
            $obj.$field = v;
        }
    };
    (@set int, $obj:ident, $field:ident, $value:ident) => {
        if let $crate::core::field::FieldValue::Int(v) = $value {
            $obj.$field = v;
        }
    };
    (@set float, $obj:ident, $field:ident, $value:ident) => {
        if let $crate::core::field::FieldValue::Float(v) = $value {
            $obj.$field = v;
        }
    };
    (@set text, $obj:ident, $field:ident, $value:ident) => {
        if let $crate::core::field::FieldValue::Text(v) = $value {
            $obj.$field = v;
        }
    };

    ($ty:ty, $name:literal, { $($field:ident : $kind:tt),* $(,)? }) => {
        impl $crate::core::field::Settings for $ty {
            const NAME: &'static str = $name;

            fn fields() -> &'static [$crate::core::field::FieldDescriptor<Self>] {
                const FIELDS: &[$crate::core::field::FieldDescriptor<$ty>] = &[
                    $(
                        $crate::core::field::FieldDescriptor {
                            name: stringify!($field),
                            kind: $crate::settings_fields!(@kind $kind),
                            get: |obj| $crate::settings_fields!(@get $kind, obj, $field),
                            set: |obj, value| {
                                $crate::settings_fields!(@set $kind, obj, $field, value)
                            },
                        }
                    ),*
                ];
                FIELDS
            }
        }
    };
}
