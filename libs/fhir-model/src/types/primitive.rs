//! Primitive datatypes.
//!
//! A primitive is an element: besides its value it may carry an `id` and
//! extensions, and it may omit the value when it has either of those.
//! Values are checked against the FHIR lexical space on construction.

use std::any::Any;
use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::builder::{finish, ElementBuilder};
use crate::error::Result;
use crate::types::element::{ElementBase, ElementFields};
use crate::types::DataType;
use crate::validation::{
    check_code, check_id, check_min_value, check_pattern, check_string, check_uri,
    require_value_or_children,
};
use crate::visitor::{Field, Fields, NodeKind, Value, Visitable};

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$",
    )
    .expect("date pattern")
});

static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$",
    )
    .expect("dateTime pattern")
});

static TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?$").expect("time pattern")
});

static INSTANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))$",
    )
    .expect("instant pattern")
});

trait AsValue {
    fn as_value(&self) -> Value<'_>;
}

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Boolean(*self)
    }
}

impl AsValue for i32 {
    fn as_value(&self) -> Value<'_> {
        Value::Integer(*self)
    }
}

impl AsValue for rust_decimal::Decimal {
    fn as_value(&self) -> Value<'_> {
        Value::Decimal(self)
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

/// Equality of primitive values. Decimals compare their scale too, so
/// `1.0` and `1.00` are different values.
trait ExactValue {
    fn exact_eq(&self, other: &Self) -> bool;

    fn exact_hash<H: Hasher>(&self, state: &mut H);
}

macro_rules! plain_exact_value {
    ($($ty:ty),+) => {
        $(
            impl ExactValue for $ty {
                fn exact_eq(&self, other: &Self) -> bool {
                    self == other
                }

                fn exact_hash<H: Hasher>(&self, state: &mut H) {
                    self.hash(state);
                }
            }
        )+
    };
}

plain_exact_value!(bool, i32, String);

impl ExactValue for rust_decimal::Decimal {
    fn exact_eq(&self, other: &Self) -> bool {
        self == other && self.scale() == other.scale()
    }

    fn exact_hash<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
        self.scale().hash(state);
    }
}

fn unchecked<T: ?Sized>(_: &T) -> Result<()> {
    Ok(())
}

fn check_positive_int(value: &i32) -> Result<()> {
    check_min_value("positiveInt", *value, 1)
}

fn check_unsigned_int(value: &i32) -> Result<()> {
    check_min_value("unsignedInt", *value, 0)
}

fn check_fhir_string(value: &str) -> Result<()> {
    check_string("string", value)
}

fn check_markdown(value: &str) -> Result<()> {
    check_string("markdown", value)
}

fn check_plain_uri(value: &str) -> Result<()> {
    check_uri("uri", value)
}

fn check_canonical(value: &str) -> Result<()> {
    check_uri("canonical", value)
}

fn check_date(value: &str) -> Result<()> {
    check_pattern("date", value, &DATE)
}

fn check_date_time(value: &str) -> Result<()> {
    check_pattern("dateTime", value, &DATE_TIME)
}

fn check_time(value: &str) -> Result<()> {
    check_pattern("time", value, &TIME)
}

fn check_instant(value: &str) -> Result<()> {
    check_pattern("instant", value, &INSTANT)
}

macro_rules! primitive {
    ($(#[$meta:meta])* $name:ident, $builder:ident, $fhir:literal, $value:ty, $check:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: ElementFields,
            value: Option<$value>,
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.base == other.base
                    && match (&self.value, &other.value) {
                        (Some(a), Some(b)) => a.exact_eq(b),
                        (None, None) => true,
                        _ => false,
                    }
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.base.hash(state);
                self.value.is_some().hash(state);
                if let Some(value) = &self.value {
                    value.exact_hash(state);
                }
            }
        }

        impl $name {
            /// Build a primitive holding `value`, checking its lexical form.
            pub fn new(value: impl Into<$value>) -> Result<Self> {
                Self::builder().value(value).build()
            }

            pub fn builder() -> $builder {
                $builder::default()
            }

            pub fn to_builder(&self) -> $builder {
                $builder::from(self)
            }

            pub fn value(&self) -> Option<&$value> {
                self.value.as_ref()
            }
        }

        impl ElementBase for $name {
            fn element_base(&self) -> &ElementFields {
                &self.base
            }
        }

        impl DataType for $name {
            const TYPE_NAME: &'static str = $fhir;
        }

        impl Visitable for $name {
            fn type_name(&self) -> &'static str {
                $fhir
            }

            fn kind(&self) -> NodeKind {
                NodeKind::Primitive
            }

            fn fields(&self) -> Vec<Field<'_>> {
                Fields::new()
                    .element(&self.base)
                    .value("value", self.value.as_ref().map(AsValue::as_value))
                    .build()
            }

            fn has_value(&self) -> bool {
                self.value.is_some()
            }

            fn has_children(&self) -> bool {
                !self.base.is_empty()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            base: ElementFields,
            value: Option<$value>,
        }

        impl $builder {
            pub fn value(mut self, value: impl Into<$value>) -> Self {
                self.value = Some(value.into());
                self
            }

            pub fn clear_value(mut self) -> Self {
                self.value = None;
                self
            }

            pub fn build(&self) -> Result<$name> {
                finish($fhir, || {
                    self.base.validate()?;
                    if let Some(value) = &self.value {
                        $check(value)?;
                    }
                    let primitive = $name {
                        base: self.base.clone(),
                        value: self.value.clone(),
                    };
                    require_value_or_children(&primitive)?;
                    Ok(primitive)
                })
            }
        }

        impl ElementBuilder for $builder {
            fn element_fields(&mut self) -> &mut ElementFields {
                &mut self.base
            }
        }

        impl From<&$name> for $builder {
            fn from(primitive: &$name) -> Self {
                Self {
                    base: primitive.base.clone(),
                    value: primitive.value.clone(),
                }
            }
        }
    };
}

macro_rules! string_value {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $name {
                pub fn as_str(&self) -> Option<&str> {
                    self.value.as_deref()
                }
            }
        )+
    };
}

macro_rules! infallible_from {
    ($($name:ident($value:ty)),+ $(,)?) => {
        $(
            impl From<$value> for $name {
                fn from(value: $value) -> Self {
                    Self {
                        base: ElementFields::default(),
                        value: Some(value),
                    }
                }
            }
        )+
    };
}

primitive!(Boolean, BooleanBuilder, "boolean", bool, unchecked);
primitive!(Integer, IntegerBuilder, "integer", i32, unchecked);
primitive!(
    /// Integer >= 1.
    PositiveInt, PositiveIntBuilder, "positiveInt", i32, check_positive_int
);
primitive!(
    /// Integer >= 0.
    UnsignedInt, UnsignedIntBuilder, "unsignedInt", i32, check_unsigned_int
);
primitive!(Decimal, DecimalBuilder, "decimal", rust_decimal::Decimal, unchecked);
primitive!(
    /// FHIR `string`. Named to stay clear of [`std::string::String`].
    FhirString, FhirStringBuilder, "string", String, check_fhir_string
);
primitive!(Markdown, MarkdownBuilder, "markdown", String, check_markdown);
primitive!(Code, CodeBuilder, "code", String, check_code);
primitive!(Id, IdBuilder, "id", String, check_id);
primitive!(Uri, UriBuilder, "uri", String, check_plain_uri);
primitive!(Canonical, CanonicalBuilder, "canonical", String, check_canonical);
primitive!(
    /// Partial or full calendar date: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    Date, DateBuilder, "date", String, check_date
);
primitive!(
    /// Date with optional time; a time requires a zone offset.
    DateTime, DateTimeBuilder, "dateTime", String, check_date_time
);
primitive!(Time, TimeBuilder, "time", String, check_time);
primitive!(
    /// Timestamp with mandatory seconds and zone offset.
    Instant, InstantBuilder, "instant", String, check_instant
);

string_value!(FhirString, Markdown, Code, Id, Uri, Canonical, Date, DateTime, Time, Instant);
infallible_from!(Boolean(bool), Integer(i32), Decimal(rust_decimal::Decimal));
