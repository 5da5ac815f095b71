//! FHIR datatypes: primitives, general-purpose complex types and the
//! closed choice enums built from them.

pub mod choice;
pub mod complex;
pub mod dosage;
pub mod element;
pub mod primitive;

pub use choice::*;
pub use complex::*;
pub use dosage::{Dosage, DosageBuilder, DoseAndRate, DoseAndRateBuilder};
pub use element::{Extension, ExtensionBuilder};
pub use primitive::*;

use crate::visitor::Visitable;

/// A concrete FHIR datatype.
pub trait DataType: Visitable + Clone {
    /// Name as it appears in FHIR type lists and choice element suffixes.
    const TYPE_NAME: &'static str;
}

macro_rules! open_element {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Any datatype value, before it is narrowed to the alternatives of a
        /// choice field.
        ///
        /// Builders accept choice fields as `Element` so that a value of an
        /// undeclared type is reported as an error instead of being
        /// unrepresentable.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Element {
            $($variant($ty),)+
        }

        impl Element {
            /// FHIR type name of the payload.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Element::$variant(_) => <$ty as DataType>::TYPE_NAME,)+
                }
            }

            pub fn as_visitable(&self) -> &dyn Visitable {
                match self {
                    $(Element::$variant(value) => value,)+
                }
            }
        }

        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Element::$variant(value)
                }
            }

            impl From<$ty> for Option<Element> {
                fn from(value: $ty) -> Self {
                    Some(Element::$variant(value))
                }
            }
        )+
    };
}

open_element! {
    Boolean(Boolean),
    Integer(Integer),
    PositiveInt(PositiveInt),
    UnsignedInt(UnsignedInt),
    Decimal(Decimal),
    String(FhirString),
    Code(Code),
    Id(Id),
    Uri(Uri),
    Canonical(Canonical),
    Markdown(Markdown),
    Date(Date),
    DateTime(DateTime),
    Time(Time),
    Instant(Instant),
    Coding(Coding),
    CodeableConcept(CodeableConcept),
    Identifier(Identifier),
    Reference(Reference),
    Period(Period),
    Quantity(Quantity),
    Range(Range),
    Ratio(Ratio),
    Annotation(Annotation),
    Timing(Timing),
    Dosage(Dosage),
    Meta(Meta),
}

impl Element {
    pub fn downcast_ref<T: Visitable>(&self) -> Option<&T> {
        self.as_visitable().downcast_ref::<T>()
    }
}

/// JSON property name of a choice element holding a value of `type_name`,
/// e.g. `occurrence` + `dateTime` is `occurrenceDateTime`.
pub fn choice_element_name(name: &str, type_name: &str) -> String {
    let mut chars = type_name.chars();
    let mut out = String::with_capacity(name.len() + type_name.len());
    out.push_str(name);
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_element_name() {
        assert_eq!(choice_element_name("occurrence", "dateTime"), "occurrenceDateTime");
        assert_eq!(
            choice_element_name("medication", "CodeableConcept"),
            "medicationCodeableConcept"
        );
        assert_eq!(choice_element_name("value", "string"), "valueString");
    }

    #[test]
    fn test_element_type_name() {
        let element = Element::from(PositiveInt::new(2).unwrap());
        assert_eq!(element.type_name(), "positiveInt");
        assert!(element.downcast_ref::<PositiveInt>().is_some());
        assert!(element.downcast_ref::<FhirString>().is_none());
    }
}
