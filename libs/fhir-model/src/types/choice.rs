//! Closed choice types.
//!
//! Each distinct set of alternatives a `[x]` field may take is declared
//! once here and reused by every field with that signature.

use crate::types::*;
use crate::visitor::Visitable;

/// A closed set of datatypes a choice field may hold.
pub trait ChoiceType: TryFrom<Element, Error = Element> + Into<Element> + Clone {
    /// FHIR names of the alternatives, in declaration order.
    const TYPE_NAMES: &'static [&'static str];

    /// The payload as a node.
    fn value(&self) -> &dyn Visitable;

    /// FHIR type name of the payload.
    fn type_name(&self) -> &'static str {
        self.value().type_name()
    }
}

macro_rules! choice_type {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($ty:ty)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($ty),)+
        }

        impl ChoiceType for $name {
            const TYPE_NAMES: &'static [&'static str] = &[$(<$ty as DataType>::TYPE_NAME),+];

            fn value(&self) -> &dyn Visitable {
                match self {
                    $($name::$variant(value) => value,)+
                }
            }
        }

        impl TryFrom<Element> for $name {
            type Error = Element;

            fn try_from(element: Element) -> std::result::Result<Self, Element> {
                match element {
                    $(Element::$variant(value) => Ok($name::$variant(value)),)+
                    other => Err(other),
                }
            }
        }

        impl From<$name> for Element {
            fn from(choice: $name) -> Self {
                match choice {
                    $($name::$variant(value) => Element::$variant(value),)+
                }
            }
        }

        impl From<$name> for Option<Element> {
            fn from(choice: $name) -> Self {
                Some(choice.into())
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    $name::$variant(value)
                }
            }
        )+
    };
}

choice_type!(
    /// `Immunization.occurrence[x]`.
    DateTimeOrString { DateTime(DateTime), String(FhirString) }
);

choice_type!(
    /// `ClinicalImpression.effective[x]`.
    DateTimeOrPeriod { DateTime(DateTime), Period(Period) }
);

choice_type!(
    /// `ProtocolApplied.doseNumber[x]` and `seriesDoses[x]`.
    PositiveIntOrString { PositiveInt(PositiveInt), String(FhirString) }
);

choice_type!(
    /// `MedicationRequest.reported[x]`.
    BooleanOrReference { Boolean(Boolean), Reference(Reference) }
);

choice_type!(
    /// `MedicationRequest.medication[x]`.
    CodeableConceptOrReference { CodeableConcept(CodeableConcept), Reference(Reference) }
);

choice_type!(
    /// `Substitution.allowed[x]` and `Dosage.asNeeded[x]`.
    BooleanOrCodeableConcept { Boolean(Boolean), CodeableConcept(CodeableConcept) }
);

choice_type!(
    /// `Annotation.author[x]`.
    ReferenceOrString { Reference(Reference), String(FhirString) }
);

choice_type!(
    /// `DoseAndRate.dose[x]`.
    RangeOrQuantity { Range(Range), Quantity(Quantity) }
);

choice_type!(
    /// `DoseAndRate.rate[x]`.
    RatioOrRangeOrQuantity { Ratio(Ratio), Range(Range), Quantity(Quantity) }
);

choice_type!(
    /// `Questionnaire.item.enableWhen.answer[x]`.
    EnableWhenAnswer {
        Boolean(Boolean),
        Decimal(Decimal),
        Integer(Integer),
        Date(Date),
        DateTime(DateTime),
        Time(Time),
        String(FhirString),
        Coding(Coding),
        Quantity(Quantity),
        Reference(Reference),
    }
);

choice_type!(
    /// `Questionnaire.item.answerOption.value[x]`.
    AnswerOptionValue {
        Integer(Integer),
        Date(Date),
        Time(Time),
        String(FhirString),
        Coding(Coding),
        Reference(Reference),
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_follow_declaration_order() {
        assert_eq!(PositiveIntOrString::TYPE_NAMES, &["positiveInt", "string"]);
        assert_eq!(
            RatioOrRangeOrQuantity::TYPE_NAMES,
            &["Ratio", "Range", "Quantity"]
        );
    }

    #[test]
    fn test_narrowing() {
        let element = Element::from(DateTime::new("2021-03-04").unwrap());
        let narrowed = DateTimeOrPeriod::try_from(element.clone()).unwrap();
        assert_eq!(narrowed.type_name(), "dateTime");
        assert_eq!(Element::from(narrowed), element);

        let rejected = PositiveIntOrString::try_from(element.clone()).unwrap_err();
        assert_eq!(rejected, element);
    }
}
