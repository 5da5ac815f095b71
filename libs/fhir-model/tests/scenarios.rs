//! Construction scenarios across resource types.

use ferrum_model::prelude::*;
use ferrum_model::resource::immunization::{Performer, ProtocolApplied};
use ferrum_model::resource::medication_request::Substitution;
use ferrum_model::resource::{Immunization, Resource};
use ferrum_model::types::{Boolean, DateTime, Extension, PositiveInt, Quantity, Timing, Uri};
use ferrum_model::Error;

mod test_support;
use test_support::*;

#[test]
fn immunization_with_required_fields_only() {
    let immunization = flu_shot().build().unwrap();

    assert_eq!(immunization.status().as_str(), Some("completed"));
    assert_eq!(
        immunization.vaccine_code().text().and_then(|t| t.as_str()),
        Some("Flu")
    );
    assert_eq!(
        immunization.patient().reference().and_then(|r| r.as_str()),
        Some("Patient/1")
    );
    assert_eq!(
        immunization.occurrence().value().downcast_ref::<DateTime>(),
        Some(&DateTime::new("2020-01-01").unwrap())
    );

    assert!(immunization.identifier().is_empty());
    assert!(immunization.performer().is_empty());
    assert!(immunization.note().is_empty());
    assert!(immunization.reason_code().is_empty());
    assert!(immunization.reason_reference().is_empty());
    assert!(immunization.subpotent_reason().is_empty());
    assert!(immunization.education().is_empty());
    assert!(immunization.program_eligibility().is_empty());
    assert!(immunization.reaction().is_empty());
    assert!(immunization.protocol_applied().is_empty());
    assert!(immunization.extension().is_empty());
    assert!(immunization.modifier_extension().is_empty());
    assert!(immunization.contained().is_empty());
}

#[test]
fn protocol_applied_rejects_quantity_dose_number() {
    let quantity = Quantity::builder().unit(string("dose")).build().unwrap();
    let err = ProtocolApplied::builder(quantity).build().unwrap_err();

    assert_eq!(err.field(), Some("doseNumber"));
    assert_eq!(
        err,
        Error::InvalidChoiceType {
            field: "doseNumber",
            found: "Quantity",
            allowed: &["positiveInt", "string"],
        }
    );
    assert_eq!(
        err.to_string(),
        "Invalid type: Quantity for choice element: 'doseNumber' must be one of: positiveInt, string"
    );
}

#[test]
fn each_allowed_choice_type_is_kept() {
    let by_number = ProtocolApplied::builder(PositiveInt::new(2).unwrap())
        .build()
        .unwrap();
    assert_eq!(
        by_number.dose_number().value().downcast_ref::<PositiveInt>(),
        Some(&PositiveInt::new(2).unwrap())
    );

    let by_text = ProtocolApplied::builder(string("booster")).build().unwrap();
    assert_eq!(by_text.dose_number().type_name(), "string");
}

#[test]
fn required_fields_are_enforced() {
    assert_eq!(
        Immunization::builder(None, concept("Flu"), reference("Patient/1"), None)
            .build()
            .unwrap_err(),
        Error::MissingRequiredField { field: "status" }
    );
    assert_eq!(
        Performer::builder(None).build().unwrap_err(),
        Error::MissingRequiredField { field: "actor" }
    );
    assert!(Performer::builder(reference("Practitioner/1")).build().is_ok());
}

#[test]
fn empty_backbone_elements_are_rejected() {
    assert_eq!(
        Timing::builder().build().unwrap_err(),
        Error::EmptyElement { element: "Timing" }
    );

    let flagged = Extension::builder("http://example.org/flag")
        .value(Boolean::from(true))
        .build()
        .unwrap();
    let timing = Timing::builder().modifier_extension([flagged]).build().unwrap();
    assert_eq!(timing.modifier_extension().len(), 1);
}

#[test]
fn append_and_replace_are_distinct() {
    let a = identifier("a");
    let b = identifier("b");
    let c = identifier("c");
    let seeded = flu_shot().identifier([a.clone(), b.clone()]);

    let appended = seeded.clone().identifier([c.clone()]).build().unwrap();
    assert_eq!(appended.identifier(), &[a, b, c.clone()]);

    let replaced = seeded.set_identifier([c.clone()]).build().unwrap();
    assert_eq!(replaced.identifier(), &[c]);
}

#[test]
fn builder_is_reusable_after_build() {
    let builder = flu_shot().lot_number(string("L-1"));
    let first = builder.build().unwrap();
    let second = builder.clone().lot_number(string("L-2")).build().unwrap();

    assert_eq!(first.lot_number().and_then(|l| l.as_str()), Some("L-1"));
    assert_eq!(second.lot_number().and_then(|l| l.as_str()), Some("L-2"));
    assert_eq!(builder.build().unwrap(), first);
}

#[test]
fn to_builder_round_trips_every_resource() {
    let order = populated_order();
    assert_eq!(order.to_builder().build().unwrap(), order);

    let immunization = flu_shot()
        .identifier([identifier("i-1")])
        .performer([Performer::builder(reference("Practitioner/1")).build().unwrap()])
        .build()
        .unwrap();
    assert_eq!(immunization.to_builder().build().unwrap(), immunization);
}

#[test]
fn copy_and_modify_leaves_the_source_alone() {
    let original = flu_shot().primary_source(Boolean::from(true)).build().unwrap();
    let updated = original
        .to_builder()
        .primary_source(Boolean::from(false))
        .build()
        .unwrap();

    assert_eq!(original.primary_source(), Some(&Boolean::from(true)));
    assert_eq!(updated.primary_source(), Some(&Boolean::from(false)));
    assert_eq!(updated.status(), original.status());
    assert_ne!(original, updated);
}

#[test]
fn contained_resources_are_owned() {
    let order = populated_order();
    let contained = order.contained();
    assert_eq!(contained.len(), 1);
    assert_eq!(contained[0].resource_type(), "Immunization");
    assert!(matches!(&contained[0], Resource::Immunization(_)));
    assert!(contained[0].downcast_ref::<Immunization>().is_some());
}

#[test]
fn substitution_allows_boolean_or_concept() {
    assert!(Substitution::builder(Boolean::from(true)).build().is_ok());
    assert!(Substitution::builder(concept("generic")).build().is_ok());
    let err = Substitution::builder(Uri::new("http://x").unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidChoiceType { field: "allowed", found: "uri", .. }));
}
