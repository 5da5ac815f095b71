//! FHIR JSON rendering through the visitor.

use serde_json::json;

use ferrum_model::prelude::*;
use ferrum_model::resource::Questionnaire;
use ferrum_model::types::{Code, Decimal, Extension, Quantity};
use ferrum_model::visitor::{to_json, walk, JsonWriter};

mod test_support;
use test_support::*;

#[test]
fn minimal_immunization() {
    let immunization = flu_shot().build().unwrap();
    let rendered = to_json(&immunization);

    assert_eq!(
        rendered,
        json!({
            "resourceType": "Immunization",
            "status": "completed",
            "vaccineCode": {"text": "Flu"},
            "patient": {"reference": "Patient/1"},
            "occurrenceDateTime": "2020-01-01"
        })
    );
    let keys: Vec<&str> = rendered
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec!["resourceType", "status", "vaccineCode", "patient", "occurrenceDateTime"]
    );
}

#[test]
fn contained_resources_and_repeated_elements() {
    let rendered = to_json(&populated_order());

    assert_eq!(rendered["resourceType"], "MedicationRequest");
    assert_eq!(rendered["id"], "mr-1");
    assert_eq!(rendered["contained"][0]["resourceType"], "Immunization");
    assert_eq!(rendered["contained"][0]["status"], "completed");
    assert_eq!(rendered["identifier"][1]["value"], "a-2");
    assert_eq!(rendered["medicationCodeableConcept"]["text"], "Amoxicillin 250mg");
    assert_eq!(
        rendered["dosageInstruction"],
        json!([{"text": "one tablet three times a day"}])
    );
    assert!(rendered.get("note").is_none());
}

#[test]
fn repeated_primitives_stay_aligned() {
    let described = Code::builder().id("s2").build().unwrap();
    let questionnaire = Questionnaire::builder(code("active"))
        .subject_type([code("Patient"), described])
        .build()
        .unwrap();

    assert_eq!(
        to_json(&questionnaire),
        json!({
            "resourceType": "Questionnaire",
            "status": "active",
            "subjectType": ["Patient", null],
            "_subjectType": [null, {"id": "s2"}]
        })
    );
}

#[test]
fn extensions_and_decimals() {
    let weight = Quantity::builder()
        .value(Decimal::from(rust_decimal::Decimal::new(725, 1)))
        .unit(string("kg"))
        .build()
        .unwrap();
    let note = Extension::builder("http://example.org/weight")
        .value(weight)
        .build()
        .unwrap();
    let immunization = flu_shot().extension([note]).build().unwrap();

    assert_eq!(
        to_json(&immunization)["extension"],
        json!([{
            "url": "http://example.org/weight",
            "valueQuantity": {"value": 72.5, "unit": "kg"}
        }])
    );
}

#[test]
fn decimals_keep_their_written_form() {
    let dose = |text: &str| {
        let value: rust_decimal::Decimal = text.parse().unwrap();
        Quantity::builder()
            .value(Decimal::from(value))
            .unit(string("mg"))
            .build()
            .unwrap()
    };

    assert_eq!(to_json(&dose("1.50")).to_string(), r#"{"value":1.50,"unit":"mg"}"#);
    assert_eq!(
        to_json(&dose("12345678901234567.123456789")).to_string(),
        r#"{"value":12345678901234567.123456789,"unit":"mg"}"#
    );
    let parsed: serde_json::Value =
        serde_json::from_str(r#"{"value":1.50,"unit":"mg"}"#).unwrap();
    assert_eq!(to_json(&dose("1.50")), parsed);
}

#[test]
fn writer_can_be_driven_directly() {
    let mut writer = JsonWriter::new();
    walk(&concept("Flu"), &mut writer);
    assert_eq!(writer.into_value(), json!({"text": "Flu"}));
    assert_eq!(JsonWriter::new().into_value(), serde_json::Value::Null);
}
