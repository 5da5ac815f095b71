#![allow(dead_code)]

use ferrum_model::prelude::*;
use ferrum_model::resource::{
    Immunization, ImmunizationBuilder, MedicationRequest, MedicationRequestBuilder,
};
use ferrum_model::types::{
    Code, CodeableConcept, DateTime, Dosage, FhirString, Identifier, Reference, Uri,
};

pub fn code(value: &str) -> Code {
    Code::new(value).expect("valid code")
}

pub fn string(value: &str) -> FhirString {
    FhirString::new(value).expect("valid string")
}

pub fn reference(literal: &str) -> Reference {
    Reference::to(literal).expect("valid reference")
}

pub fn concept(text: &str) -> CodeableConcept {
    CodeableConcept::from_text(text).expect("valid concept")
}

pub fn identifier(value: &str) -> Identifier {
    Identifier::builder()
        .system(Uri::new("http://example.org/ids").expect("valid uri"))
        .value(string(value))
        .build()
        .expect("valid identifier")
}

/// Immunization with the four required elements and nothing else.
pub fn flu_shot() -> ImmunizationBuilder {
    Immunization::builder(
        code("completed"),
        concept("Flu"),
        reference("Patient/1"),
        DateTime::new("2020-01-01").expect("valid dateTime"),
    )
}

pub fn amoxicillin_order() -> MedicationRequestBuilder {
    MedicationRequest::builder(
        code("active"),
        code("order"),
        concept("Amoxicillin 250mg"),
        reference("Patient/example"),
    )
}

/// MedicationRequest with two identifiers, a dosage and a contained
/// immunization.
pub fn populated_order() -> MedicationRequest {
    amoxicillin_order()
        .id(ferrum_model::types::Id::new("mr-1").expect("valid id"))
        .identifier([identifier("a-1"), identifier("a-2")])
        .category([concept("outpatient")])
        .authored_on(DateTime::new("2021-03-04T10:00:00Z").expect("valid dateTime"))
        .requester(reference("Practitioner/dr-1"))
        .dosage_instruction([Dosage::builder()
            .text(string("one tablet three times a day"))
            .build()
            .expect("valid dosage")])
        .contained([flu_shot().build().expect("valid immunization")])
        .build()
        .expect("valid medication request")
}
