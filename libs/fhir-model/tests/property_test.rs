//! Property-based tests using QuickCheck

use quickcheck::{QuickCheck, TestResult};

use ferrum_model::resource::Immunization;
use ferrum_model::types::{FhirString, Identifier, PositiveInt};
use ferrum_model::visitor::structural_hash;

mod test_support;
use test_support::*;

/// Printable identifier values, or `None` when the input cannot be one.
fn clean_values(raw: Vec<String>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = raw
        .into_iter()
        .map(|s| s.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
        .filter(|s| !s.is_empty())
        .take(8)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn identifiers(values: &[String]) -> Vec<Identifier> {
    values.iter().map(|v| identifier(v)).collect()
}

fn with_identifiers(values: &[String]) -> Immunization {
    flu_shot().identifier(identifiers(values)).build().unwrap()
}

/// Property: equal inputs build equal resources with equal hashes
#[test]
fn prop_equality_agrees_with_hash() {
    fn prop(raw: Vec<String>) -> TestResult {
        let Some(values) = clean_values(raw) else {
            return TestResult::discard();
        };
        let a = with_identifiers(&values);
        let b = with_identifiers(&values);
        TestResult::from_bool(
            a == b
                && a.structural_hash() == b.structural_hash()
                && structural_hash(&a) == a.structural_hash(),
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<String>) -> TestResult);
}

/// Property: changing one field breaks equality
#[test]
fn prop_changed_field_breaks_equality() {
    fn prop(raw: Vec<String>, extra: u8) -> TestResult {
        let Some(values) = clean_values(raw) else {
            return TestResult::discard();
        };
        let base = with_identifiers(&values);
        let changed = base
            .to_builder()
            .lot_number(FhirString::new(format!("lot-{extra}")).unwrap())
            .build()
            .unwrap();
        TestResult::from_bool(base != changed)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<String>, u8) -> TestResult);
}

/// Property: to_builder().build() reproduces the resource
#[test]
fn prop_builder_round_trip() {
    fn prop(raw: Vec<String>, dose: u16) -> TestResult {
        let Some(values) = clean_values(raw) else {
            return TestResult::discard();
        };
        let applied = ferrum_model::resource::immunization::ProtocolApplied::builder(
            PositiveInt::new(i32::from(dose) + 1).unwrap(),
        )
        .build()
        .unwrap();
        let original = flu_shot()
            .identifier(identifiers(&values))
            .protocol_applied([applied])
            .build()
            .unwrap();
        let rebuilt = original.to_builder().build().unwrap();
        TestResult::from_bool(
            rebuilt == original && rebuilt.structural_hash() == original.structural_hash(),
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<String>, u16) -> TestResult);
}

/// Property: append extends the accumulated list, replace discards it
#[test]
fn prop_append_versus_replace() {
    fn prop(first: Vec<String>, second: Vec<String>) -> TestResult {
        let (Some(first), Some(second)) = (clean_values(first), clean_values(second)) else {
            return TestResult::discard();
        };
        let seeded = flu_shot().identifier(identifiers(&first));

        let appended = seeded.clone().identifier(identifiers(&second)).build().unwrap();
        let replaced = seeded.set_identifier(identifiers(&second)).build().unwrap();

        let mut expected = identifiers(&first);
        expected.extend(identifiers(&second));
        TestResult::from_bool(
            appended.identifier() == expected.as_slice()
                && replaced.identifier() == identifiers(&second).as_slice(),
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<String>, Vec<String>) -> TestResult);
}
