//! Validation switches applied to construction.

use ferrum_model::config::{self, with_config, ModelConfig, Preset};
use ferrum_model::types::FhirString;
use ferrum_model::Error;

mod test_support;
use test_support::*;

#[test]
fn yaml_overrides_preset() {
    let cfg = ModelConfig::from_yaml("preset: Lenient\ncheck_control_chars: true\n").unwrap();
    assert!(!cfg.check_reference_types);
    assert!(cfg.check_control_chars);

    let round_trip = ModelConfig::from_yaml(&cfg.to_yaml().unwrap()).unwrap();
    assert_eq!(round_trip, cfg);

    assert!(matches!(
        ModelConfig::from_yaml("check_everything: true"),
        Err(Error::Config(_))
    ));
}

#[test]
fn scoped_config_relaxes_reference_checks() {
    let wrong_patient = || {
        ferrum_model::resource::Immunization::builder(
            code("completed"),
            concept("Flu"),
            reference("Group/1"),
            ferrum_model::types::DateTime::new("2020").unwrap(),
        )
        .build()
    };

    // explicit scopes: another test in this binary swaps the global config
    let strict = ModelConfig::default();
    assert!(matches!(
        with_config(strict, wrong_patient),
        Err(Error::InvalidReference { field: "patient", .. })
    ));
    let lenient = ModelConfig::preset(Preset::Lenient);
    assert!(with_config(lenient, wrong_patient).is_ok());
}

#[test]
fn control_characters() {
    with_config(ModelConfig::default(), || {
        assert!(FhirString::new("bell\u{7}").is_err());
        assert!(FhirString::new("tab\tand\nnewline").is_ok());
    });

    let relaxed = ModelConfig::builder().check_control_chars(false).build();
    assert!(with_config(relaxed, || FhirString::new("bell\u{7}")).is_ok());
}

#[test]
fn installed_config_is_the_fallback() {
    let previous = config::current();
    ModelConfig::preset(Preset::Lenient).install();
    assert_eq!(ModelConfig::current(), ModelConfig::preset(Preset::Lenient));

    let strict = ModelConfig::default();
    with_config(strict, || assert_eq!(config::current(), strict));

    previous.install();
}
