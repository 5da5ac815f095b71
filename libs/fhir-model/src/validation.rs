//! Construction-time checks shared by every builder.
//!
//! All functions are pure apart from reading the active
//! [`ModelConfig`](crate::config::ModelConfig).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config;
use crate::error::{Error, Result};
use crate::resource::is_resource_type;
use crate::types::{ChoiceType, Element, Reference};
use crate::visitor::Visitable;

pub const MIN_STRING_LENGTH: usize = 1;
pub const MAX_STRING_LENGTH: usize = 1_048_576;
pub const MAX_ID_LENGTH: usize = 64;

static RELATIVE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Za-z]+)/[A-Za-z0-9\-.]{1,64}(/_history/[A-Za-z0-9\-.]{1,64})?$")
        .expect("relative reference pattern")
});

// ============================================================================
// Presence and shape
// ============================================================================

/// Unwrap a required field.
pub fn require_non_null<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(Error::MissingRequiredField { field })
}

/// Narrow a required choice value to its declared alternatives.
pub fn require_choice_element<C: ChoiceType>(
    value: Option<Element>,
    field: &'static str,
) -> Result<C> {
    let value = require_non_null(value, field)?;
    narrow(value, field)
}

/// Narrow an optional choice value to its declared alternatives.
pub fn choice_element<C: ChoiceType>(
    value: Option<Element>,
    field: &'static str,
) -> Result<Option<C>> {
    value.map(|value| narrow(value, field)).transpose()
}

fn narrow<C: ChoiceType>(value: Element, field: &'static str) -> Result<C> {
    C::try_from(value).map_err(|rejected| Error::InvalidChoiceType {
        field,
        found: rejected.type_name(),
        allowed: C::TYPE_NAMES,
    })
}

/// ele-1: an element must carry a value or at least one child.
pub fn require_value_or_children(node: &dyn Visitable) -> Result<()> {
    if node.has_value() || node.has_children() {
        Ok(())
    } else {
        Err(Error::EmptyElement {
            element: node.type_name(),
        })
    }
}

// ============================================================================
// Lexical checks
// ============================================================================

/// FHIR `string`: `[ \r\n\t\S]+`, at most [`MAX_STRING_LENGTH`] characters.
pub fn check_string(kind: &'static str, value: &str) -> Result<()> {
    let length = value.chars().count();
    if length > MAX_STRING_LENGTH {
        return Err(Error::invalid_value(
            kind,
            truncated(value),
            format!("length {length} is greater than maximum allowed length {MAX_STRING_LENGTH}"),
        ));
    }
    let check_control_chars = config::current().check_control_chars;
    let mut visible = 0;
    for ch in value.chars() {
        if !ch.is_whitespace() {
            if check_control_chars && is_unsupported_control_char(ch) {
                return Err(Error::invalid_value(
                    kind,
                    value,
                    format!("unsupported control character U+{:04X}", ch as u32),
                ));
            }
            visible += 1;
        } else if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
            return Err(Error::invalid_value(
                kind,
                value,
                r"not valid with respect to pattern [ \r\n\t\S]+",
            ));
        }
    }
    if visible < MIN_STRING_LENGTH {
        return Err(Error::invalid_value(
            kind,
            value,
            "must contain at least one non-whitespace character",
        ));
    }
    Ok(())
}

fn is_unsupported_control_char(ch: char) -> bool {
    (ch as u32) < 0x20 && !matches!(ch, '\t' | '\r' | '\n')
}

/// FHIR `code`: no leading or trailing whitespace, single inner spaces only.
pub fn check_code(value: &str) -> Result<()> {
    check_string("code", value)?;
    if value.starts_with(char::is_whitespace) {
        return Err(Error::invalid_value(
            "code",
            value,
            "must begin with a non-whitespace character",
        ));
    }
    if value.ends_with(char::is_whitespace) {
        return Err(Error::invalid_value(
            "code",
            value,
            "must end with a non-whitespace character",
        ));
    }
    let mut previous_space = false;
    for ch in value.chars() {
        if ch == ' ' {
            if previous_space {
                return Err(Error::invalid_value(
                    "code",
                    value,
                    "must not contain consecutive spaces",
                ));
            }
            previous_space = true;
        } else if ch.is_whitespace() {
            return Err(Error::invalid_value(
                "code",
                value,
                "must not contain whitespace other than a single space",
            ));
        } else {
            previous_space = false;
        }
    }
    Ok(())
}

/// FHIR `id`: `[A-Za-z0-9\-\.]{1,64}`.
pub fn check_id(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_value("id", value, "must not be empty"));
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(Error::invalid_value(
            "id",
            value,
            format!(
                "length {} is greater than maximum allowed length {MAX_ID_LENGTH}",
                value.len()
            ),
        ));
    }
    if let Some(ch) = value
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '.'))
    {
        return Err(Error::invalid_value("id", value, format!("invalid character '{ch}'")));
    }
    Ok(())
}

/// FHIR `uri` and its specializations: no whitespace.
pub fn check_uri(kind: &'static str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_STRING_LENGTH {
        return Err(Error::invalid_value(
            kind,
            truncated(value),
            format!("length is greater than maximum allowed length {MAX_STRING_LENGTH}"),
        ));
    }
    if value.is_empty() {
        return Err(Error::invalid_value(kind, value, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(Error::invalid_value(kind, value, "must not contain whitespace"));
    }
    Ok(())
}

pub fn check_min_value(kind: &'static str, value: i32, min: i32) -> Result<()> {
    if value < min {
        return Err(Error::invalid_value(
            kind,
            value.to_string(),
            format!("less than minimum required value {min}"),
        ));
    }
    Ok(())
}

pub fn check_pattern(kind: &'static str, value: &str, pattern: &Regex) -> Result<()> {
    if !pattern.is_match(value) {
        return Err(Error::invalid_value(
            kind,
            value,
            format!("not valid with respect to pattern {}", pattern.as_str()),
        ));
    }
    Ok(())
}

fn truncated(value: &str) -> String {
    let mut head: String = value.chars().take(32).collect();
    head.push_str("...");
    head
}

// ============================================================================
// Reference targets
// ============================================================================

/// Check that a reference points at one of `allowed` resource types.
///
/// Local (`#id`) references and references carrying a URI scheme are not
/// inspected. Skipped entirely when reference type checks are disabled.
pub fn check_reference_type(
    reference: Option<&Reference>,
    field: &'static str,
    allowed: &[&str],
) -> Result<()> {
    let Some(reference) = reference else {
        return Ok(());
    };
    if !config::current().check_reference_types {
        return Ok(());
    }

    let invalid = |literal: &str, reason: String| Error::InvalidReference {
        field,
        reference: literal.to_string(),
        reason,
    };

    let literal = reference.reference().and_then(|r| r.as_str());
    let mut target = None;
    if let Some(literal) = literal.filter(|l| !l.starts_with('#') && !has_scheme(l)) {
        let resource_type = match literal.split_once('?') {
            Some((resource_type, _)) => Some(resource_type),
            None => RELATIVE_REFERENCE
                .captures(literal)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str()),
        };
        let Some(resource_type) = resource_type else {
            return Err(invalid(literal, "resource type not found in reference value".to_string()));
        };
        if !is_resource_type(resource_type) {
            return Err(invalid(
                literal,
                format!("'{resource_type}' is not a valid resource type name"),
            ));
        }
        if !allowed.contains(&resource_type) {
            return Err(invalid(
                literal,
                format!("resource type must be one of: {}", allowed.join(", ")),
            ));
        }
        target = Some(resource_type);
    }

    if let Some(declared) = reference.type_().and_then(|t| t.as_str()) {
        let shown = literal.unwrap_or(declared);
        if !is_resource_type(declared) {
            return Err(invalid(
                shown,
                format!("Reference.type '{declared}' is not a valid resource type name"),
            ));
        }
        if !allowed.contains(&declared) {
            return Err(invalid(
                shown,
                format!("Reference.type must be one of: {}", allowed.join(", ")),
            ));
        }
        if let Some(target) = target.filter(|target| *target != declared) {
            return Err(invalid(
                shown,
                format!("resource type '{target}' does not match Reference.type '{declared}'"),
            ));
        }
    }
    Ok(())
}

pub fn check_reference_types(
    references: &[Reference],
    field: &'static str,
    allowed: &[&str],
) -> Result<()> {
    references
        .iter()
        .try_for_each(|reference| check_reference_type(Some(reference), field, allowed))
}

/// Apply [`check_reference_type`] when a choice value holds a `Reference`.
pub fn check_choice_reference_type<C: ChoiceType>(
    value: Option<&C>,
    field: &'static str,
    allowed: &[&str],
) -> Result<()> {
    let reference = value.and_then(|value| value.value().downcast_ref::<Reference>());
    check_reference_type(reference, field, allowed)
}

fn has_scheme(literal: &str) -> bool {
    matches!(literal.find(':'), Some(index) if index > 0 && literal.len() > index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{with_config, ModelConfig, Preset};
    use crate::types::{DateTimeOrString, FhirString, Quantity, Uri};

    fn reference(literal: &str) -> Reference {
        Reference::builder()
            .reference(FhirString::new(literal).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_require_non_null() {
        assert_eq!(require_non_null(Some(1), "x"), Ok(1));
        assert_eq!(
            require_non_null::<i32>(None, "status"),
            Err(Error::MissingRequiredField { field: "status" })
        );
    }

    #[test]
    fn test_choice_element_rejects_undeclared_type() {
        let quantity = Quantity::builder().unit(FhirString::new("mg").unwrap()).build().unwrap();
        let err =
            choice_element::<DateTimeOrString>(Some(quantity.into()), "occurrence").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidChoiceType {
                field: "occurrence",
                found: "Quantity",
                allowed: &["dateTime", "string"],
            }
        );
        assert_eq!(choice_element::<DateTimeOrString>(None, "occurrence"), Ok(None));
        assert!(matches!(
            require_choice_element::<DateTimeOrString>(None, "occurrence"),
            Err(Error::MissingRequiredField { field: "occurrence" })
        ));
    }

    #[test]
    fn test_check_string() {
        assert!(check_string("string", "hello\tworld\r\n").is_ok());
        assert!(check_string("string", "   ").is_err());
        assert!(check_string("string", "").is_err());
        assert!(check_string("string", "a\u{00A0}b").is_err());
        assert!(check_string("string", "bell\u{0007}").is_err());
        with_config(ModelConfig::preset(Preset::Lenient), || {
            assert!(check_string("string", "bell\u{0007}").is_ok());
        });
    }

    #[test]
    fn test_check_code() {
        assert!(check_code("completed").is_ok());
        assert!(check_code("entered in error").is_ok());
        assert!(check_code(" lead").is_err());
        assert!(check_code("trail ").is_err());
        assert!(check_code("two  spaces").is_err());
        assert!(check_code("tab\there").is_err());
    }

    #[test]
    fn test_check_id() {
        assert!(check_id("abc-123.x").is_ok());
        assert!(check_id("").is_err());
        assert!(check_id("under_score").is_err());
        assert!(check_id(&"a".repeat(65)).is_err());
        assert!(check_id(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn test_check_uri() {
        assert!(check_uri("uri", "http://example.org/fhir").is_ok());
        assert!(check_uri("uri", "http://example.org/a b").is_err());
    }

    #[test]
    fn test_reference_targets() {
        let check = |literal: &str| {
            check_reference_type(Some(&reference(literal)), "subject", &["Patient", "Group"])
        };
        assert!(check("Patient/1").is_ok());
        assert!(check("Group/g/_history/2").is_ok());
        assert!(check("Patient?identifier=x").is_ok());
        assert!(check("#p1").is_ok());
        assert!(check("urn:uuid:1234").is_ok());
        assert!(check("http://x.org/fhir/Device/1").is_ok());

        let err = check("Device/1").unwrap_err();
        assert!(matches!(err, Error::InvalidReference { field: "subject", .. }));
        assert!(check("Unicorn/1").is_err());
        assert!(check("not a reference").is_err());
    }

    #[test]
    fn test_reference_type_must_agree() {
        let typed = Reference::builder()
            .reference(FhirString::new("Patient/1").unwrap())
            .type_(Uri::new("Group").unwrap())
            .build()
            .unwrap();
        assert!(check_reference_type(Some(&typed), "subject", &["Patient", "Group"]).is_err());
    }

    #[test]
    fn test_reference_checks_can_be_disabled() {
        with_config(ModelConfig::builder().check_reference_types(false).build(), || {
            let device = reference("Device/1");
            assert!(check_reference_type(Some(&device), "patient", &["Patient"]).is_ok());
        });
    }
}
