//! Structural base shared by every element, and `Extension`.

use std::any::Any;

use crate::builder::{finish, ElementBuilder};
use crate::error::Result;
use crate::types::{DataType, Element};
use crate::validation::{check_string, check_uri, require_value_or_children};
use crate::visitor::{Field, Fields, NodeKind, Visitable};

/// `id` and `extension`, embedded by every element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementFields {
    pub(crate) id: Option<String>,
    pub(crate) extension: Vec<Extension>,
}

impl ElementFields {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn extension(&self) -> &[Extension] {
        &self.extension
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match &self.id {
            Some(id) => check_string("string", id),
            None => Ok(()),
        }
    }
}

/// [`ElementFields`] plus `modifierExtension`, embedded by backbone elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BackboneFields {
    pub(crate) element: ElementFields,
    pub(crate) modifier_extension: Vec<Extension>,
}

impl BackboneFields {
    pub fn id(&self) -> Option<&str> {
        self.element.id()
    }

    pub fn extension(&self) -> &[Extension] {
        self.element.extension()
    }

    pub fn modifier_extension(&self) -> &[Extension] {
        &self.modifier_extension
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.element.validate()
    }
}

/// Accessors for the element base, implemented by every element type.
pub trait ElementBase {
    fn element_base(&self) -> &ElementFields;

    fn id(&self) -> Option<&str> {
        self.element_base().id()
    }

    fn extension(&self) -> &[Extension] {
        self.element_base().extension()
    }
}

/// Accessors for the backbone base.
pub trait BackboneBase {
    fn backbone_base(&self) -> &BackboneFields;

    fn id(&self) -> Option<&str> {
        self.backbone_base().id()
    }

    fn extension(&self) -> &[Extension] {
        self.backbone_base().extension()
    }

    fn modifier_extension(&self) -> &[Extension] {
        self.backbone_base().modifier_extension()
    }
}

// ============================================================================
// Extension
// ============================================================================

/// URI-keyed side-channel data attached to an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    base: ElementFields,
    url: String,
    value: Option<Element>,
}

impl Extension {
    /// Start an extension for `url`.
    pub fn builder(url: impl Into<String>) -> ExtensionBuilder {
        ExtensionBuilder {
            base: ElementFields::default(),
            url: url.into(),
            value: None,
        }
    }

    pub fn to_builder(&self) -> ExtensionBuilder {
        ExtensionBuilder::from(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `value[x]`; any datatype is allowed.
    pub fn value(&self) -> Option<&Element> {
        self.value.as_ref()
    }
}

impl ElementBase for Extension {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

impl DataType for Extension {
    const TYPE_NAME: &'static str = "Extension";
}

impl Visitable for Extension {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Complex
    }

    fn fields(&self) -> Vec<Field<'_>> {
        Fields::new()
            .element(&self.base)
            .raw_string("url", Some(self.url.as_str()))
            .any("value", self.value.as_ref())
            .build()
    }

    /// `url` is an attribute, not a child.
    fn has_children(&self) -> bool {
        !self.base.is_empty() || self.value.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone)]
pub struct ExtensionBuilder {
    base: ElementFields,
    url: String,
    value: Option<Element>,
}

impl ExtensionBuilder {
    pub fn value(mut self, value: impl Into<Option<Element>>) -> Self {
        self.value = value.into();
        self
    }

    pub fn build(&self) -> Result<Extension> {
        finish(Extension::TYPE_NAME, || {
            self.base.validate()?;
            check_uri("uri", &self.url)?;
            let extension = Extension {
                base: self.base.clone(),
                url: self.url.clone(),
                value: self.value.clone(),
            };
            require_value_or_children(&extension)?;
            Ok(extension)
        })
    }
}

impl ElementBuilder for ExtensionBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Extension> for ExtensionBuilder {
    fn from(extension: &Extension) -> Self {
        Self {
            base: extension.base.clone(),
            url: extension.url.clone(),
            value: extension.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Boolean, Code};
    use crate::Error;

    #[test]
    fn test_extension_url_must_be_a_uri() {
        let err = Extension::builder("not a uri").build().unwrap_err();
        assert!(matches!(err, Error::InvalidValue { kind: "uri", .. }));
    }

    #[test]
    fn test_extension_needs_value_or_nested_extension() {
        let err = Extension::builder("http://example.org/x").build().unwrap_err();
        assert_eq!(err, Error::EmptyElement { element: "Extension" });

        let identified = Extension::builder("http://example.org/x").id("e1").build().unwrap();
        assert!(identified.has_children());
        assert!(identified.value().is_none());
    }

    #[test]
    fn test_extension_accepts_any_value() {
        let ext = Extension::builder("http://example.org/flag")
            .value(Boolean::from(true))
            .build()
            .unwrap();
        assert_eq!(ext.url(), "http://example.org/flag");
        assert_eq!(ext.value().map(Element::type_name), Some("boolean"));

        let coded = ext.to_builder().value(Code::new("x").unwrap()).build().unwrap();
        assert_eq!(coded.value().map(Element::type_name), Some("code"));
        assert_ne!(ext, coded);
    }

    #[test]
    fn test_nested_extensions() {
        let inner = Extension::builder("inner")
            .value(Boolean::from(false))
            .build()
            .unwrap();
        let outer = Extension::builder("http://example.org/complex")
            .extension([inner.clone()])
            .build()
            .unwrap();
        assert_eq!(outer.extension(), &[inner]);
        assert!(outer.value().is_none());
    }
}
