//! Setters shared by every builder of a given base kind.
//!
//! Concrete builders embed the base field groups and expose them through
//! these traits. Repeated fields have an appending setter (`extension`)
//! and a replacing one (`set_extension`).

use crate::error::Result;
use crate::resource::{DomainResourceFields, Resource, ResourceFields};
use crate::types::element::{BackboneFields, ElementFields, Extension};
use crate::types::{Code, Id, Meta, Narrative, Uri};

pub trait ElementBuilder: Sized {
    fn element_fields(&mut self) -> &mut ElementFields;

    fn id(mut self, id: impl Into<String>) -> Self {
        self.element_fields().id = Some(id.into());
        self
    }

    fn clear_id(mut self) -> Self {
        self.element_fields().id = None;
        self
    }

    fn extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.element_fields().extension.extend(extension);
        self
    }

    fn set_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.element_fields().extension = extension.into_iter().collect();
        self
    }
}

pub trait BackboneElementBuilder: ElementBuilder {
    fn backbone_fields(&mut self) -> &mut BackboneFields;

    fn modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.backbone_fields().modifier_extension.extend(extension);
        self
    }

    fn set_modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.backbone_fields().modifier_extension = extension.into_iter().collect();
        self
    }
}

pub trait ResourceBuilder: Sized {
    fn resource_fields(&mut self) -> &mut ResourceFields;

    fn id(mut self, id: impl Into<Option<Id>>) -> Self {
        self.resource_fields().id = id.into();
        self
    }

    fn meta(mut self, meta: impl Into<Option<Meta>>) -> Self {
        self.resource_fields().meta = meta.into();
        self
    }

    fn implicit_rules(mut self, implicit_rules: impl Into<Option<Uri>>) -> Self {
        self.resource_fields().implicit_rules = implicit_rules.into();
        self
    }

    fn language(mut self, language: impl Into<Option<Code>>) -> Self {
        self.resource_fields().language = language.into();
        self
    }
}

pub trait DomainResourceBuilder: ResourceBuilder {
    fn domain_fields(&mut self) -> &mut DomainResourceFields;

    fn text(mut self, text: impl Into<Option<Narrative>>) -> Self {
        self.domain_fields().text = text.into();
        self
    }

    fn contained<I>(mut self, contained: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Resource>,
    {
        self.domain_fields()
            .contained
            .extend(contained.into_iter().map(Into::into));
        self
    }

    fn set_contained<I>(mut self, contained: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Resource>,
    {
        self.domain_fields().contained = contained.into_iter().map(Into::into).collect();
        self
    }

    fn extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.domain_fields().extension.extend(extension);
        self
    }

    fn set_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.domain_fields().extension = extension.into_iter().collect();
        self
    }

    fn modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.domain_fields().modifier_extension.extend(extension);
        self
    }

    fn set_modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.domain_fields().modifier_extension = extension.into_iter().collect();
        self
    }
}

/// Run a build step, logging the rejection if it fails.
pub(crate) fn finish<T>(element: &'static str, build: impl FnOnce() -> Result<T>) -> Result<T> {
    build().inspect_err(|error| tracing::debug!(element, %error, "rejected model object"))
}
