//! General-purpose complex datatypes.

use crate::builder::{finish, BackboneElementBuilder, ElementBuilder};
use crate::error::Result;
use crate::types::element::{BackboneBase, BackboneFields, ElementBase, ElementFields};
use crate::types::{
    Boolean, Canonical, Code, DataType, DateTime, Decimal, Element, FhirString, Id, Instant,
    Markdown, ReferenceOrString, Uri,
};
use crate::validation::{
    check_choice_reference_type, check_reference_type, check_string, choice_element,
    require_non_null, require_value_or_children,
};
use crate::visitor::{Field, Fields, NodeKind, Visitable};
use crate::Error;

macro_rules! complex_visitable {
    ($name:ident, $kind:ident, |$this:ident| $fields:expr) => {
        impl DataType for $name {
            const TYPE_NAME: &'static str = stringify!($name);
        }

        impl Visitable for $name {
            fn type_name(&self) -> &'static str {
                stringify!($name)
            }

            fn kind(&self) -> NodeKind {
                NodeKind::$kind
            }

            fn fields(&self) -> Vec<Field<'_>> {
                let $this = self;
                $fields
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };
}

pub(crate) use complex_visitable;

// ============================================================================
// Coding
// ============================================================================

/// A code defined by a terminology system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coding {
    base: ElementFields,
    system: Option<Uri>,
    version: Option<FhirString>,
    code: Option<Code>,
    display: Option<FhirString>,
    user_selected: Option<Boolean>,
}

impl Coding {
    pub fn builder() -> CodingBuilder {
        CodingBuilder::default()
    }

    pub fn to_builder(&self) -> CodingBuilder {
        CodingBuilder::from(self)
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    pub fn user_selected(&self) -> Option<&Boolean> {
        self.user_selected.as_ref()
    }
}

impl ElementBase for Coding {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Coding, Complex, |c| Fields::new()
    .element(&c.base)
    .opt("system", c.system.as_ref())
    .opt("version", c.version.as_ref())
    .opt("code", c.code.as_ref())
    .opt("display", c.display.as_ref())
    .opt("userSelected", c.user_selected.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct CodingBuilder {
    base: ElementFields,
    system: Option<Uri>,
    version: Option<FhirString>,
    code: Option<Code>,
    display: Option<FhirString>,
    user_selected: Option<Boolean>,
}

impl CodingBuilder {
    pub fn system(mut self, system: impl Into<Option<Uri>>) -> Self {
        self.system = system.into();
        self
    }

    pub fn version(mut self, version: impl Into<Option<FhirString>>) -> Self {
        self.version = version.into();
        self
    }

    pub fn code(mut self, code: impl Into<Option<Code>>) -> Self {
        self.code = code.into();
        self
    }

    pub fn display(mut self, display: impl Into<Option<FhirString>>) -> Self {
        self.display = display.into();
        self
    }

    pub fn user_selected(mut self, user_selected: impl Into<Option<Boolean>>) -> Self {
        self.user_selected = user_selected.into();
        self
    }

    pub fn build(&self) -> Result<Coding> {
        finish("Coding", || {
            self.base.validate()?;
            let coding = Coding {
                base: self.base.clone(),
                system: self.system.clone(),
                version: self.version.clone(),
                code: self.code.clone(),
                display: self.display.clone(),
                user_selected: self.user_selected.clone(),
            };
            require_value_or_children(&coding)?;
            Ok(coding)
        })
    }
}

impl ElementBuilder for CodingBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Coding> for CodingBuilder {
    fn from(coding: &Coding) -> Self {
        Self {
            base: coding.base.clone(),
            system: coding.system.clone(),
            version: coding.version.clone(),
            code: coding.code.clone(),
            display: coding.display.clone(),
            user_selected: coding.user_selected.clone(),
        }
    }
}

// ============================================================================
// CodeableConcept
// ============================================================================

/// Codings plus free text for one concept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeableConcept {
    base: ElementFields,
    coding: Vec<Coding>,
    text: Option<FhirString>,
}

impl CodeableConcept {
    pub fn builder() -> CodeableConceptBuilder {
        CodeableConceptBuilder::default()
    }

    pub fn to_builder(&self) -> CodeableConceptBuilder {
        CodeableConceptBuilder::from(self)
    }

    /// Shorthand for a concept carrying only `text`.
    pub fn from_text(text: impl Into<String>) -> Result<Self> {
        Self::builder().text(FhirString::new(text)?).build()
    }

    pub fn coding(&self) -> &[Coding] {
        &self.coding
    }

    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }
}

impl ElementBase for CodeableConcept {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(CodeableConcept, Complex, |c| Fields::new()
    .element(&c.base)
    .many("coding", &c.coding)
    .opt("text", c.text.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct CodeableConceptBuilder {
    base: ElementFields,
    coding: Vec<Coding>,
    text: Option<FhirString>,
}

impl CodeableConceptBuilder {
    pub fn coding(mut self, coding: impl IntoIterator<Item = Coding>) -> Self {
        self.coding.extend(coding);
        self
    }

    pub fn set_coding(mut self, coding: impl IntoIterator<Item = Coding>) -> Self {
        self.coding = coding.into_iter().collect();
        self
    }

    pub fn text(mut self, text: impl Into<Option<FhirString>>) -> Self {
        self.text = text.into();
        self
    }

    pub fn build(&self) -> Result<CodeableConcept> {
        finish("CodeableConcept", || {
            self.base.validate()?;
            let concept = CodeableConcept {
                base: self.base.clone(),
                coding: self.coding.clone(),
                text: self.text.clone(),
            };
            require_value_or_children(&concept)?;
            Ok(concept)
        })
    }
}

impl ElementBuilder for CodeableConceptBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&CodeableConcept> for CodeableConceptBuilder {
    fn from(concept: &CodeableConcept) -> Self {
        Self {
            base: concept.base.clone(),
            coding: concept.coding.clone(),
            text: concept.text.clone(),
        }
    }
}

// ============================================================================
// Identifier
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    base: ElementFields,
    use_: Option<Code>,
    type_: Option<CodeableConcept>,
    system: Option<Uri>,
    value: Option<FhirString>,
    period: Option<Period>,
    assigner: Option<Box<Reference>>,
}

impl Identifier {
    pub fn builder() -> IdentifierBuilder {
        IdentifierBuilder::default()
    }

    pub fn to_builder(&self) -> IdentifierBuilder {
        IdentifierBuilder::from(self)
    }

    pub fn use_(&self) -> Option<&Code> {
        self.use_.as_ref()
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn assigner(&self) -> Option<&Reference> {
        self.assigner.as_deref()
    }
}

impl ElementBase for Identifier {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Identifier, Complex, |i| Fields::new()
    .element(&i.base)
    .opt("use", i.use_.as_ref())
    .opt("type", i.type_.as_ref())
    .opt("system", i.system.as_ref())
    .opt("value", i.value.as_ref())
    .opt("period", i.period.as_ref())
    .opt("assigner", i.assigner.as_deref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct IdentifierBuilder {
    base: ElementFields,
    use_: Option<Code>,
    type_: Option<CodeableConcept>,
    system: Option<Uri>,
    value: Option<FhirString>,
    period: Option<Period>,
    assigner: Option<Box<Reference>>,
}

impl IdentifierBuilder {
    pub fn use_(mut self, use_: impl Into<Option<Code>>) -> Self {
        self.use_ = use_.into();
        self
    }

    pub fn type_(mut self, type_: impl Into<Option<CodeableConcept>>) -> Self {
        self.type_ = type_.into();
        self
    }

    pub fn system(mut self, system: impl Into<Option<Uri>>) -> Self {
        self.system = system.into();
        self
    }

    pub fn value(mut self, value: impl Into<Option<FhirString>>) -> Self {
        self.value = value.into();
        self
    }

    pub fn period(mut self, period: impl Into<Option<Period>>) -> Self {
        self.period = period.into();
        self
    }

    pub fn assigner(mut self, assigner: impl Into<Option<Reference>>) -> Self {
        self.assigner = assigner.into().map(Box::new);
        self
    }

    pub fn build(&self) -> Result<Identifier> {
        finish("Identifier", || {
            self.base.validate()?;
            check_reference_type(self.assigner.as_deref(), "assigner", &["Organization"])?;
            let identifier = Identifier {
                base: self.base.clone(),
                use_: self.use_.clone(),
                type_: self.type_.clone(),
                system: self.system.clone(),
                value: self.value.clone(),
                period: self.period.clone(),
                assigner: self.assigner.clone(),
            };
            require_value_or_children(&identifier)?;
            Ok(identifier)
        })
    }
}

impl ElementBuilder for IdentifierBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Identifier> for IdentifierBuilder {
    fn from(identifier: &Identifier) -> Self {
        Self {
            base: identifier.base.clone(),
            use_: identifier.use_.clone(),
            type_: identifier.type_.clone(),
            system: identifier.system.clone(),
            value: identifier.value.clone(),
            period: identifier.period.clone(),
            assigner: identifier.assigner.clone(),
        }
    }
}

// ============================================================================
// Reference
// ============================================================================

/// A link from one resource to another.
///
/// Which resource types a reference may target depends on the field that
/// holds it, so the owning builder checks the target, not this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    base: ElementFields,
    reference: Option<FhirString>,
    type_: Option<Uri>,
    identifier: Option<Identifier>,
    display: Option<FhirString>,
}

impl Reference {
    pub fn builder() -> ReferenceBuilder {
        ReferenceBuilder::default()
    }

    pub fn to_builder(&self) -> ReferenceBuilder {
        ReferenceBuilder::from(self)
    }

    /// Shorthand for a literal reference such as `Patient/123`.
    pub fn to(literal: impl Into<String>) -> Result<Self> {
        Self::builder().reference(FhirString::new(literal)?).build()
    }

    pub fn reference(&self) -> Option<&FhirString> {
        self.reference.as_ref()
    }

    pub fn type_(&self) -> Option<&Uri> {
        self.type_.as_ref()
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }
}

impl ElementBase for Reference {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Reference, Complex, |r| Fields::new()
    .element(&r.base)
    .opt("reference", r.reference.as_ref())
    .opt("type", r.type_.as_ref())
    .opt("identifier", r.identifier.as_ref())
    .opt("display", r.display.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    base: ElementFields,
    reference: Option<FhirString>,
    type_: Option<Uri>,
    identifier: Option<Identifier>,
    display: Option<FhirString>,
}

impl ReferenceBuilder {
    pub fn reference(mut self, reference: impl Into<Option<FhirString>>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn type_(mut self, type_: impl Into<Option<Uri>>) -> Self {
        self.type_ = type_.into();
        self
    }

    pub fn identifier(mut self, identifier: impl Into<Option<Identifier>>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn display(mut self, display: impl Into<Option<FhirString>>) -> Self {
        self.display = display.into();
        self
    }

    pub fn build(&self) -> Result<Reference> {
        finish("Reference", || {
            self.base.validate()?;
            let reference = Reference {
                base: self.base.clone(),
                reference: self.reference.clone(),
                type_: self.type_.clone(),
                identifier: self.identifier.clone(),
                display: self.display.clone(),
            };
            require_value_or_children(&reference)?;
            Ok(reference)
        })
    }
}

impl ElementBuilder for ReferenceBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Reference> for ReferenceBuilder {
    fn from(reference: &Reference) -> Self {
        Self {
            base: reference.base.clone(),
            reference: reference.reference.clone(),
            type_: reference.type_.clone(),
            identifier: reference.identifier.clone(),
            display: reference.display.clone(),
        }
    }
}

// ============================================================================
// Period
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    base: ElementFields,
    start: Option<DateTime>,
    end: Option<DateTime>,
}

impl Period {
    pub fn builder() -> PeriodBuilder {
        PeriodBuilder::default()
    }

    pub fn to_builder(&self) -> PeriodBuilder {
        PeriodBuilder::from(self)
    }

    pub fn start(&self) -> Option<&DateTime> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&DateTime> {
        self.end.as_ref()
    }
}

impl ElementBase for Period {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Period, Complex, |p| Fields::new()
    .element(&p.base)
    .opt("start", p.start.as_ref())
    .opt("end", p.end.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct PeriodBuilder {
    base: ElementFields,
    start: Option<DateTime>,
    end: Option<DateTime>,
}

impl PeriodBuilder {
    pub fn start(mut self, start: impl Into<Option<DateTime>>) -> Self {
        self.start = start.into();
        self
    }

    pub fn end(mut self, end: impl Into<Option<DateTime>>) -> Self {
        self.end = end.into();
        self
    }

    pub fn build(&self) -> Result<Period> {
        finish("Period", || {
            self.base.validate()?;
            let period = Period {
                base: self.base.clone(),
                start: self.start.clone(),
                end: self.end.clone(),
            };
            require_value_or_children(&period)?;
            Ok(period)
        })
    }
}

impl ElementBuilder for PeriodBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Period> for PeriodBuilder {
    fn from(period: &Period) -> Self {
        Self {
            base: period.base.clone(),
            start: period.start.clone(),
            end: period.end.clone(),
        }
    }
}

// ============================================================================
// Quantity
// ============================================================================

/// A measured amount. Also stands in for the `SimpleQuantity` and
/// `Duration` profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    base: ElementFields,
    value: Option<Decimal>,
    comparator: Option<Code>,
    unit: Option<FhirString>,
    system: Option<Uri>,
    code: Option<Code>,
}

impl Quantity {
    pub fn builder() -> QuantityBuilder {
        QuantityBuilder::default()
    }

    pub fn to_builder(&self) -> QuantityBuilder {
        QuantityBuilder::from(self)
    }

    pub fn value(&self) -> Option<&Decimal> {
        self.value.as_ref()
    }

    pub fn comparator(&self) -> Option<&Code> {
        self.comparator.as_ref()
    }

    pub fn unit(&self) -> Option<&FhirString> {
        self.unit.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }
}

impl ElementBase for Quantity {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Quantity, Complex, |q| Fields::new()
    .element(&q.base)
    .opt("value", q.value.as_ref())
    .opt("comparator", q.comparator.as_ref())
    .opt("unit", q.unit.as_ref())
    .opt("system", q.system.as_ref())
    .opt("code", q.code.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct QuantityBuilder {
    base: ElementFields,
    value: Option<Decimal>,
    comparator: Option<Code>,
    unit: Option<FhirString>,
    system: Option<Uri>,
    code: Option<Code>,
}

impl QuantityBuilder {
    pub fn value(mut self, value: impl Into<Option<Decimal>>) -> Self {
        self.value = value.into();
        self
    }

    pub fn comparator(mut self, comparator: impl Into<Option<Code>>) -> Self {
        self.comparator = comparator.into();
        self
    }

    pub fn unit(mut self, unit: impl Into<Option<FhirString>>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn system(mut self, system: impl Into<Option<Uri>>) -> Self {
        self.system = system.into();
        self
    }

    pub fn code(mut self, code: impl Into<Option<Code>>) -> Self {
        self.code = code.into();
        self
    }

    pub fn build(&self) -> Result<Quantity> {
        finish("Quantity", || {
            self.base.validate()?;
            let quantity = Quantity {
                base: self.base.clone(),
                value: self.value.clone(),
                comparator: self.comparator.clone(),
                unit: self.unit.clone(),
                system: self.system.clone(),
                code: self.code.clone(),
            };
            require_value_or_children(&quantity)?;
            Ok(quantity)
        })
    }
}

impl ElementBuilder for QuantityBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Quantity> for QuantityBuilder {
    fn from(quantity: &Quantity) -> Self {
        Self {
            base: quantity.base.clone(),
            value: quantity.value.clone(),
            comparator: quantity.comparator.clone(),
            unit: quantity.unit.clone(),
            system: quantity.system.clone(),
            code: quantity.code.clone(),
        }
    }
}

// ============================================================================
// Range
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    base: ElementFields,
    low: Option<Quantity>,
    high: Option<Quantity>,
}

impl Range {
    pub fn builder() -> RangeBuilder {
        RangeBuilder::default()
    }

    pub fn to_builder(&self) -> RangeBuilder {
        RangeBuilder::from(self)
    }

    pub fn low(&self) -> Option<&Quantity> {
        self.low.as_ref()
    }

    pub fn high(&self) -> Option<&Quantity> {
        self.high.as_ref()
    }
}

impl ElementBase for Range {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Range, Complex, |r| Fields::new()
    .element(&r.base)
    .opt("low", r.low.as_ref())
    .opt("high", r.high.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct RangeBuilder {
    base: ElementFields,
    low: Option<Quantity>,
    high: Option<Quantity>,
}

impl RangeBuilder {
    pub fn low(mut self, low: impl Into<Option<Quantity>>) -> Self {
        self.low = low.into();
        self
    }

    pub fn high(mut self, high: impl Into<Option<Quantity>>) -> Self {
        self.high = high.into();
        self
    }

    pub fn build(&self) -> Result<Range> {
        finish("Range", || {
            self.base.validate()?;
            let range = Range {
                base: self.base.clone(),
                low: self.low.clone(),
                high: self.high.clone(),
            };
            require_value_or_children(&range)?;
            Ok(range)
        })
    }
}

impl ElementBuilder for RangeBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Range> for RangeBuilder {
    fn from(range: &Range) -> Self {
        Self {
            base: range.base.clone(),
            low: range.low.clone(),
            high: range.high.clone(),
        }
    }
}

// ============================================================================
// Ratio
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ratio {
    base: ElementFields,
    numerator: Option<Quantity>,
    denominator: Option<Quantity>,
}

impl Ratio {
    pub fn builder() -> RatioBuilder {
        RatioBuilder::default()
    }

    pub fn to_builder(&self) -> RatioBuilder {
        RatioBuilder::from(self)
    }

    pub fn numerator(&self) -> Option<&Quantity> {
        self.numerator.as_ref()
    }

    pub fn denominator(&self) -> Option<&Quantity> {
        self.denominator.as_ref()
    }
}

impl ElementBase for Ratio {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Ratio, Complex, |r| Fields::new()
    .element(&r.base)
    .opt("numerator", r.numerator.as_ref())
    .opt("denominator", r.denominator.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct RatioBuilder {
    base: ElementFields,
    numerator: Option<Quantity>,
    denominator: Option<Quantity>,
}

impl RatioBuilder {
    pub fn numerator(mut self, numerator: impl Into<Option<Quantity>>) -> Self {
        self.numerator = numerator.into();
        self
    }

    pub fn denominator(mut self, denominator: impl Into<Option<Quantity>>) -> Self {
        self.denominator = denominator.into();
        self
    }

    pub fn build(&self) -> Result<Ratio> {
        finish("Ratio", || {
            self.base.validate()?;
            let ratio = Ratio {
                base: self.base.clone(),
                numerator: self.numerator.clone(),
                denominator: self.denominator.clone(),
            };
            require_value_or_children(&ratio)?;
            Ok(ratio)
        })
    }
}

impl ElementBuilder for RatioBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Ratio> for RatioBuilder {
    fn from(ratio: &Ratio) -> Self {
        Self {
            base: ratio.base.clone(),
            numerator: ratio.numerator.clone(),
            denominator: ratio.denominator.clone(),
        }
    }
}

// ============================================================================
// Annotation
// ============================================================================

/// A note with optional author and time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    base: ElementFields,
    author: Option<ReferenceOrString>,
    time: Option<DateTime>,
    text: Markdown,
}

impl Annotation {
    pub fn builder(text: impl Into<Option<Markdown>>) -> AnnotationBuilder {
        AnnotationBuilder {
            base: ElementFields::default(),
            author: None,
            time: None,
            text: text.into(),
        }
    }

    pub fn to_builder(&self) -> AnnotationBuilder {
        AnnotationBuilder::from(self)
    }

    /// `author[x]`: a `Reference` or a `string`.
    pub fn author(&self) -> Option<&ReferenceOrString> {
        self.author.as_ref()
    }

    pub fn time(&self) -> Option<&DateTime> {
        self.time.as_ref()
    }

    pub fn text(&self) -> &Markdown {
        &self.text
    }
}

impl ElementBase for Annotation {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Annotation, Complex, |a| Fields::new()
    .element(&a.base)
    .choice("author", a.author.as_ref())
    .opt("time", a.time.as_ref())
    .one("text", &a.text)
    .build());

#[derive(Debug, Clone)]
pub struct AnnotationBuilder {
    base: ElementFields,
    author: Option<Element>,
    time: Option<DateTime>,
    text: Option<Markdown>,
}

impl AnnotationBuilder {
    pub fn author(mut self, author: impl Into<Option<Element>>) -> Self {
        self.author = author.into();
        self
    }

    pub fn time(mut self, time: impl Into<Option<DateTime>>) -> Self {
        self.time = time.into();
        self
    }

    pub fn build(&self) -> Result<Annotation> {
        finish("Annotation", || {
            self.base.validate()?;
            let author = choice_element::<ReferenceOrString>(self.author.clone(), "author")?;
            check_choice_reference_type(
                author.as_ref(),
                "author",
                &["Practitioner", "Patient", "RelatedPerson", "Organization"],
            )?;
            let annotation = Annotation {
                base: self.base.clone(),
                author,
                time: self.time.clone(),
                text: require_non_null(self.text.clone(), "text")?,
            };
            require_value_or_children(&annotation)?;
            Ok(annotation)
        })
    }
}

impl ElementBuilder for AnnotationBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Annotation> for AnnotationBuilder {
    fn from(annotation: &Annotation) -> Self {
        Self {
            base: annotation.base.clone(),
            author: annotation.author.clone().map(Element::from),
            time: annotation.time.clone(),
            text: Some(annotation.text.clone()),
        }
    }
}

// ============================================================================
// Meta
// ============================================================================

/// Resource metadata maintained by the infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Meta {
    base: ElementFields,
    version_id: Option<Id>,
    last_updated: Option<Instant>,
    source: Option<Uri>,
    profile: Vec<Canonical>,
    security: Vec<Coding>,
    tag: Vec<Coding>,
}

impl Meta {
    pub fn builder() -> MetaBuilder {
        MetaBuilder::default()
    }

    pub fn to_builder(&self) -> MetaBuilder {
        MetaBuilder::from(self)
    }

    pub fn version_id(&self) -> Option<&Id> {
        self.version_id.as_ref()
    }

    pub fn last_updated(&self) -> Option<&Instant> {
        self.last_updated.as_ref()
    }

    pub fn source(&self) -> Option<&Uri> {
        self.source.as_ref()
    }

    pub fn profile(&self) -> &[Canonical] {
        &self.profile
    }

    pub fn security(&self) -> &[Coding] {
        &self.security
    }

    pub fn tag(&self) -> &[Coding] {
        &self.tag
    }
}

impl ElementBase for Meta {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Meta, Complex, |m| Fields::new()
    .element(&m.base)
    .opt("versionId", m.version_id.as_ref())
    .opt("lastUpdated", m.last_updated.as_ref())
    .opt("source", m.source.as_ref())
    .many("profile", &m.profile)
    .many("security", &m.security)
    .many("tag", &m.tag)
    .build());

#[derive(Debug, Clone, Default)]
pub struct MetaBuilder {
    base: ElementFields,
    version_id: Option<Id>,
    last_updated: Option<Instant>,
    source: Option<Uri>,
    profile: Vec<Canonical>,
    security: Vec<Coding>,
    tag: Vec<Coding>,
}

impl MetaBuilder {
    pub fn version_id(mut self, version_id: impl Into<Option<Id>>) -> Self {
        self.version_id = version_id.into();
        self
    }

    pub fn last_updated(mut self, last_updated: impl Into<Option<Instant>>) -> Self {
        self.last_updated = last_updated.into();
        self
    }

    pub fn source(mut self, source: impl Into<Option<Uri>>) -> Self {
        self.source = source.into();
        self
    }

    pub fn profile(mut self, profile: impl IntoIterator<Item = Canonical>) -> Self {
        self.profile.extend(profile);
        self
    }

    pub fn set_profile(mut self, profile: impl IntoIterator<Item = Canonical>) -> Self {
        self.profile = profile.into_iter().collect();
        self
    }

    pub fn security(mut self, security: impl IntoIterator<Item = Coding>) -> Self {
        self.security.extend(security);
        self
    }

    pub fn set_security(mut self, security: impl IntoIterator<Item = Coding>) -> Self {
        self.security = security.into_iter().collect();
        self
    }

    pub fn tag(mut self, tag: impl IntoIterator<Item = Coding>) -> Self {
        self.tag.extend(tag);
        self
    }

    pub fn set_tag(mut self, tag: impl IntoIterator<Item = Coding>) -> Self {
        self.tag = tag.into_iter().collect();
        self
    }

    pub fn build(&self) -> Result<Meta> {
        finish("Meta", || {
            self.base.validate()?;
            let meta = Meta {
                base: self.base.clone(),
                version_id: self.version_id.clone(),
                last_updated: self.last_updated.clone(),
                source: self.source.clone(),
                profile: self.profile.clone(),
                security: self.security.clone(),
                tag: self.tag.clone(),
            };
            require_value_or_children(&meta)?;
            Ok(meta)
        })
    }
}

impl ElementBuilder for MetaBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Meta> for MetaBuilder {
    fn from(meta: &Meta) -> Self {
        Self {
            base: meta.base.clone(),
            version_id: meta.version_id.clone(),
            last_updated: meta.last_updated.clone(),
            source: meta.source.clone(),
            profile: meta.profile.clone(),
            security: meta.security.clone(),
            tag: meta.tag.clone(),
        }
    }
}

// ============================================================================
// Narrative
// ============================================================================

/// Human-readable XHTML summary of a resource.
///
/// `div` is kept as text; only its outer element is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Narrative {
    base: ElementFields,
    status: Code,
    div: String,
}

impl Narrative {
    pub fn builder(status: impl Into<Option<Code>>, div: impl Into<String>) -> NarrativeBuilder {
        NarrativeBuilder {
            base: ElementFields::default(),
            status: status.into(),
            div: div.into(),
        }
    }

    pub fn to_builder(&self) -> NarrativeBuilder {
        NarrativeBuilder::from(self)
    }

    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn div(&self) -> &str {
        &self.div
    }
}

impl ElementBase for Narrative {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

complex_visitable!(Narrative, Complex, |n| Fields::new()
    .element(&n.base)
    .one("status", &n.status)
    .raw_string("div", Some(n.div.as_str()))
    .build());

#[derive(Debug, Clone)]
pub struct NarrativeBuilder {
    base: ElementFields,
    status: Option<Code>,
    div: String,
}

impl NarrativeBuilder {
    pub fn build(&self) -> Result<Narrative> {
        finish("Narrative", || {
            self.base.validate()?;
            let status = require_non_null(self.status.clone(), "status")?;
            check_string("xhtml", &self.div)?;
            let div = self.div.trim();
            if !(div.starts_with("<div") && div.ends_with("</div>")) {
                return Err(Error::invalid_value(
                    "xhtml",
                    self.div.clone(),
                    "narrative content must be a single <div> element",
                ));
            }
            Ok(Narrative {
                base: self.base.clone(),
                status,
                div: self.div.clone(),
            })
        })
    }
}

impl ElementBuilder for NarrativeBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&Narrative> for NarrativeBuilder {
    fn from(narrative: &Narrative) -> Self {
        Self {
            base: narrative.base.clone(),
            status: Some(narrative.status.clone()),
            div: narrative.div.clone(),
        }
    }
}

// ============================================================================
// Timing
// ============================================================================

/// When an event is to occur: explicit instants and/or a named schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timing {
    base: BackboneFields,
    event: Vec<DateTime>,
    code: Option<CodeableConcept>,
}

impl Timing {
    pub fn builder() -> TimingBuilder {
        TimingBuilder::default()
    }

    pub fn to_builder(&self) -> TimingBuilder {
        TimingBuilder::from(self)
    }

    pub fn event(&self) -> &[DateTime] {
        &self.event
    }

    pub fn code(&self) -> Option<&CodeableConcept> {
        self.code.as_ref()
    }
}

impl BackboneBase for Timing {
    fn backbone_base(&self) -> &BackboneFields {
        &self.base
    }
}

complex_visitable!(Timing, Complex, |t| Fields::new()
    .backbone(&t.base)
    .many("event", &t.event)
    .opt("code", t.code.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct TimingBuilder {
    base: BackboneFields,
    event: Vec<DateTime>,
    code: Option<CodeableConcept>,
}

impl TimingBuilder {
    pub fn event(mut self, event: impl IntoIterator<Item = DateTime>) -> Self {
        self.event.extend(event);
        self
    }

    pub fn set_event(mut self, event: impl IntoIterator<Item = DateTime>) -> Self {
        self.event = event.into_iter().collect();
        self
    }

    pub fn code(mut self, code: impl Into<Option<CodeableConcept>>) -> Self {
        self.code = code.into();
        self
    }

    pub fn build(&self) -> Result<Timing> {
        finish("Timing", || {
            self.base.validate()?;
            let timing = Timing {
                base: self.base.clone(),
                event: self.event.clone(),
                code: self.code.clone(),
            };
            require_value_or_children(&timing)?;
            Ok(timing)
        })
    }
}

impl ElementBuilder for TimingBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base.element
    }
}

impl BackboneElementBuilder for TimingBuilder {
    fn backbone_fields(&mut self) -> &mut BackboneFields {
        &mut self.base
    }
}

impl From<&Timing> for TimingBuilder {
    fn from(timing: &Timing) -> Self {
        Self {
            base: timing.base.clone(),
            event: timing.event.clone(),
            code: timing.code.clone(),
        }
    }
}
