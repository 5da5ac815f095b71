//! `Dosage` and its `doseAndRate` component.

use crate::builder::{finish, BackboneElementBuilder, ElementBuilder};
use crate::error::Result;
use crate::types::complex::complex_visitable;
use crate::types::element::{BackboneBase, BackboneFields, ElementBase, ElementFields};
use crate::types::{
    BooleanOrCodeableConcept, CodeableConcept, DataType, Element, FhirString, Integer, Quantity,
    RangeOrQuantity, Ratio, RatioOrRangeOrQuantity, Timing,
};
use crate::validation::{choice_element, require_value_or_children};
use crate::visitor::{Field, Fields, NodeKind, Visitable};

/// How a medication is to be taken.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dosage {
    base: BackboneFields,
    sequence: Option<Integer>,
    text: Option<FhirString>,
    additional_instruction: Vec<CodeableConcept>,
    patient_instruction: Option<FhirString>,
    timing: Option<Timing>,
    as_needed: Option<BooleanOrCodeableConcept>,
    site: Option<CodeableConcept>,
    route: Option<CodeableConcept>,
    method: Option<CodeableConcept>,
    dose_and_rate: Vec<DoseAndRate>,
    max_dose_per_period: Option<Ratio>,
    max_dose_per_administration: Option<Quantity>,
    max_dose_per_lifetime: Option<Quantity>,
}

impl Dosage {
    pub fn builder() -> DosageBuilder {
        DosageBuilder::default()
    }

    pub fn to_builder(&self) -> DosageBuilder {
        DosageBuilder::from(self)
    }

    pub fn sequence(&self) -> Option<&Integer> {
        self.sequence.as_ref()
    }

    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }

    pub fn additional_instruction(&self) -> &[CodeableConcept] {
        &self.additional_instruction
    }

    pub fn patient_instruction(&self) -> Option<&FhirString> {
        self.patient_instruction.as_ref()
    }

    pub fn timing(&self) -> Option<&Timing> {
        self.timing.as_ref()
    }

    pub fn as_needed(&self) -> Option<&BooleanOrCodeableConcept> {
        self.as_needed.as_ref()
    }

    pub fn site(&self) -> Option<&CodeableConcept> {
        self.site.as_ref()
    }

    pub fn route(&self) -> Option<&CodeableConcept> {
        self.route.as_ref()
    }

    pub fn method(&self) -> Option<&CodeableConcept> {
        self.method.as_ref()
    }

    pub fn dose_and_rate(&self) -> &[DoseAndRate] {
        &self.dose_and_rate
    }

    pub fn max_dose_per_period(&self) -> Option<&Ratio> {
        self.max_dose_per_period.as_ref()
    }

    pub fn max_dose_per_administration(&self) -> Option<&Quantity> {
        self.max_dose_per_administration.as_ref()
    }

    pub fn max_dose_per_lifetime(&self) -> Option<&Quantity> {
        self.max_dose_per_lifetime.as_ref()
    }
}

impl BackboneBase for Dosage {
    fn backbone_base(&self) -> &BackboneFields {
        &self.base
    }
}

complex_visitable!(Dosage, Complex, |d| Fields::new()
    .backbone(&d.base)
    .opt("sequence", d.sequence.as_ref())
    .opt("text", d.text.as_ref())
    .many("additionalInstruction", &d.additional_instruction)
    .opt("patientInstruction", d.patient_instruction.as_ref())
    .opt("timing", d.timing.as_ref())
    .choice("asNeeded", d.as_needed.as_ref())
    .opt("site", d.site.as_ref())
    .opt("route", d.route.as_ref())
    .opt("method", d.method.as_ref())
    .many("doseAndRate", &d.dose_and_rate)
    .opt("maxDosePerPeriod", d.max_dose_per_period.as_ref())
    .opt("maxDosePerAdministration", d.max_dose_per_administration.as_ref())
    .opt("maxDosePerLifetime", d.max_dose_per_lifetime.as_ref())
    .build());

#[derive(Debug, Clone, Default)]
pub struct DosageBuilder {
    base: BackboneFields,
    sequence: Option<Integer>,
    text: Option<FhirString>,
    additional_instruction: Vec<CodeableConcept>,
    patient_instruction: Option<FhirString>,
    timing: Option<Timing>,
    as_needed: Option<Element>,
    site: Option<CodeableConcept>,
    route: Option<CodeableConcept>,
    method: Option<CodeableConcept>,
    dose_and_rate: Vec<DoseAndRate>,
    max_dose_per_period: Option<Ratio>,
    max_dose_per_administration: Option<Quantity>,
    max_dose_per_lifetime: Option<Quantity>,
}

impl DosageBuilder {
    pub fn sequence(mut self, sequence: impl Into<Option<Integer>>) -> Self {
        self.sequence = sequence.into();
        self
    }

    pub fn text(mut self, text: impl Into<Option<FhirString>>) -> Self {
        self.text = text.into();
        self
    }

    pub fn additional_instruction(
        mut self,
        instruction: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.additional_instruction.extend(instruction);
        self
    }

    pub fn set_additional_instruction(
        mut self,
        instruction: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.additional_instruction = instruction.into_iter().collect();
        self
    }

    pub fn patient_instruction(mut self, instruction: impl Into<Option<FhirString>>) -> Self {
        self.patient_instruction = instruction.into();
        self
    }

    pub fn timing(mut self, timing: impl Into<Option<Timing>>) -> Self {
        self.timing = timing.into();
        self
    }

    /// `asNeeded[x]`: `boolean` or `CodeableConcept`.
    pub fn as_needed(mut self, as_needed: impl Into<Option<Element>>) -> Self {
        self.as_needed = as_needed.into();
        self
    }

    pub fn site(mut self, site: impl Into<Option<CodeableConcept>>) -> Self {
        self.site = site.into();
        self
    }

    pub fn route(mut self, route: impl Into<Option<CodeableConcept>>) -> Self {
        self.route = route.into();
        self
    }

    pub fn method(mut self, method: impl Into<Option<CodeableConcept>>) -> Self {
        self.method = method.into();
        self
    }

    pub fn dose_and_rate(mut self, dose_and_rate: impl IntoIterator<Item = DoseAndRate>) -> Self {
        self.dose_and_rate.extend(dose_and_rate);
        self
    }

    pub fn set_dose_and_rate(
        mut self,
        dose_and_rate: impl IntoIterator<Item = DoseAndRate>,
    ) -> Self {
        self.dose_and_rate = dose_and_rate.into_iter().collect();
        self
    }

    pub fn max_dose_per_period(mut self, ratio: impl Into<Option<Ratio>>) -> Self {
        self.max_dose_per_period = ratio.into();
        self
    }

    pub fn max_dose_per_administration(mut self, quantity: impl Into<Option<Quantity>>) -> Self {
        self.max_dose_per_administration = quantity.into();
        self
    }

    pub fn max_dose_per_lifetime(mut self, quantity: impl Into<Option<Quantity>>) -> Self {
        self.max_dose_per_lifetime = quantity.into();
        self
    }

    pub fn build(&self) -> Result<Dosage> {
        finish("Dosage", || {
            self.base.validate()?;
            let dosage = Dosage {
                base: self.base.clone(),
                sequence: self.sequence.clone(),
                text: self.text.clone(),
                additional_instruction: self.additional_instruction.clone(),
                patient_instruction: self.patient_instruction.clone(),
                timing: self.timing.clone(),
                as_needed: choice_element(self.as_needed.clone(), "asNeeded")?,
                site: self.site.clone(),
                route: self.route.clone(),
                method: self.method.clone(),
                dose_and_rate: self.dose_and_rate.clone(),
                max_dose_per_period: self.max_dose_per_period.clone(),
                max_dose_per_administration: self.max_dose_per_administration.clone(),
                max_dose_per_lifetime: self.max_dose_per_lifetime.clone(),
            };
            require_value_or_children(&dosage)?;
            Ok(dosage)
        })
    }
}

impl ElementBuilder for DosageBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base.element
    }
}

impl BackboneElementBuilder for DosageBuilder {
    fn backbone_fields(&mut self) -> &mut BackboneFields {
        &mut self.base
    }
}

impl From<&Dosage> for DosageBuilder {
    fn from(dosage: &Dosage) -> Self {
        Self {
            base: dosage.base.clone(),
            sequence: dosage.sequence.clone(),
            text: dosage.text.clone(),
            additional_instruction: dosage.additional_instruction.clone(),
            patient_instruction: dosage.patient_instruction.clone(),
            timing: dosage.timing.clone(),
            as_needed: dosage.as_needed.clone().map(Element::from),
            site: dosage.site.clone(),
            route: dosage.route.clone(),
            method: dosage.method.clone(),
            dose_and_rate: dosage.dose_and_rate.clone(),
            max_dose_per_period: dosage.max_dose_per_period.clone(),
            max_dose_per_administration: dosage.max_dose_per_administration.clone(),
            max_dose_per_lifetime: dosage.max_dose_per_lifetime.clone(),
        }
    }
}

// ============================================================================
// DoseAndRate
// ============================================================================

/// Amount of medication per dose and per unit of time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoseAndRate {
    base: ElementFields,
    type_: Option<CodeableConcept>,
    dose: Option<RangeOrQuantity>,
    rate: Option<RatioOrRangeOrQuantity>,
}

impl DoseAndRate {
    pub fn builder() -> DoseAndRateBuilder {
        DoseAndRateBuilder::default()
    }

    pub fn to_builder(&self) -> DoseAndRateBuilder {
        DoseAndRateBuilder::from(self)
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn dose(&self) -> Option<&RangeOrQuantity> {
        self.dose.as_ref()
    }

    pub fn rate(&self) -> Option<&RatioOrRangeOrQuantity> {
        self.rate.as_ref()
    }
}

impl ElementBase for DoseAndRate {
    fn element_base(&self) -> &ElementFields {
        &self.base
    }
}

impl DataType for DoseAndRate {
    const TYPE_NAME: &'static str = "Dosage.DoseAndRate";
}

impl Visitable for DoseAndRate {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Complex
    }

    fn fields(&self) -> Vec<Field<'_>> {
        Fields::new()
            .element(&self.base)
            .opt("type", self.type_.as_ref())
            .choice("dose", self.dose.as_ref())
            .choice("rate", self.rate.as_ref())
            .build()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoseAndRateBuilder {
    base: ElementFields,
    type_: Option<CodeableConcept>,
    dose: Option<Element>,
    rate: Option<Element>,
}

impl DoseAndRateBuilder {
    pub fn type_(mut self, type_: impl Into<Option<CodeableConcept>>) -> Self {
        self.type_ = type_.into();
        self
    }

    /// `dose[x]`: `Range` or `Quantity`.
    pub fn dose(mut self, dose: impl Into<Option<Element>>) -> Self {
        self.dose = dose.into();
        self
    }

    /// `rate[x]`: `Ratio`, `Range` or `Quantity`.
    pub fn rate(mut self, rate: impl Into<Option<Element>>) -> Self {
        self.rate = rate.into();
        self
    }

    pub fn build(&self) -> Result<DoseAndRate> {
        finish(DoseAndRate::TYPE_NAME, || {
            self.base.validate()?;
            let dose_and_rate = DoseAndRate {
                base: self.base.clone(),
                type_: self.type_.clone(),
                dose: choice_element(self.dose.clone(), "dose")?,
                rate: choice_element(self.rate.clone(), "rate")?,
            };
            require_value_or_children(&dose_and_rate)?;
            Ok(dose_and_rate)
        })
    }
}

impl ElementBuilder for DoseAndRateBuilder {
    fn element_fields(&mut self) -> &mut ElementFields {
        &mut self.base
    }
}

impl From<&DoseAndRate> for DoseAndRateBuilder {
    fn from(dose_and_rate: &DoseAndRate) -> Self {
        Self {
            base: dose_and_rate.base.clone(),
            type_: dose_and_rate.type_.clone(),
            dose: dose_and_rate.dose.clone().map(Element::from),
            rate: dose_and_rate.rate.clone().map(Element::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Boolean, ChoiceType, Code, Decimal, Range};
    use crate::Error;

    fn mg(amount: i64) -> Quantity {
        Quantity::builder()
            .value(Decimal::from(rust_decimal::Decimal::from(amount)))
            .code(Code::new("mg").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_dose_choice() {
        let dose = DoseAndRate::builder().dose(mg(5)).build().unwrap();
        assert!(matches!(dose.dose(), Some(RangeOrQuantity::Quantity(_))));

        let err = DoseAndRate::builder().dose(Boolean::from(true)).build().unwrap_err();
        assert!(matches!(err, Error::InvalidChoiceType { field: "dose", .. }));

        let range = Range::builder().low(mg(1)).high(mg(2)).build().unwrap();
        let rate = DoseAndRate::builder().rate(range).build().unwrap();
        assert_eq!(rate.rate().map(|r| r.type_name()), Some("Range"));
    }

    #[test]
    fn test_dosage_round_trip() {
        let dosage = Dosage::builder()
            .sequence(Integer::from(1))
            .text(FhirString::new("1 tablet daily").unwrap())
            .as_needed(Boolean::from(false))
            .dose_and_rate([DoseAndRate::builder().dose(mg(10)).build().unwrap()])
            .build()
            .unwrap();
        assert_eq!(dosage.to_builder().build().unwrap(), dosage);
        assert!(Dosage::builder().build().is_err());
    }
}
