//! `ClinicalImpression` and its backbone elements.

use crate::builder::finish;
use crate::error::Result;
use crate::resource::{backbone_element, domain_resource, DomainResourceFields, ResourceFields};
use crate::types::element::BackboneFields;
use crate::types::{
    Annotation, Code, CodeableConcept, DateTime, DateTimeOrPeriod, Element, FhirString, Identifier,
    Reference, Uri,
};
use crate::validation::{
    check_reference_type, check_reference_types, choice_element, require_non_null,
    require_value_or_children,
};
use crate::visitor::{structural_hash, Fields};

/// A clinical assessment performed while working out a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicalImpression {
    hash: u64,
    resource: ResourceFields,
    domain: DomainResourceFields,
    identifier: Vec<Identifier>,
    status: Code,
    status_reason: Option<CodeableConcept>,
    code: Option<CodeableConcept>,
    description: Option<FhirString>,
    subject: Reference,
    encounter: Option<Reference>,
    effective: Option<DateTimeOrPeriod>,
    date: Option<DateTime>,
    assessor: Option<Reference>,
    previous: Option<Reference>,
    problem: Vec<Reference>,
    investigation: Vec<Investigation>,
    protocol: Vec<Uri>,
    summary: Option<FhirString>,
    finding: Vec<Finding>,
    prognosis_codeable_concept: Vec<CodeableConcept>,
    prognosis_reference: Vec<Reference>,
    supporting_info: Vec<Reference>,
    note: Vec<Annotation>,
}

impl ClinicalImpression {
    pub fn builder(
        status: impl Into<Option<Code>>,
        subject: impl Into<Option<Reference>>,
    ) -> ClinicalImpressionBuilder {
        ClinicalImpressionBuilder {
            resource: ResourceFields::default(),
            domain: DomainResourceFields::default(),
            identifier: Vec::new(),
            status: status.into(),
            status_reason: None,
            code: None,
            description: None,
            subject: subject.into(),
            encounter: None,
            effective: None,
            date: None,
            assessor: None,
            previous: None,
            problem: Vec::new(),
            investigation: Vec::new(),
            protocol: Vec::new(),
            summary: None,
            finding: Vec::new(),
            prognosis_codeable_concept: Vec::new(),
            prognosis_reference: Vec::new(),
            supporting_info: Vec::new(),
            note: Vec::new(),
        }
    }

    pub fn to_builder(&self) -> ClinicalImpressionBuilder {
        ClinicalImpressionBuilder::from(self)
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn status_reason(&self) -> Option<&CodeableConcept> {
        self.status_reason.as_ref()
    }

    pub fn code(&self) -> Option<&CodeableConcept> {
        self.code.as_ref()
    }

    pub fn description(&self) -> Option<&FhirString> {
        self.description.as_ref()
    }

    pub fn subject(&self) -> &Reference {
        &self.subject
    }

    pub fn encounter(&self) -> Option<&Reference> {
        self.encounter.as_ref()
    }

    /// `effective[x]`: `dateTime` or `Period`.
    pub fn effective(&self) -> Option<&DateTimeOrPeriod> {
        self.effective.as_ref()
    }

    pub fn date(&self) -> Option<&DateTime> {
        self.date.as_ref()
    }

    pub fn assessor(&self) -> Option<&Reference> {
        self.assessor.as_ref()
    }

    pub fn previous(&self) -> Option<&Reference> {
        self.previous.as_ref()
    }

    pub fn problem(&self) -> &[Reference] {
        &self.problem
    }

    pub fn investigation(&self) -> &[Investigation] {
        &self.investigation
    }

    pub fn protocol(&self) -> &[Uri] {
        &self.protocol
    }

    pub fn summary(&self) -> Option<&FhirString> {
        self.summary.as_ref()
    }

    pub fn finding(&self) -> &[Finding] {
        &self.finding
    }

    pub fn prognosis_codeable_concept(&self) -> &[CodeableConcept] {
        &self.prognosis_codeable_concept
    }

    pub fn prognosis_reference(&self) -> &[Reference] {
        &self.prognosis_reference
    }

    pub fn supporting_info(&self) -> &[Reference] {
        &self.supporting_info
    }

    pub fn note(&self) -> &[Annotation] {
        &self.note
    }
}

domain_resource!(
    ClinicalImpression,
    ClinicalImpressionBuilder,
    |c| Fields::new()
        .domain_resource(&c.resource, &c.domain)
        .many("identifier", &c.identifier)
        .one("status", &c.status)
        .opt("statusReason", c.status_reason.as_ref())
        .opt("code", c.code.as_ref())
        .opt("description", c.description.as_ref())
        .one("subject", &c.subject)
        .opt("encounter", c.encounter.as_ref())
        .choice("effective", c.effective.as_ref())
        .opt("date", c.date.as_ref())
        .opt("assessor", c.assessor.as_ref())
        .opt("previous", c.previous.as_ref())
        .many("problem", &c.problem)
        .many("investigation", &c.investigation)
        .many("protocol", &c.protocol)
        .opt("summary", c.summary.as_ref())
        .many("finding", &c.finding)
        .many("prognosisCodeableConcept", &c.prognosis_codeable_concept)
        .many("prognosisReference", &c.prognosis_reference)
        .many("supportingInfo", &c.supporting_info)
        .many("note", &c.note)
        .build()
);

#[derive(Debug, Clone)]
pub struct ClinicalImpressionBuilder {
    resource: ResourceFields,
    domain: DomainResourceFields,
    identifier: Vec<Identifier>,
    status: Option<Code>,
    status_reason: Option<CodeableConcept>,
    code: Option<CodeableConcept>,
    description: Option<FhirString>,
    subject: Option<Reference>,
    encounter: Option<Reference>,
    effective: Option<Element>,
    date: Option<DateTime>,
    assessor: Option<Reference>,
    previous: Option<Reference>,
    problem: Vec<Reference>,
    investigation: Vec<Investigation>,
    protocol: Vec<Uri>,
    summary: Option<FhirString>,
    finding: Vec<Finding>,
    prognosis_codeable_concept: Vec<CodeableConcept>,
    prognosis_reference: Vec<Reference>,
    supporting_info: Vec<Reference>,
    note: Vec<Annotation>,
}

impl ClinicalImpressionBuilder {
    pub fn identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier.extend(identifier);
        self
    }

    pub fn set_identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier = identifier.into_iter().collect();
        self
    }

    pub fn status_reason(mut self, status_reason: impl Into<Option<CodeableConcept>>) -> Self {
        self.status_reason = status_reason.into();
        self
    }

    pub fn code(mut self, code: impl Into<Option<CodeableConcept>>) -> Self {
        self.code = code.into();
        self
    }

    pub fn description(mut self, description: impl Into<Option<FhirString>>) -> Self {
        self.description = description.into();
        self
    }

    pub fn encounter(mut self, encounter: impl Into<Option<Reference>>) -> Self {
        self.encounter = encounter.into();
        self
    }

    /// `effective[x]`: `dateTime` or `Period`.
    pub fn effective(mut self, effective: impl Into<Option<Element>>) -> Self {
        self.effective = effective.into();
        self
    }

    pub fn date(mut self, date: impl Into<Option<DateTime>>) -> Self {
        self.date = date.into();
        self
    }

    pub fn assessor(mut self, assessor: impl Into<Option<Reference>>) -> Self {
        self.assessor = assessor.into();
        self
    }

    pub fn previous(mut self, previous: impl Into<Option<Reference>>) -> Self {
        self.previous = previous.into();
        self
    }

    pub fn problem(mut self, problem: impl IntoIterator<Item = Reference>) -> Self {
        self.problem.extend(problem);
        self
    }

    pub fn set_problem(mut self, problem: impl IntoIterator<Item = Reference>) -> Self {
        self.problem = problem.into_iter().collect();
        self
    }

    pub fn investigation(mut self, investigation: impl IntoIterator<Item = Investigation>) -> Self {
        self.investigation.extend(investigation);
        self
    }

    pub fn set_investigation(
        mut self,
        investigation: impl IntoIterator<Item = Investigation>,
    ) -> Self {
        self.investigation = investigation.into_iter().collect();
        self
    }

    pub fn protocol(mut self, protocol: impl IntoIterator<Item = Uri>) -> Self {
        self.protocol.extend(protocol);
        self
    }

    pub fn set_protocol(mut self, protocol: impl IntoIterator<Item = Uri>) -> Self {
        self.protocol = protocol.into_iter().collect();
        self
    }

    pub fn summary(mut self, summary: impl Into<Option<FhirString>>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn finding(mut self, finding: impl IntoIterator<Item = Finding>) -> Self {
        self.finding.extend(finding);
        self
    }

    pub fn set_finding(mut self, finding: impl IntoIterator<Item = Finding>) -> Self {
        self.finding = finding.into_iter().collect();
        self
    }

    pub fn prognosis_codeable_concept(
        mut self,
        prognosis_codeable_concept: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.prognosis_codeable_concept.extend(prognosis_codeable_concept);
        self
    }

    pub fn set_prognosis_codeable_concept(
        mut self,
        prognosis_codeable_concept: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.prognosis_codeable_concept = prognosis_codeable_concept.into_iter().collect();
        self
    }

    pub fn prognosis_reference(
        mut self,
        prognosis_reference: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.prognosis_reference.extend(prognosis_reference);
        self
    }

    pub fn set_prognosis_reference(
        mut self,
        prognosis_reference: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.prognosis_reference = prognosis_reference.into_iter().collect();
        self
    }

    pub fn supporting_info(mut self, supporting_info: impl IntoIterator<Item = Reference>) -> Self {
        self.supporting_info.extend(supporting_info);
        self
    }

    pub fn set_supporting_info(
        mut self,
        supporting_info: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.supporting_info = supporting_info.into_iter().collect();
        self
    }

    pub fn note(mut self, note: impl IntoIterator<Item = Annotation>) -> Self {
        self.note.extend(note);
        self
    }

    pub fn set_note(mut self, note: impl IntoIterator<Item = Annotation>) -> Self {
        self.note = note.into_iter().collect();
        self
    }

    pub fn build(&self) -> Result<ClinicalImpression> {
        finish("ClinicalImpression", || {
            let status = require_non_null(self.status.clone(), "status")?;
            let subject = require_non_null(self.subject.clone(), "subject")?;
            let effective: Option<DateTimeOrPeriod> =
                choice_element(self.effective.clone(), "effective")?;
            check_reference_type(Some(&subject), "subject", &["Patient", "Group"])?;
            check_reference_type(self.encounter.as_ref(), "encounter", &["Encounter"])?;
            check_reference_type(
                self.assessor.as_ref(),
                "assessor",
                &["Practitioner", "PractitionerRole"],
            )?;
            check_reference_type(self.previous.as_ref(), "previous", &["ClinicalImpression"])?;
            check_reference_types(&self.problem, "problem", &["Condition", "AllergyIntolerance"])?;
            check_reference_types(
                &self.prognosis_reference,
                "prognosisReference",
                &["RiskAssessment"],
            )?;
            let mut clinical_impression = ClinicalImpression {
                hash: 0,
                resource: self.resource.clone(),
                domain: self.domain.clone(),
                identifier: self.identifier.clone(),
                status,
                status_reason: self.status_reason.clone(),
                code: self.code.clone(),
                description: self.description.clone(),
                subject,
                encounter: self.encounter.clone(),
                effective,
                date: self.date.clone(),
                assessor: self.assessor.clone(),
                previous: self.previous.clone(),
                problem: self.problem.clone(),
                investigation: self.investigation.clone(),
                protocol: self.protocol.clone(),
                summary: self.summary.clone(),
                finding: self.finding.clone(),
                prognosis_codeable_concept: self.prognosis_codeable_concept.clone(),
                prognosis_reference: self.prognosis_reference.clone(),
                supporting_info: self.supporting_info.clone(),
                note: self.note.clone(),
            };
            clinical_impression.hash = structural_hash(&clinical_impression);
            Ok(clinical_impression)
        })
    }
}

impl From<&ClinicalImpression> for ClinicalImpressionBuilder {
    fn from(clinical_impression: &ClinicalImpression) -> Self {
        Self {
            resource: clinical_impression.resource.clone(),
            domain: clinical_impression.domain.clone(),
            identifier: clinical_impression.identifier.clone(),
            status: Some(clinical_impression.status.clone()),
            status_reason: clinical_impression.status_reason.clone(),
            code: clinical_impression.code.clone(),
            description: clinical_impression.description.clone(),
            subject: Some(clinical_impression.subject.clone()),
            encounter: clinical_impression.encounter.clone(),
            effective: clinical_impression.effective.clone().map(Element::from),
            date: clinical_impression.date.clone(),
            assessor: clinical_impression.assessor.clone(),
            previous: clinical_impression.previous.clone(),
            problem: clinical_impression.problem.clone(),
            investigation: clinical_impression.investigation.clone(),
            protocol: clinical_impression.protocol.clone(),
            summary: clinical_impression.summary.clone(),
            finding: clinical_impression.finding.clone(),
            prognosis_codeable_concept: clinical_impression.prognosis_codeable_concept.clone(),
            prognosis_reference: clinical_impression.prognosis_reference.clone(),
            supporting_info: clinical_impression.supporting_info.clone(),
            note: clinical_impression.note.clone(),
        }
    }
}

// ============================================================================
// Investigation
// ============================================================================

/// A group of investigations carried out as part of the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Investigation {
    base: BackboneFields,
    code: CodeableConcept,
    item: Vec<Reference>,
}

impl Investigation {
    pub fn builder(code: impl Into<Option<CodeableConcept>>) -> InvestigationBuilder {
        InvestigationBuilder {
            base: BackboneFields::default(),
            code: code.into(),
            item: Vec::new(),
        }
    }

    pub fn to_builder(&self) -> InvestigationBuilder {
        InvestigationBuilder::from(self)
    }

    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    pub fn item(&self) -> &[Reference] {
        &self.item
    }
}

backbone_element!(
    Investigation,
    InvestigationBuilder,
    "ClinicalImpression.Investigation",
    |i| Fields::new()
        .backbone(&i.base)
        .one("code", &i.code)
        .many("item", &i.item)
        .build()
);

#[derive(Debug, Clone)]
pub struct InvestigationBuilder {
    base: BackboneFields,
    code: Option<CodeableConcept>,
    item: Vec<Reference>,
}

impl InvestigationBuilder {
    pub fn item(mut self, item: impl IntoIterator<Item = Reference>) -> Self {
        self.item.extend(item);
        self
    }

    pub fn set_item(mut self, item: impl IntoIterator<Item = Reference>) -> Self {
        self.item = item.into_iter().collect();
        self
    }

    pub fn build(&self) -> Result<Investigation> {
        finish("ClinicalImpression.Investigation", || {
            self.base.validate()?;
            let code = require_non_null(self.code.clone(), "code")?;
            check_reference_types(
                &self.item,
                "item",
                &[
                    "Observation", "QuestionnaireResponse", "FamilyMemberHistory",
                    "DiagnosticReport", "RiskAssessment", "ImagingStudy", "Media",
                ],
            )?;
            let investigation = Investigation {
                base: self.base.clone(),
                code,
                item: self.item.clone(),
            };
            require_value_or_children(&investigation)?;
            Ok(investigation)
        })
    }
}

impl From<&Investigation> for InvestigationBuilder {
    fn from(investigation: &Investigation) -> Self {
        Self {
            base: investigation.base.clone(),
            code: Some(investigation.code.clone()),
            item: investigation.item.clone(),
        }
    }
}

// ============================================================================
// Finding
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Finding {
    base: BackboneFields,
    item_codeable_concept: Option<CodeableConcept>,
    item_reference: Option<Reference>,
    basis: Option<FhirString>,
}

impl Finding {
    pub fn builder() -> FindingBuilder {
        FindingBuilder {
            base: BackboneFields::default(),
            item_codeable_concept: None,
            item_reference: None,
            basis: None,
        }
    }

    pub fn to_builder(&self) -> FindingBuilder {
        FindingBuilder::from(self)
    }

    pub fn item_codeable_concept(&self) -> Option<&CodeableConcept> {
        self.item_codeable_concept.as_ref()
    }

    pub fn item_reference(&self) -> Option<&Reference> {
        self.item_reference.as_ref()
    }

    pub fn basis(&self) -> Option<&FhirString> {
        self.basis.as_ref()
    }
}

backbone_element!(
    Finding,
    FindingBuilder,
    "ClinicalImpression.Finding",
    |f| Fields::new()
        .backbone(&f.base)
        .opt("itemCodeableConcept", f.item_codeable_concept.as_ref())
        .opt("itemReference", f.item_reference.as_ref())
        .opt("basis", f.basis.as_ref())
        .build()
);

#[derive(Debug, Clone, Default)]
pub struct FindingBuilder {
    base: BackboneFields,
    item_codeable_concept: Option<CodeableConcept>,
    item_reference: Option<Reference>,
    basis: Option<FhirString>,
}

impl FindingBuilder {
    pub fn item_codeable_concept(
        mut self,
        item_codeable_concept: impl Into<Option<CodeableConcept>>,
    ) -> Self {
        self.item_codeable_concept = item_codeable_concept.into();
        self
    }

    pub fn item_reference(mut self, item_reference: impl Into<Option<Reference>>) -> Self {
        self.item_reference = item_reference.into();
        self
    }

    pub fn basis(mut self, basis: impl Into<Option<FhirString>>) -> Self {
        self.basis = basis.into();
        self
    }

    pub fn build(&self) -> Result<Finding> {
        finish("ClinicalImpression.Finding", || {
            self.base.validate()?;
            check_reference_type(
                self.item_reference.as_ref(),
                "itemReference",
                &["Condition", "Observation", "Media"],
            )?;
            let finding = Finding {
                base: self.base.clone(),
                item_codeable_concept: self.item_codeable_concept.clone(),
                item_reference: self.item_reference.clone(),
                basis: self.basis.clone(),
            };
            require_value_or_children(&finding)?;
            Ok(finding)
        })
    }
}

impl From<&Finding> for FindingBuilder {
    fn from(finding: &Finding) -> Self {
        Self {
            base: finding.base.clone(),
            item_codeable_concept: finding.item_codeable_concept.clone(),
            item_reference: finding.item_reference.clone(),
            basis: finding.basis.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::types::Period;
    use crate::Error;

    fn impression() -> ClinicalImpressionBuilder {
        ClinicalImpression::builder(
            Code::new("completed").unwrap(),
            Reference::to("Patient/example").unwrap(),
        )
    }

    #[test]
    fn test_effective_choice() {
        let at_instant = impression()
            .effective(DateTime::new("2014-12-06T22:33:00+11:00").unwrap())
            .build()
            .unwrap();
        assert_eq!(at_instant.effective().map(|e| e.type_name()), Some("dateTime"));

        let period = Period::builder()
            .start(DateTime::new("2014-12-06").unwrap())
            .build()
            .unwrap();
        let over_period = impression().effective(period).build().unwrap();
        assert!(matches!(over_period.effective(), Some(DateTimeOrPeriod::Period(_))));

        let err = impression()
            .effective(FhirString::new("yesterday").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidChoiceType {
                field: "effective",
                found: "string",
                allowed: &["dateTime", "Period"],
            }
        );
    }

    #[test]
    fn test_subject_may_be_a_group() {
        let group = ClinicalImpression::builder(
            Code::new("completed").unwrap(),
            Reference::to("Group/g1").unwrap(),
        );
        assert!(group.build().is_ok());
        assert_eq!(
            ClinicalImpression::builder(Code::new("completed").unwrap(), None)
                .build()
                .unwrap_err(),
            Error::MissingRequiredField { field: "subject" }
        );
    }

    #[test]
    fn test_investigation_and_finding() {
        let examination = CodeableConcept::from_text("Initial Examination").unwrap();
        let investigation = Investigation::builder(examination)
            .item([Reference::to("Observation/o1").unwrap()])
            .build()
            .unwrap();
        let finding = Finding::builder()
            .item_reference(Reference::to("Condition/stroke").unwrap())
            .build()
            .unwrap();
        let impression = impression()
            .investigation([investigation.clone()])
            .finding([finding])
            .problem([Reference::to("Condition/c1").unwrap()])
            .build()
            .unwrap();
        assert_eq!(impression.investigation(), &[investigation]);
        assert_eq!(impression.finding().len(), 1);

        let err = Finding::builder()
            .item_reference(Reference::to("Procedure/p").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("itemReference"));
        assert_eq!(
            Finding::builder().build().unwrap_err(),
            Error::EmptyElement { element: "ClinicalImpression.Finding" }
        );
    }

    #[test]
    fn test_previous_must_be_a_clinical_impression() {
        let err = impression()
            .previous(Reference::to("Observation/o1").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReference { field: "previous", .. }));
    }
}
