//! `Immunization` and its backbone elements.

use crate::builder::finish;
use crate::error::Result;
use crate::resource::{backbone_element, domain_resource, DomainResourceFields, ResourceFields};
use crate::types::element::BackboneFields;
use crate::types::{
    Annotation, Boolean, Code, CodeableConcept, Date, DateTime, DateTimeOrString, Element,
    FhirString, Identifier, PositiveIntOrString, Quantity, Reference, Uri,
};
use crate::validation::{
    check_reference_type, check_reference_types, choice_element, require_choice_element,
    require_non_null, require_value_or_children,
};
use crate::visitor::{structural_hash, Fields};

/// Administration of a vaccine to a patient, or a record of one.
///
/// Built through [`ImmunizationBuilder`]; the four required elements are
/// constructor arguments of [`Immunization::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Immunization {
    hash: u64,
    resource: ResourceFields,
    domain: DomainResourceFields,
    identifier: Vec<Identifier>,
    status: Code,
    status_reason: Option<CodeableConcept>,
    vaccine_code: CodeableConcept,
    patient: Reference,
    encounter: Option<Reference>,
    occurrence: DateTimeOrString,
    recorded: Option<DateTime>,
    primary_source: Option<Boolean>,
    report_origin: Option<CodeableConcept>,
    location: Option<Reference>,
    manufacturer: Option<Reference>,
    lot_number: Option<FhirString>,
    expiration_date: Option<Date>,
    site: Option<CodeableConcept>,
    route: Option<CodeableConcept>,
    dose_quantity: Option<Quantity>,
    performer: Vec<Performer>,
    note: Vec<Annotation>,
    reason_code: Vec<CodeableConcept>,
    reason_reference: Vec<Reference>,
    is_subpotent: Option<Boolean>,
    subpotent_reason: Vec<CodeableConcept>,
    education: Vec<Education>,
    program_eligibility: Vec<CodeableConcept>,
    funding_source: Option<CodeableConcept>,
    reaction: Vec<Reaction>,
    protocol_applied: Vec<ProtocolApplied>,
}

impl Immunization {
    pub fn builder(
        status: impl Into<Option<Code>>,
        vaccine_code: impl Into<Option<CodeableConcept>>,
        patient: impl Into<Option<Reference>>,
        occurrence: impl Into<Option<Element>>,
    ) -> ImmunizationBuilder {
        ImmunizationBuilder {
            resource: ResourceFields::default(),
            domain: DomainResourceFields::default(),
            identifier: Vec::new(),
            status: status.into(),
            status_reason: None,
            vaccine_code: vaccine_code.into(),
            patient: patient.into(),
            encounter: None,
            occurrence: occurrence.into(),
            recorded: None,
            primary_source: None,
            report_origin: None,
            location: None,
            manufacturer: None,
            lot_number: None,
            expiration_date: None,
            site: None,
            route: None,
            dose_quantity: None,
            performer: Vec::new(),
            note: Vec::new(),
            reason_code: Vec::new(),
            reason_reference: Vec::new(),
            is_subpotent: None,
            subpotent_reason: Vec::new(),
            education: Vec::new(),
            program_eligibility: Vec::new(),
            funding_source: None,
            reaction: Vec::new(),
            protocol_applied: Vec::new(),
        }
    }

    pub fn to_builder(&self) -> ImmunizationBuilder {
        ImmunizationBuilder::from(self)
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    /// `completed`, `entered-in-error` or `not-done`.
    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn status_reason(&self) -> Option<&CodeableConcept> {
        self.status_reason.as_ref()
    }

    pub fn vaccine_code(&self) -> &CodeableConcept {
        &self.vaccine_code
    }

    pub fn patient(&self) -> &Reference {
        &self.patient
    }

    pub fn encounter(&self) -> Option<&Reference> {
        self.encounter.as_ref()
    }

    /// `occurrence[x]`: `dateTime` or `string`.
    pub fn occurrence(&self) -> &DateTimeOrString {
        &self.occurrence
    }

    pub fn recorded(&self) -> Option<&DateTime> {
        self.recorded.as_ref()
    }

    pub fn primary_source(&self) -> Option<&Boolean> {
        self.primary_source.as_ref()
    }

    pub fn report_origin(&self) -> Option<&CodeableConcept> {
        self.report_origin.as_ref()
    }

    pub fn location(&self) -> Option<&Reference> {
        self.location.as_ref()
    }

    pub fn manufacturer(&self) -> Option<&Reference> {
        self.manufacturer.as_ref()
    }

    pub fn lot_number(&self) -> Option<&FhirString> {
        self.lot_number.as_ref()
    }

    pub fn expiration_date(&self) -> Option<&Date> {
        self.expiration_date.as_ref()
    }

    pub fn site(&self) -> Option<&CodeableConcept> {
        self.site.as_ref()
    }

    pub fn route(&self) -> Option<&CodeableConcept> {
        self.route.as_ref()
    }

    pub fn dose_quantity(&self) -> Option<&Quantity> {
        self.dose_quantity.as_ref()
    }

    pub fn performer(&self) -> &[Performer] {
        &self.performer
    }

    pub fn note(&self) -> &[Annotation] {
        &self.note
    }

    pub fn reason_code(&self) -> &[CodeableConcept] {
        &self.reason_code
    }

    pub fn reason_reference(&self) -> &[Reference] {
        &self.reason_reference
    }

    pub fn is_subpotent(&self) -> Option<&Boolean> {
        self.is_subpotent.as_ref()
    }

    pub fn subpotent_reason(&self) -> &[CodeableConcept] {
        &self.subpotent_reason
    }

    pub fn education(&self) -> &[Education] {
        &self.education
    }

    pub fn program_eligibility(&self) -> &[CodeableConcept] {
        &self.program_eligibility
    }

    pub fn funding_source(&self) -> Option<&CodeableConcept> {
        self.funding_source.as_ref()
    }

    pub fn reaction(&self) -> &[Reaction] {
        &self.reaction
    }

    pub fn protocol_applied(&self) -> &[ProtocolApplied] {
        &self.protocol_applied
    }
}

domain_resource!(
    Immunization,
    ImmunizationBuilder,
    |i| Fields::new()
        .domain_resource(&i.resource, &i.domain)
        .many("identifier", &i.identifier)
        .one("status", &i.status)
        .opt("statusReason", i.status_reason.as_ref())
        .one("vaccineCode", &i.vaccine_code)
        .one("patient", &i.patient)
        .opt("encounter", i.encounter.as_ref())
        .choice("occurrence", Some(&i.occurrence))
        .opt("recorded", i.recorded.as_ref())
        .opt("primarySource", i.primary_source.as_ref())
        .opt("reportOrigin", i.report_origin.as_ref())
        .opt("location", i.location.as_ref())
        .opt("manufacturer", i.manufacturer.as_ref())
        .opt("lotNumber", i.lot_number.as_ref())
        .opt("expirationDate", i.expiration_date.as_ref())
        .opt("site", i.site.as_ref())
        .opt("route", i.route.as_ref())
        .opt("doseQuantity", i.dose_quantity.as_ref())
        .many("performer", &i.performer)
        .many("note", &i.note)
        .many("reasonCode", &i.reason_code)
        .many("reasonReference", &i.reason_reference)
        .opt("isSubpotent", i.is_subpotent.as_ref())
        .many("subpotentReason", &i.subpotent_reason)
        .many("education", &i.education)
        .many("programEligibility", &i.program_eligibility)
        .opt("fundingSource", i.funding_source.as_ref())
        .many("reaction", &i.reaction)
        .many("protocolApplied", &i.protocol_applied)
        .build()
);

#[derive(Debug, Clone)]
pub struct ImmunizationBuilder {
    resource: ResourceFields,
    domain: DomainResourceFields,
    identifier: Vec<Identifier>,
    status: Option<Code>,
    status_reason: Option<CodeableConcept>,
    vaccine_code: Option<CodeableConcept>,
    patient: Option<Reference>,
    encounter: Option<Reference>,
    occurrence: Option<Element>,
    recorded: Option<DateTime>,
    primary_source: Option<Boolean>,
    report_origin: Option<CodeableConcept>,
    location: Option<Reference>,
    manufacturer: Option<Reference>,
    lot_number: Option<FhirString>,
    expiration_date: Option<Date>,
    site: Option<CodeableConcept>,
    route: Option<CodeableConcept>,
    dose_quantity: Option<Quantity>,
    performer: Vec<Performer>,
    note: Vec<Annotation>,
    reason_code: Vec<CodeableConcept>,
    reason_reference: Vec<Reference>,
    is_subpotent: Option<Boolean>,
    subpotent_reason: Vec<CodeableConcept>,
    education: Vec<Education>,
    program_eligibility: Vec<CodeableConcept>,
    funding_source: Option<CodeableConcept>,
    reaction: Vec<Reaction>,
    protocol_applied: Vec<ProtocolApplied>,
}

impl ImmunizationBuilder {
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

    pub fn encounter(mut self, encounter: impl Into<Option<Reference>>) -> Self {
        self.encounter = encounter.into();
        self
    }

    pub fn recorded(mut self, recorded: impl Into<Option<DateTime>>) -> Self {
        self.recorded = recorded.into();
        self
    }

    pub fn primary_source(mut self, primary_source: impl Into<Option<Boolean>>) -> Self {
        self.primary_source = primary_source.into();
        self
    }

    pub fn report_origin(mut self, report_origin: impl Into<Option<CodeableConcept>>) -> Self {
        self.report_origin = report_origin.into();
        self
    }

    pub fn location(mut self, location: impl Into<Option<Reference>>) -> Self {
        self.location = location.into();
        self
    }

    pub fn manufacturer(mut self, manufacturer: impl Into<Option<Reference>>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn lot_number(mut self, lot_number: impl Into<Option<FhirString>>) -> Self {
        self.lot_number = lot_number.into();
        self
    }

    pub fn expiration_date(mut self, expiration_date: impl Into<Option<Date>>) -> Self {
        self.expiration_date = expiration_date.into();
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

    pub fn dose_quantity(mut self, dose_quantity: impl Into<Option<Quantity>>) -> Self {
        self.dose_quantity = dose_quantity.into();
        self
    }

    pub fn performer(mut self, performer: impl IntoIterator<Item = Performer>) -> Self {
        self.performer.extend(performer);
        self
    }

    pub fn set_performer(mut self, performer: impl IntoIterator<Item = Performer>) -> Self {
        self.performer = performer.into_iter().collect();
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

    pub fn reason_code(mut self, reason_code: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.reason_code.extend(reason_code);
        self
    }

    pub fn set_reason_code(
        mut self,
        reason_code: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.reason_code = reason_code.into_iter().collect();
        self
    }

    pub fn reason_reference(
        mut self,
        reason_reference: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.reason_reference.extend(reason_reference);
        self
    }

    pub fn set_reason_reference(
        mut self,
        reason_reference: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.reason_reference = reason_reference.into_iter().collect();
        self
    }

    pub fn is_subpotent(mut self, is_subpotent: impl Into<Option<Boolean>>) -> Self {
        self.is_subpotent = is_subpotent.into();
        self
    }

    pub fn subpotent_reason(
        mut self,
        subpotent_reason: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.subpotent_reason.extend(subpotent_reason);
        self
    }

    pub fn set_subpotent_reason(
        mut self,
        subpotent_reason: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.subpotent_reason = subpotent_reason.into_iter().collect();
        self
    }

    pub fn education(mut self, education: impl IntoIterator<Item = Education>) -> Self {
        self.education.extend(education);
        self
    }

    pub fn set_education(mut self, education: impl IntoIterator<Item = Education>) -> Self {
        self.education = education.into_iter().collect();
        self
    }

    pub fn program_eligibility(
        mut self,
        program_eligibility: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.program_eligibility.extend(program_eligibility);
        self
    }

    pub fn set_program_eligibility(
        mut self,
        program_eligibility: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.program_eligibility = program_eligibility.into_iter().collect();
        self
    }

    pub fn funding_source(mut self, funding_source: impl Into<Option<CodeableConcept>>) -> Self {
        self.funding_source = funding_source.into();
        self
    }

    pub fn reaction(mut self, reaction: impl IntoIterator<Item = Reaction>) -> Self {
        self.reaction.extend(reaction);
        self
    }

    pub fn set_reaction(mut self, reaction: impl IntoIterator<Item = Reaction>) -> Self {
        self.reaction = reaction.into_iter().collect();
        self
    }

    pub fn protocol_applied(
        mut self,
        protocol_applied: impl IntoIterator<Item = ProtocolApplied>,
    ) -> Self {
        self.protocol_applied.extend(protocol_applied);
        self
    }

    pub fn set_protocol_applied(
        mut self,
        protocol_applied: impl IntoIterator<Item = ProtocolApplied>,
    ) -> Self {
        self.protocol_applied = protocol_applied.into_iter().collect();
        self
    }

    pub fn build(&self) -> Result<Immunization> {
        finish("Immunization", || {
            let status = require_non_null(self.status.clone(), "status")?;
            let vaccine_code = require_non_null(self.vaccine_code.clone(), "vaccineCode")?;
            let patient = require_non_null(self.patient.clone(), "patient")?;
            let occurrence: DateTimeOrString =
                require_choice_element(self.occurrence.clone(), "occurrence")?;
            check_reference_type(Some(&patient), "patient", &["Patient"])?;
            check_reference_type(self.encounter.as_ref(), "encounter", &["Encounter"])?;
            check_reference_type(self.location.as_ref(), "location", &["Location"])?;
            check_reference_type(self.manufacturer.as_ref(), "manufacturer", &["Organization"])?;
            check_reference_types(
                &self.reason_reference,
                "reasonReference",
                &["Condition", "Observation", "DiagnosticReport"],
            )?;
            let mut immunization = Immunization {
                hash: 0,
                resource: self.resource.clone(),
                domain: self.domain.clone(),
                identifier: self.identifier.clone(),
                status,
                status_reason: self.status_reason.clone(),
                vaccine_code,
                patient,
                encounter: self.encounter.clone(),
                occurrence,
                recorded: self.recorded.clone(),
                primary_source: self.primary_source.clone(),
                report_origin: self.report_origin.clone(),
                location: self.location.clone(),
                manufacturer: self.manufacturer.clone(),
                lot_number: self.lot_number.clone(),
                expiration_date: self.expiration_date.clone(),
                site: self.site.clone(),
                route: self.route.clone(),
                dose_quantity: self.dose_quantity.clone(),
                performer: self.performer.clone(),
                note: self.note.clone(),
                reason_code: self.reason_code.clone(),
                reason_reference: self.reason_reference.clone(),
                is_subpotent: self.is_subpotent.clone(),
                subpotent_reason: self.subpotent_reason.clone(),
                education: self.education.clone(),
                program_eligibility: self.program_eligibility.clone(),
                funding_source: self.funding_source.clone(),
                reaction: self.reaction.clone(),
                protocol_applied: self.protocol_applied.clone(),
            };
            immunization.hash = structural_hash(&immunization);
            Ok(immunization)
        })
    }
}

impl From<&Immunization> for ImmunizationBuilder {
    fn from(immunization: &Immunization) -> Self {
        Self {
            resource: immunization.resource.clone(),
            domain: immunization.domain.clone(),
            identifier: immunization.identifier.clone(),
            status: Some(immunization.status.clone()),
            status_reason: immunization.status_reason.clone(),
            vaccine_code: Some(immunization.vaccine_code.clone()),
            patient: Some(immunization.patient.clone()),
            encounter: immunization.encounter.clone(),
            occurrence: Some(immunization.occurrence.clone().into()),
            recorded: immunization.recorded.clone(),
            primary_source: immunization.primary_source.clone(),
            report_origin: immunization.report_origin.clone(),
            location: immunization.location.clone(),
            manufacturer: immunization.manufacturer.clone(),
            lot_number: immunization.lot_number.clone(),
            expiration_date: immunization.expiration_date.clone(),
            site: immunization.site.clone(),
            route: immunization.route.clone(),
            dose_quantity: immunization.dose_quantity.clone(),
            performer: immunization.performer.clone(),
            note: immunization.note.clone(),
            reason_code: immunization.reason_code.clone(),
            reason_reference: immunization.reason_reference.clone(),
            is_subpotent: immunization.is_subpotent.clone(),
            subpotent_reason: immunization.subpotent_reason.clone(),
            education: immunization.education.clone(),
            program_eligibility: immunization.program_eligibility.clone(),
            funding_source: immunization.funding_source.clone(),
            reaction: immunization.reaction.clone(),
            protocol_applied: immunization.protocol_applied.clone(),
        }
    }
}

// ============================================================================
// Performer
// ============================================================================

/// Who performed the administration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Performer {
    base: BackboneFields,
    function: Option<CodeableConcept>,
    actor: Reference,
}

impl Performer {
    pub fn builder(actor: impl Into<Option<Reference>>) -> PerformerBuilder {
        PerformerBuilder {
            base: BackboneFields::default(),
            function: None,
            actor: actor.into(),
        }
    }

    pub fn to_builder(&self) -> PerformerBuilder {
        PerformerBuilder::from(self)
    }

    pub fn function(&self) -> Option<&CodeableConcept> {
        self.function.as_ref()
    }

    pub fn actor(&self) -> &Reference {
        &self.actor
    }
}

backbone_element!(
    Performer,
    PerformerBuilder,
    "Immunization.Performer",
    |p| Fields::new()
        .backbone(&p.base)
        .opt("function", p.function.as_ref())
        .one("actor", &p.actor)
        .build()
);

#[derive(Debug, Clone)]
pub struct PerformerBuilder {
    base: BackboneFields,
    function: Option<CodeableConcept>,
    actor: Option<Reference>,
}

impl PerformerBuilder {
    pub fn function(mut self, function: impl Into<Option<CodeableConcept>>) -> Self {
        self.function = function.into();
        self
    }

    pub fn build(&self) -> Result<Performer> {
        finish("Immunization.Performer", || {
            self.base.validate()?;
            let actor = require_non_null(self.actor.clone(), "actor")?;
            check_reference_type(
                Some(&actor),
                "actor",
                &["Practitioner", "PractitionerRole", "Organization"],
            )?;
            let performer = Performer {
                base: self.base.clone(),
                function: self.function.clone(),
                actor,
            };
            require_value_or_children(&performer)?;
            Ok(performer)
        })
    }
}

impl From<&Performer> for PerformerBuilder {
    fn from(performer: &Performer) -> Self {
        Self {
            base: performer.base.clone(),
            function: performer.function.clone(),
            actor: Some(performer.actor.clone()),
        }
    }
}

// ============================================================================
// Education
// ============================================================================

/// Educational material presented to the patient.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Education {
    base: BackboneFields,
    document_type: Option<FhirString>,
    reference: Option<Uri>,
    publication_date: Option<DateTime>,
    presentation_date: Option<DateTime>,
}

impl Education {
    pub fn builder() -> EducationBuilder {
        EducationBuilder {
            base: BackboneFields::default(),
            document_type: None,
            reference: None,
            publication_date: None,
            presentation_date: None,
        }
    }

    pub fn to_builder(&self) -> EducationBuilder {
        EducationBuilder::from(self)
    }

    pub fn document_type(&self) -> Option<&FhirString> {
        self.document_type.as_ref()
    }

    pub fn reference(&self) -> Option<&Uri> {
        self.reference.as_ref()
    }

    pub fn publication_date(&self) -> Option<&DateTime> {
        self.publication_date.as_ref()
    }

    pub fn presentation_date(&self) -> Option<&DateTime> {
        self.presentation_date.as_ref()
    }
}

backbone_element!(
    Education,
    EducationBuilder,
    "Immunization.Education",
    |e| Fields::new()
        .backbone(&e.base)
        .opt("documentType", e.document_type.as_ref())
        .opt("reference", e.reference.as_ref())
        .opt("publicationDate", e.publication_date.as_ref())
        .opt("presentationDate", e.presentation_date.as_ref())
        .build()
);

#[derive(Debug, Clone, Default)]
pub struct EducationBuilder {
    base: BackboneFields,
    document_type: Option<FhirString>,
    reference: Option<Uri>,
    publication_date: Option<DateTime>,
    presentation_date: Option<DateTime>,
}

impl EducationBuilder {
    pub fn document_type(mut self, document_type: impl Into<Option<FhirString>>) -> Self {
        self.document_type = document_type.into();
        self
    }

    pub fn reference(mut self, reference: impl Into<Option<Uri>>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn publication_date(mut self, publication_date: impl Into<Option<DateTime>>) -> Self {
        self.publication_date = publication_date.into();
        self
    }

    pub fn presentation_date(mut self, presentation_date: impl Into<Option<DateTime>>) -> Self {
        self.presentation_date = presentation_date.into();
        self
    }

    pub fn build(&self) -> Result<Education> {
        finish("Immunization.Education", || {
            self.base.validate()?;
            let education = Education {
                base: self.base.clone(),
                document_type: self.document_type.clone(),
                reference: self.reference.clone(),
                publication_date: self.publication_date.clone(),
                presentation_date: self.presentation_date.clone(),
            };
            require_value_or_children(&education)?;
            Ok(education)
        })
    }
}

impl From<&Education> for EducationBuilder {
    fn from(education: &Education) -> Self {
        Self {
            base: education.base.clone(),
            document_type: education.document_type.clone(),
            reference: education.reference.clone(),
            publication_date: education.publication_date.clone(),
            presentation_date: education.presentation_date.clone(),
        }
    }
}

// ============================================================================
// Reaction
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reaction {
    base: BackboneFields,
    date: Option<DateTime>,
    detail: Option<Reference>,
    reported: Option<Boolean>,
}

impl Reaction {
    pub fn builder() -> ReactionBuilder {
        ReactionBuilder {
            base: BackboneFields::default(),
            date: None,
            detail: None,
            reported: None,
        }
    }

    pub fn to_builder(&self) -> ReactionBuilder {
        ReactionBuilder::from(self)
    }

    pub fn date(&self) -> Option<&DateTime> {
        self.date.as_ref()
    }

    pub fn detail(&self) -> Option<&Reference> {
        self.detail.as_ref()
    }

    pub fn reported(&self) -> Option<&Boolean> {
        self.reported.as_ref()
    }
}

backbone_element!(
    Reaction,
    ReactionBuilder,
    "Immunization.Reaction",
    |r| Fields::new()
        .backbone(&r.base)
        .opt("date", r.date.as_ref())
        .opt("detail", r.detail.as_ref())
        .opt("reported", r.reported.as_ref())
        .build()
);

#[derive(Debug, Clone, Default)]
pub struct ReactionBuilder {
    base: BackboneFields,
    date: Option<DateTime>,
    detail: Option<Reference>,
    reported: Option<Boolean>,
}

impl ReactionBuilder {
    pub fn date(mut self, date: impl Into<Option<DateTime>>) -> Self {
        self.date = date.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<Option<Reference>>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn reported(mut self, reported: impl Into<Option<Boolean>>) -> Self {
        self.reported = reported.into();
        self
    }

    pub fn build(&self) -> Result<Reaction> {
        finish("Immunization.Reaction", || {
            self.base.validate()?;
            check_reference_type(self.detail.as_ref(), "detail", &["Observation"])?;
            let reaction = Reaction {
                base: self.base.clone(),
                date: self.date.clone(),
                detail: self.detail.clone(),
                reported: self.reported.clone(),
            };
            require_value_or_children(&reaction)?;
            Ok(reaction)
        })
    }
}

impl From<&Reaction> for ReactionBuilder {
    fn from(reaction: &Reaction) -> Self {
        Self {
            base: reaction.base.clone(),
            date: reaction.date.clone(),
            detail: reaction.detail.clone(),
            reported: reaction.reported.clone(),
        }
    }
}

// ============================================================================
// ProtocolApplied
// ============================================================================

/// Dose number within a vaccination series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtocolApplied {
    base: BackboneFields,
    series: Option<FhirString>,
    authority: Option<Reference>,
    target_disease: Vec<CodeableConcept>,
    dose_number: PositiveIntOrString,
    series_doses: Option<PositiveIntOrString>,
}

impl ProtocolApplied {
    pub fn builder(dose_number: impl Into<Option<Element>>) -> ProtocolAppliedBuilder {
        ProtocolAppliedBuilder {
            base: BackboneFields::default(),
            series: None,
            authority: None,
            target_disease: Vec::new(),
            dose_number: dose_number.into(),
            series_doses: None,
        }
    }

    pub fn to_builder(&self) -> ProtocolAppliedBuilder {
        ProtocolAppliedBuilder::from(self)
    }

    pub fn series(&self) -> Option<&FhirString> {
        self.series.as_ref()
    }

    pub fn authority(&self) -> Option<&Reference> {
        self.authority.as_ref()
    }

    pub fn target_disease(&self) -> &[CodeableConcept] {
        &self.target_disease
    }

    /// `doseNumber[x]`: `positiveInt` or `string`.
    pub fn dose_number(&self) -> &PositiveIntOrString {
        &self.dose_number
    }

    /// `seriesDoses[x]`: `positiveInt` or `string`.
    pub fn series_doses(&self) -> Option<&PositiveIntOrString> {
        self.series_doses.as_ref()
    }
}

backbone_element!(
    ProtocolApplied,
    ProtocolAppliedBuilder,
    "Immunization.ProtocolApplied",
    |p| Fields::new()
        .backbone(&p.base)
        .opt("series", p.series.as_ref())
        .opt("authority", p.authority.as_ref())
        .many("targetDisease", &p.target_disease)
        .choice("doseNumber", Some(&p.dose_number))
        .choice("seriesDoses", p.series_doses.as_ref())
        .build()
);

#[derive(Debug, Clone)]
pub struct ProtocolAppliedBuilder {
    base: BackboneFields,
    series: Option<FhirString>,
    authority: Option<Reference>,
    target_disease: Vec<CodeableConcept>,
    dose_number: Option<Element>,
    series_doses: Option<Element>,
}

impl ProtocolAppliedBuilder {
    pub fn series(mut self, series: impl Into<Option<FhirString>>) -> Self {
        self.series = series.into();
        self
    }

    pub fn authority(mut self, authority: impl Into<Option<Reference>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn target_disease(
        mut self,
        target_disease: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.target_disease.extend(target_disease);
        self
    }

    pub fn set_target_disease(
        mut self,
        target_disease: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.target_disease = target_disease.into_iter().collect();
        self
    }

    /// `seriesDoses[x]`: `positiveInt` or `string`.
    pub fn series_doses(mut self, series_doses: impl Into<Option<Element>>) -> Self {
        self.series_doses = series_doses.into();
        self
    }

    pub fn build(&self) -> Result<ProtocolApplied> {
        finish("Immunization.ProtocolApplied", || {
            self.base.validate()?;
            let dose_number: PositiveIntOrString =
                require_choice_element(self.dose_number.clone(), "doseNumber")?;
            let series_doses: Option<PositiveIntOrString> =
                choice_element(self.series_doses.clone(), "seriesDoses")?;
            check_reference_type(self.authority.as_ref(), "authority", &["Organization"])?;
            let protocol_applied = ProtocolApplied {
                base: self.base.clone(),
                series: self.series.clone(),
                authority: self.authority.clone(),
                target_disease: self.target_disease.clone(),
                dose_number,
                series_doses,
            };
            require_value_or_children(&protocol_applied)?;
            Ok(protocol_applied)
        })
    }
}

impl From<&ProtocolApplied> for ProtocolAppliedBuilder {
    fn from(protocol_applied: &ProtocolApplied) -> Self {
        Self {
            base: protocol_applied.base.clone(),
            series: protocol_applied.series.clone(),
            authority: protocol_applied.authority.clone(),
            target_disease: protocol_applied.target_disease.clone(),
            dose_number: Some(protocol_applied.dose_number.clone().into()),
            series_doses: protocol_applied.series_doses.clone().map(Element::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{with_config, ModelConfig, Preset};
    use crate::prelude::*;
    use crate::types::{Id, PositiveInt};
    use crate::Error;

    fn flu_shot() -> ImmunizationBuilder {
        Immunization::builder(
            Code::new("completed").unwrap(),
            CodeableConcept::from_text("Flu").unwrap(),
            Reference::to("Patient/1").unwrap(),
            DateTime::new("2020-01-01").unwrap(),
        )
    }

    #[test]
    fn test_minimal_immunization() {
        let immunization = flu_shot().build().unwrap();
        assert_eq!(immunization.status().as_str(), Some("completed"));
        assert_eq!(immunization.occurrence().type_name(), "dateTime");
        assert!(immunization.identifier().is_empty());
        assert!(immunization.performer().is_empty());
        assert!(immunization.protocol_applied().is_empty());
        assert!(immunization.contained().is_empty());
        assert!(immunization.id().is_none());
    }

    #[test]
    fn test_missing_required_field() {
        let err = Immunization::builder(
            Code::new("completed").unwrap(),
            None,
            Reference::to("Patient/1").unwrap(),
            DateTime::new("2020-01-01").unwrap(),
        )
        .build()
        .unwrap_err();
        assert_eq!(err, Error::MissingRequiredField { field: "vaccineCode" });

        let err = Immunization::builder(
            Code::new("completed").unwrap(),
            CodeableConcept::from_text("Flu").unwrap(),
            Reference::to("Patient/1").unwrap(),
            None,
        )
        .build()
        .unwrap_err();
        assert_eq!(err, Error::MissingRequiredField { field: "occurrence" });
    }

    #[test]
    fn test_occurrence_rejects_undeclared_type() {
        let err = Immunization::builder(
            Code::new("completed").unwrap(),
            CodeableConcept::from_text("Flu").unwrap(),
            Reference::to("Patient/1").unwrap(),
            Boolean::from(true),
        )
        .build()
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidChoiceType { field: "occurrence", found: "boolean", .. }
        ));
    }

    #[test]
    fn test_patient_reference_target() {
        let err = Immunization::builder(
            Code::new("completed").unwrap(),
            CodeableConcept::from_text("Flu").unwrap(),
            Reference::to("Practitioner/1").unwrap(),
            DateTime::new("2020-01-01").unwrap(),
        )
        .build()
        .unwrap_err();
        assert_eq!(err.field(), Some("patient"));

        let lenient = ModelConfig::preset(Preset::Lenient);
        let built = with_config(lenient, || {
            Immunization::builder(
                Code::new("completed").unwrap(),
                CodeableConcept::from_text("Flu").unwrap(),
                Reference::to("Practitioner/1").unwrap(),
                DateTime::new("2020-01-01").unwrap(),
            )
            .build()
        });
        assert!(built.is_ok());
    }

    #[test]
    fn test_protocol_applied_dose_number() {
        let applied = ProtocolApplied::builder(PositiveInt::new(1).unwrap())
            .series_doses(FhirString::new("two").unwrap())
            .build()
            .unwrap();
        assert_eq!(applied.dose_number().type_name(), "positiveInt");
        assert_eq!(applied.series_doses().map(|d| d.type_name()), Some("string"));

        let volume = Quantity::builder()
            .unit(FhirString::new("mL").unwrap())
            .build()
            .unwrap();
        let err = ProtocolApplied::builder(volume).build().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidChoiceType {
                field: "doseNumber",
                found: "Quantity",
                allowed: &["positiveInt", "string"],
            }
        );
    }

    #[test]
    fn test_empty_backbone_is_rejected() {
        let err = Education::builder().build().unwrap_err();
        assert_eq!(err, Error::EmptyElement { element: "Immunization.Education" });

        let education = Education::builder().id("e1").build().unwrap();
        assert_eq!(education.id(), Some("e1"));
    }

    #[test]
    fn test_performer_actor_targets() {
        assert!(Performer::builder(Reference::to("Practitioner/p").unwrap()).build().is_ok());
        assert!(Performer::builder(Reference::to("Device/d").unwrap()).build().is_err());
        assert_eq!(
            Performer::builder(None).build().unwrap_err(),
            Error::MissingRequiredField { field: "actor" }
        );
    }

    #[test]
    fn test_to_builder_round_trip() {
        let immunization = flu_shot()
            .id(Id::new("imm-1").unwrap())
            .lot_number(FhirString::new("AAJN11K").unwrap())
            .protocol_applied([ProtocolApplied::builder(PositiveInt::new(1).unwrap())
                .build()
                .unwrap()])
            .reaction([Reaction::builder()
                .reported(Boolean::from(false))
                .build()
                .unwrap()])
            .build()
            .unwrap();
        let rebuilt = immunization.to_builder().build().unwrap();
        assert_eq!(rebuilt, immunization);
        assert_eq!(rebuilt.structural_hash(), immunization.structural_hash());

        let changed = immunization.to_builder().lot_number(None).build().unwrap();
        assert_ne!(changed, immunization);
    }
}
