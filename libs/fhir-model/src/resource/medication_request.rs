//! `MedicationRequest` and its backbone elements.

use crate::builder::finish;
use crate::error::Result;
use crate::resource::{backbone_element, domain_resource, DomainResourceFields, ResourceFields};
use crate::types::element::BackboneFields;
use crate::types::{
    Annotation, Boolean, BooleanOrCodeableConcept, BooleanOrReference, Canonical, Code,
    CodeableConcept, CodeableConceptOrReference, DateTime, Dosage, Element, Identifier, Period,
    Quantity, Reference, UnsignedInt, Uri,
};
use crate::validation::{
    check_choice_reference_type, check_reference_type, check_reference_types, choice_element,
    require_choice_element, require_non_null, require_value_or_children,
};
use crate::visitor::{structural_hash, Fields};

/// An order or request for the supply and administration of a medication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationRequest {
    hash: u64,
    resource: ResourceFields,
    domain: DomainResourceFields,
    identifier: Vec<Identifier>,
    status: Code,
    status_reason: Option<CodeableConcept>,
    intent: Code,
    category: Vec<CodeableConcept>,
    priority: Option<Code>,
    do_not_perform: Option<Boolean>,
    reported: Option<BooleanOrReference>,
    medication: CodeableConceptOrReference,
    subject: Reference,
    encounter: Option<Reference>,
    supporting_information: Vec<Reference>,
    authored_on: Option<DateTime>,
    requester: Option<Reference>,
    performer: Option<Reference>,
    performer_type: Option<CodeableConcept>,
    recorder: Option<Reference>,
    reason_code: Vec<CodeableConcept>,
    reason_reference: Vec<Reference>,
    instantiates_canonical: Vec<Canonical>,
    instantiates_uri: Vec<Uri>,
    based_on: Vec<Reference>,
    group_identifier: Option<Identifier>,
    course_of_therapy_type: Option<CodeableConcept>,
    insurance: Vec<Reference>,
    note: Vec<Annotation>,
    dosage_instruction: Vec<Dosage>,
    dispense_request: Option<DispenseRequest>,
    substitution: Option<Substitution>,
    prior_prescription: Option<Reference>,
    detected_issue: Vec<Reference>,
    event_history: Vec<Reference>,
}

impl MedicationRequest {
    pub fn builder(
        status: impl Into<Option<Code>>,
        intent: impl Into<Option<Code>>,
        medication: impl Into<Option<Element>>,
        subject: impl Into<Option<Reference>>,
    ) -> MedicationRequestBuilder {
        MedicationRequestBuilder {
            resource: ResourceFields::default(),
            domain: DomainResourceFields::default(),
            identifier: Vec::new(),
            status: status.into(),
            status_reason: None,
            intent: intent.into(),
            category: Vec::new(),
            priority: None,
            do_not_perform: None,
            reported: None,
            medication: medication.into(),
            subject: subject.into(),
            encounter: None,
            supporting_information: Vec::new(),
            authored_on: None,
            requester: None,
            performer: None,
            performer_type: None,
            recorder: None,
            reason_code: Vec::new(),
            reason_reference: Vec::new(),
            instantiates_canonical: Vec::new(),
            instantiates_uri: Vec::new(),
            based_on: Vec::new(),
            group_identifier: None,
            course_of_therapy_type: None,
            insurance: Vec::new(),
            note: Vec::new(),
            dosage_instruction: Vec::new(),
            dispense_request: None,
            substitution: None,
            prior_prescription: None,
            detected_issue: Vec::new(),
            event_history: Vec::new(),
        }
    }

    pub fn to_builder(&self) -> MedicationRequestBuilder {
        MedicationRequestBuilder::from(self)
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

    pub fn intent(&self) -> &Code {
        &self.intent
    }

    pub fn category(&self) -> &[CodeableConcept] {
        &self.category
    }

    pub fn priority(&self) -> Option<&Code> {
        self.priority.as_ref()
    }

    pub fn do_not_perform(&self) -> Option<&Boolean> {
        self.do_not_perform.as_ref()
    }

    /// `reported[x]`: `boolean` or `Reference`.
    pub fn reported(&self) -> Option<&BooleanOrReference> {
        self.reported.as_ref()
    }

    /// `medication[x]`: `CodeableConcept` or `Reference`.
    pub fn medication(&self) -> &CodeableConceptOrReference {
        &self.medication
    }

    pub fn subject(&self) -> &Reference {
        &self.subject
    }

    pub fn encounter(&self) -> Option<&Reference> {
        self.encounter.as_ref()
    }

    pub fn supporting_information(&self) -> &[Reference] {
        &self.supporting_information
    }

    pub fn authored_on(&self) -> Option<&DateTime> {
        self.authored_on.as_ref()
    }

    pub fn requester(&self) -> Option<&Reference> {
        self.requester.as_ref()
    }

    pub fn performer(&self) -> Option<&Reference> {
        self.performer.as_ref()
    }

    pub fn performer_type(&self) -> Option<&CodeableConcept> {
        self.performer_type.as_ref()
    }

    pub fn recorder(&self) -> Option<&Reference> {
        self.recorder.as_ref()
    }

    pub fn reason_code(&self) -> &[CodeableConcept] {
        &self.reason_code
    }

    pub fn reason_reference(&self) -> &[Reference] {
        &self.reason_reference
    }

    pub fn instantiates_canonical(&self) -> &[Canonical] {
        &self.instantiates_canonical
    }

    pub fn instantiates_uri(&self) -> &[Uri] {
        &self.instantiates_uri
    }

    pub fn based_on(&self) -> &[Reference] {
        &self.based_on
    }

    pub fn group_identifier(&self) -> Option<&Identifier> {
        self.group_identifier.as_ref()
    }

    pub fn course_of_therapy_type(&self) -> Option<&CodeableConcept> {
        self.course_of_therapy_type.as_ref()
    }

    pub fn insurance(&self) -> &[Reference] {
        &self.insurance
    }

    pub fn note(&self) -> &[Annotation] {
        &self.note
    }

    pub fn dosage_instruction(&self) -> &[Dosage] {
        &self.dosage_instruction
    }

    pub fn dispense_request(&self) -> Option<&DispenseRequest> {
        self.dispense_request.as_ref()
    }

    pub fn substitution(&self) -> Option<&Substitution> {
        self.substitution.as_ref()
    }

    pub fn prior_prescription(&self) -> Option<&Reference> {
        self.prior_prescription.as_ref()
    }

    pub fn detected_issue(&self) -> &[Reference] {
        &self.detected_issue
    }

    pub fn event_history(&self) -> &[Reference] {
        &self.event_history
    }
}

domain_resource!(
    MedicationRequest,
    MedicationRequestBuilder,
    |m| Fields::new()
        .domain_resource(&m.resource, &m.domain)
        .many("identifier", &m.identifier)
        .one("status", &m.status)
        .opt("statusReason", m.status_reason.as_ref())
        .one("intent", &m.intent)
        .many("category", &m.category)
        .opt("priority", m.priority.as_ref())
        .opt("doNotPerform", m.do_not_perform.as_ref())
        .choice("reported", m.reported.as_ref())
        .choice("medication", Some(&m.medication))
        .one("subject", &m.subject)
        .opt("encounter", m.encounter.as_ref())
        .many("supportingInformation", &m.supporting_information)
        .opt("authoredOn", m.authored_on.as_ref())
        .opt("requester", m.requester.as_ref())
        .opt("performer", m.performer.as_ref())
        .opt("performerType", m.performer_type.as_ref())
        .opt("recorder", m.recorder.as_ref())
        .many("reasonCode", &m.reason_code)
        .many("reasonReference", &m.reason_reference)
        .many("instantiatesCanonical", &m.instantiates_canonical)
        .many("instantiatesUri", &m.instantiates_uri)
        .many("basedOn", &m.based_on)
        .opt("groupIdentifier", m.group_identifier.as_ref())
        .opt("courseOfTherapyType", m.course_of_therapy_type.as_ref())
        .many("insurance", &m.insurance)
        .many("note", &m.note)
        .many("dosageInstruction", &m.dosage_instruction)
        .opt("dispenseRequest", m.dispense_request.as_ref())
        .opt("substitution", m.substitution.as_ref())
        .opt("priorPrescription", m.prior_prescription.as_ref())
        .many("detectedIssue", &m.detected_issue)
        .many("eventHistory", &m.event_history)
        .build()
);

#[derive(Debug, Clone)]
pub struct MedicationRequestBuilder {
    resource: ResourceFields,
    domain: DomainResourceFields,
    identifier: Vec<Identifier>,
    status: Option<Code>,
    status_reason: Option<CodeableConcept>,
    intent: Option<Code>,
    category: Vec<CodeableConcept>,
    priority: Option<Code>,
    do_not_perform: Option<Boolean>,
    reported: Option<Element>,
    medication: Option<Element>,
    subject: Option<Reference>,
    encounter: Option<Reference>,
    supporting_information: Vec<Reference>,
    authored_on: Option<DateTime>,
    requester: Option<Reference>,
    performer: Option<Reference>,
    performer_type: Option<CodeableConcept>,
    recorder: Option<Reference>,
    reason_code: Vec<CodeableConcept>,
    reason_reference: Vec<Reference>,
    instantiates_canonical: Vec<Canonical>,
    instantiates_uri: Vec<Uri>,
    based_on: Vec<Reference>,
    group_identifier: Option<Identifier>,
    course_of_therapy_type: Option<CodeableConcept>,
    insurance: Vec<Reference>,
    note: Vec<Annotation>,
    dosage_instruction: Vec<Dosage>,
    dispense_request: Option<DispenseRequest>,
    substitution: Option<Substitution>,
    prior_prescription: Option<Reference>,
    detected_issue: Vec<Reference>,
    event_history: Vec<Reference>,
}

impl MedicationRequestBuilder {
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

    pub fn category(mut self, category: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.category.extend(category);
        self
    }

    pub fn set_category(mut self, category: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.category = category.into_iter().collect();
        self
    }

    pub fn priority(mut self, priority: impl Into<Option<Code>>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn do_not_perform(mut self, do_not_perform: impl Into<Option<Boolean>>) -> Self {
        self.do_not_perform = do_not_perform.into();
        self
    }

    /// `reported[x]`: `boolean` or `Reference`.
    pub fn reported(mut self, reported: impl Into<Option<Element>>) -> Self {
        self.reported = reported.into();
        self
    }

    pub fn encounter(mut self, encounter: impl Into<Option<Reference>>) -> Self {
        self.encounter = encounter.into();
        self
    }

    pub fn supporting_information(
        mut self,
        supporting_information: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.supporting_information.extend(supporting_information);
        self
    }

    pub fn set_supporting_information(
        mut self,
        supporting_information: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.supporting_information = supporting_information.into_iter().collect();
        self
    }

    pub fn authored_on(mut self, authored_on: impl Into<Option<DateTime>>) -> Self {
        self.authored_on = authored_on.into();
        self
    }

    pub fn requester(mut self, requester: impl Into<Option<Reference>>) -> Self {
        self.requester = requester.into();
        self
    }

    pub fn performer(mut self, performer: impl Into<Option<Reference>>) -> Self {
        self.performer = performer.into();
        self
    }

    pub fn performer_type(mut self, performer_type: impl Into<Option<CodeableConcept>>) -> Self {
        self.performer_type = performer_type.into();
        self
    }

    pub fn recorder(mut self, recorder: impl Into<Option<Reference>>) -> Self {
        self.recorder = recorder.into();
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

    pub fn instantiates_canonical(
        mut self,
        instantiates_canonical: impl IntoIterator<Item = Canonical>,
    ) -> Self {
        self.instantiates_canonical.extend(instantiates_canonical);
        self
    }

    pub fn set_instantiates_canonical(
        mut self,
        instantiates_canonical: impl IntoIterator<Item = Canonical>,
    ) -> Self {
        self.instantiates_canonical = instantiates_canonical.into_iter().collect();
        self
    }

    pub fn instantiates_uri(mut self, instantiates_uri: impl IntoIterator<Item = Uri>) -> Self {
        self.instantiates_uri.extend(instantiates_uri);
        self
    }

    pub fn set_instantiates_uri(mut self, instantiates_uri: impl IntoIterator<Item = Uri>) -> Self {
        self.instantiates_uri = instantiates_uri.into_iter().collect();
        self
    }

    pub fn based_on(mut self, based_on: impl IntoIterator<Item = Reference>) -> Self {
        self.based_on.extend(based_on);
        self
    }

    pub fn set_based_on(mut self, based_on: impl IntoIterator<Item = Reference>) -> Self {
        self.based_on = based_on.into_iter().collect();
        self
    }

    pub fn group_identifier(mut self, group_identifier: impl Into<Option<Identifier>>) -> Self {
        self.group_identifier = group_identifier.into();
        self
    }

    pub fn course_of_therapy_type(
        mut self,
        course_of_therapy_type: impl Into<Option<CodeableConcept>>,
    ) -> Self {
        self.course_of_therapy_type = course_of_therapy_type.into();
        self
    }

    pub fn insurance(mut self, insurance: impl IntoIterator<Item = Reference>) -> Self {
        self.insurance.extend(insurance);
        self
    }

    pub fn set_insurance(mut self, insurance: impl IntoIterator<Item = Reference>) -> Self {
        self.insurance = insurance.into_iter().collect();
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

    pub fn dosage_instruction(
        mut self,
        dosage_instruction: impl IntoIterator<Item = Dosage>,
    ) -> Self {
        self.dosage_instruction.extend(dosage_instruction);
        self
    }

    pub fn set_dosage_instruction(
        mut self,
        dosage_instruction: impl IntoIterator<Item = Dosage>,
    ) -> Self {
        self.dosage_instruction = dosage_instruction.into_iter().collect();
        self
    }

    pub fn dispense_request(
        mut self,
        dispense_request: impl Into<Option<DispenseRequest>>,
    ) -> Self {
        self.dispense_request = dispense_request.into();
        self
    }

    pub fn substitution(mut self, substitution: impl Into<Option<Substitution>>) -> Self {
        self.substitution = substitution.into();
        self
    }

    pub fn prior_prescription(mut self, prior_prescription: impl Into<Option<Reference>>) -> Self {
        self.prior_prescription = prior_prescription.into();
        self
    }

    pub fn detected_issue(mut self, detected_issue: impl IntoIterator<Item = Reference>) -> Self {
        self.detected_issue.extend(detected_issue);
        self
    }

    pub fn set_detected_issue(
        mut self,
        detected_issue: impl IntoIterator<Item = Reference>,
    ) -> Self {
        self.detected_issue = detected_issue.into_iter().collect();
        self
    }

    pub fn event_history(mut self, event_history: impl IntoIterator<Item = Reference>) -> Self {
        self.event_history.extend(event_history);
        self
    }

    pub fn set_event_history(mut self, event_history: impl IntoIterator<Item = Reference>) -> Self {
        self.event_history = event_history.into_iter().collect();
        self
    }

    pub fn build(&self) -> Result<MedicationRequest> {
        finish("MedicationRequest", || {
            let status = require_non_null(self.status.clone(), "status")?;
            let intent = require_non_null(self.intent.clone(), "intent")?;
            let reported: Option<BooleanOrReference> =
                choice_element(self.reported.clone(), "reported")?;
            let medication: CodeableConceptOrReference =
                require_choice_element(self.medication.clone(), "medication")?;
            let subject = require_non_null(self.subject.clone(), "subject")?;
            check_choice_reference_type(
                reported.as_ref(),
                "reported",
                &["Patient", "Practitioner", "PractitionerRole", "RelatedPerson", "Organization"],
            )?;
            check_choice_reference_type(Some(&medication), "medication", &["Medication"])?;
            check_reference_type(Some(&subject), "subject", &["Patient", "Group"])?;
            check_reference_type(self.encounter.as_ref(), "encounter", &["Encounter"])?;
            check_reference_type(
                self.requester.as_ref(),
                "requester",
                &[
                    "Practitioner", "PractitionerRole", "Organization", "Patient", "RelatedPerson",
                    "Device",
                ],
            )?;
            check_reference_type(
                self.performer.as_ref(),
                "performer",
                &[
                    "Practitioner", "PractitionerRole", "Organization", "Patient", "Device",
                    "RelatedPerson", "CareTeam",
                ],
            )?;
            check_reference_type(
                self.recorder.as_ref(),
                "recorder",
                &["Practitioner", "PractitionerRole"],
            )?;
            check_reference_types(
                &self.reason_reference,
                "reasonReference",
                &["Condition", "Observation"],
            )?;
            check_reference_types(
                &self.based_on,
                "basedOn",
                &["CarePlan", "MedicationRequest", "ServiceRequest", "ImmunizationRecommendation"],
            )?;
            check_reference_types(&self.insurance, "insurance", &["Coverage", "ClaimResponse"])?;
            check_reference_type(
                self.prior_prescription.as_ref(),
                "priorPrescription",
                &["MedicationRequest"],
            )?;
            check_reference_types(&self.detected_issue, "detectedIssue", &["DetectedIssue"])?;
            check_reference_types(&self.event_history, "eventHistory", &["Provenance"])?;
            let mut medication_request = MedicationRequest {
                hash: 0,
                resource: self.resource.clone(),
                domain: self.domain.clone(),
                identifier: self.identifier.clone(),
                status,
                status_reason: self.status_reason.clone(),
                intent,
                category: self.category.clone(),
                priority: self.priority.clone(),
                do_not_perform: self.do_not_perform.clone(),
                reported,
                medication,
                subject,
                encounter: self.encounter.clone(),
                supporting_information: self.supporting_information.clone(),
                authored_on: self.authored_on.clone(),
                requester: self.requester.clone(),
                performer: self.performer.clone(),
                performer_type: self.performer_type.clone(),
                recorder: self.recorder.clone(),
                reason_code: self.reason_code.clone(),
                reason_reference: self.reason_reference.clone(),
                instantiates_canonical: self.instantiates_canonical.clone(),
                instantiates_uri: self.instantiates_uri.clone(),
                based_on: self.based_on.clone(),
                group_identifier: self.group_identifier.clone(),
                course_of_therapy_type: self.course_of_therapy_type.clone(),
                insurance: self.insurance.clone(),
                note: self.note.clone(),
                dosage_instruction: self.dosage_instruction.clone(),
                dispense_request: self.dispense_request.clone(),
                substitution: self.substitution.clone(),
                prior_prescription: self.prior_prescription.clone(),
                detected_issue: self.detected_issue.clone(),
                event_history: self.event_history.clone(),
            };
            medication_request.hash = structural_hash(&medication_request);
            Ok(medication_request)
        })
    }
}

impl From<&MedicationRequest> for MedicationRequestBuilder {
    fn from(medication_request: &MedicationRequest) -> Self {
        Self {
            resource: medication_request.resource.clone(),
            domain: medication_request.domain.clone(),
            identifier: medication_request.identifier.clone(),
            status: Some(medication_request.status.clone()),
            status_reason: medication_request.status_reason.clone(),
            intent: Some(medication_request.intent.clone()),
            category: medication_request.category.clone(),
            priority: medication_request.priority.clone(),
            do_not_perform: medication_request.do_not_perform.clone(),
            reported: medication_request.reported.clone().map(Element::from),
            medication: Some(medication_request.medication.clone().into()),
            subject: Some(medication_request.subject.clone()),
            encounter: medication_request.encounter.clone(),
            supporting_information: medication_request.supporting_information.clone(),
            authored_on: medication_request.authored_on.clone(),
            requester: medication_request.requester.clone(),
            performer: medication_request.performer.clone(),
            performer_type: medication_request.performer_type.clone(),
            recorder: medication_request.recorder.clone(),
            reason_code: medication_request.reason_code.clone(),
            reason_reference: medication_request.reason_reference.clone(),
            instantiates_canonical: medication_request.instantiates_canonical.clone(),
            instantiates_uri: medication_request.instantiates_uri.clone(),
            based_on: medication_request.based_on.clone(),
            group_identifier: medication_request.group_identifier.clone(),
            course_of_therapy_type: medication_request.course_of_therapy_type.clone(),
            insurance: medication_request.insurance.clone(),
            note: medication_request.note.clone(),
            dosage_instruction: medication_request.dosage_instruction.clone(),
            dispense_request: medication_request.dispense_request.clone(),
            substitution: medication_request.substitution.clone(),
            prior_prescription: medication_request.prior_prescription.clone(),
            detected_issue: medication_request.detected_issue.clone(),
            event_history: medication_request.event_history.clone(),
        }
    }
}

// ============================================================================
// DispenseRequest
// ============================================================================

/// Dispensing instructions attached to the order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispenseRequest {
    base: BackboneFields,
    initial_fill: Option<InitialFill>,
    dispense_interval: Option<Quantity>,
    validity_period: Option<Period>,
    number_of_repeats_allowed: Option<UnsignedInt>,
    quantity: Option<Quantity>,
    expected_supply_duration: Option<Quantity>,
    performer: Option<Reference>,
}

impl DispenseRequest {
    pub fn builder() -> DispenseRequestBuilder {
        DispenseRequestBuilder {
            base: BackboneFields::default(),
            initial_fill: None,
            dispense_interval: None,
            validity_period: None,
            number_of_repeats_allowed: None,
            quantity: None,
            expected_supply_duration: None,
            performer: None,
        }
    }

    pub fn to_builder(&self) -> DispenseRequestBuilder {
        DispenseRequestBuilder::from(self)
    }

    pub fn initial_fill(&self) -> Option<&InitialFill> {
        self.initial_fill.as_ref()
    }

    pub fn dispense_interval(&self) -> Option<&Quantity> {
        self.dispense_interval.as_ref()
    }

    pub fn validity_period(&self) -> Option<&Period> {
        self.validity_period.as_ref()
    }

    pub fn number_of_repeats_allowed(&self) -> Option<&UnsignedInt> {
        self.number_of_repeats_allowed.as_ref()
    }

    pub fn quantity(&self) -> Option<&Quantity> {
        self.quantity.as_ref()
    }

    pub fn expected_supply_duration(&self) -> Option<&Quantity> {
        self.expected_supply_duration.as_ref()
    }

    pub fn performer(&self) -> Option<&Reference> {
        self.performer.as_ref()
    }
}

backbone_element!(
    DispenseRequest,
    DispenseRequestBuilder,
    "MedicationRequest.DispenseRequest",
    |d| Fields::new()
        .backbone(&d.base)
        .opt("initialFill", d.initial_fill.as_ref())
        .opt("dispenseInterval", d.dispense_interval.as_ref())
        .opt("validityPeriod", d.validity_period.as_ref())
        .opt("numberOfRepeatsAllowed", d.number_of_repeats_allowed.as_ref())
        .opt("quantity", d.quantity.as_ref())
        .opt("expectedSupplyDuration", d.expected_supply_duration.as_ref())
        .opt("performer", d.performer.as_ref())
        .build()
);

#[derive(Debug, Clone, Default)]
pub struct DispenseRequestBuilder {
    base: BackboneFields,
    initial_fill: Option<InitialFill>,
    dispense_interval: Option<Quantity>,
    validity_period: Option<Period>,
    number_of_repeats_allowed: Option<UnsignedInt>,
    quantity: Option<Quantity>,
    expected_supply_duration: Option<Quantity>,
    performer: Option<Reference>,
}

impl DispenseRequestBuilder {
    pub fn initial_fill(mut self, initial_fill: impl Into<Option<InitialFill>>) -> Self {
        self.initial_fill = initial_fill.into();
        self
    }

    pub fn dispense_interval(mut self, dispense_interval: impl Into<Option<Quantity>>) -> Self {
        self.dispense_interval = dispense_interval.into();
        self
    }

    pub fn validity_period(mut self, validity_period: impl Into<Option<Period>>) -> Self {
        self.validity_period = validity_period.into();
        self
    }

    pub fn number_of_repeats_allowed(
        mut self,
        number_of_repeats_allowed: impl Into<Option<UnsignedInt>>,
    ) -> Self {
        self.number_of_repeats_allowed = number_of_repeats_allowed.into();
        self
    }

    pub fn quantity(mut self, quantity: impl Into<Option<Quantity>>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn expected_supply_duration(
        mut self,
        expected_supply_duration: impl Into<Option<Quantity>>,
    ) -> Self {
        self.expected_supply_duration = expected_supply_duration.into();
        self
    }

    pub fn performer(mut self, performer: impl Into<Option<Reference>>) -> Self {
        self.performer = performer.into();
        self
    }

    pub fn build(&self) -> Result<DispenseRequest> {
        finish("MedicationRequest.DispenseRequest", || {
            self.base.validate()?;
            check_reference_type(self.performer.as_ref(), "performer", &["Organization"])?;
            let dispense_request = DispenseRequest {
                base: self.base.clone(),
                initial_fill: self.initial_fill.clone(),
                dispense_interval: self.dispense_interval.clone(),
                validity_period: self.validity_period.clone(),
                number_of_repeats_allowed: self.number_of_repeats_allowed.clone(),
                quantity: self.quantity.clone(),
                expected_supply_duration: self.expected_supply_duration.clone(),
                performer: self.performer.clone(),
            };
            require_value_or_children(&dispense_request)?;
            Ok(dispense_request)
        })
    }
}

impl From<&DispenseRequest> for DispenseRequestBuilder {
    fn from(dispense_request: &DispenseRequest) -> Self {
        Self {
            base: dispense_request.base.clone(),
            initial_fill: dispense_request.initial_fill.clone(),
            dispense_interval: dispense_request.dispense_interval.clone(),
            validity_period: dispense_request.validity_period.clone(),
            number_of_repeats_allowed: dispense_request.number_of_repeats_allowed.clone(),
            quantity: dispense_request.quantity.clone(),
            expected_supply_duration: dispense_request.expected_supply_duration.clone(),
            performer: dispense_request.performer.clone(),
        }
    }
}

// ============================================================================
// InitialFill
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InitialFill {
    base: BackboneFields,
    quantity: Option<Quantity>,
    duration: Option<Quantity>,
}

impl InitialFill {
    pub fn builder() -> InitialFillBuilder {
        InitialFillBuilder {
            base: BackboneFields::default(),
            quantity: None,
            duration: None,
        }
    }

    pub fn to_builder(&self) -> InitialFillBuilder {
        InitialFillBuilder::from(self)
    }

    pub fn quantity(&self) -> Option<&Quantity> {
        self.quantity.as_ref()
    }

    pub fn duration(&self) -> Option<&Quantity> {
        self.duration.as_ref()
    }
}

backbone_element!(
    InitialFill,
    InitialFillBuilder,
    "MedicationRequest.DispenseRequest.InitialFill",
    |i| Fields::new()
        .backbone(&i.base)
        .opt("quantity", i.quantity.as_ref())
        .opt("duration", i.duration.as_ref())
        .build()
);

#[derive(Debug, Clone, Default)]
pub struct InitialFillBuilder {
    base: BackboneFields,
    quantity: Option<Quantity>,
    duration: Option<Quantity>,
}

impl InitialFillBuilder {
    pub fn quantity(mut self, quantity: impl Into<Option<Quantity>>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn duration(mut self, duration: impl Into<Option<Quantity>>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn build(&self) -> Result<InitialFill> {
        finish("MedicationRequest.DispenseRequest.InitialFill", || {
            self.base.validate()?;
            let initial_fill = InitialFill {
                base: self.base.clone(),
                quantity: self.quantity.clone(),
                duration: self.duration.clone(),
            };
            require_value_or_children(&initial_fill)?;
            Ok(initial_fill)
        })
    }
}

impl From<&InitialFill> for InitialFillBuilder {
    fn from(initial_fill: &InitialFill) -> Self {
        Self {
            base: initial_fill.base.clone(),
            quantity: initial_fill.quantity.clone(),
            duration: initial_fill.duration.clone(),
        }
    }
}

// ============================================================================
// Substitution
// ============================================================================

/// Whether a different drug may be dispensed instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Substitution {
    base: BackboneFields,
    allowed: BooleanOrCodeableConcept,
    reason: Option<CodeableConcept>,
}

impl Substitution {
    pub fn builder(allowed: impl Into<Option<Element>>) -> SubstitutionBuilder {
        SubstitutionBuilder {
            base: BackboneFields::default(),
            allowed: allowed.into(),
            reason: None,
        }
    }

    pub fn to_builder(&self) -> SubstitutionBuilder {
        SubstitutionBuilder::from(self)
    }

    /// `allowed[x]`: `boolean` or `CodeableConcept`.
    pub fn allowed(&self) -> &BooleanOrCodeableConcept {
        &self.allowed
    }

    pub fn reason(&self) -> Option<&CodeableConcept> {
        self.reason.as_ref()
    }
}

backbone_element!(
    Substitution,
    SubstitutionBuilder,
    "MedicationRequest.Substitution",
    |s| Fields::new()
        .backbone(&s.base)
        .choice("allowed", Some(&s.allowed))
        .opt("reason", s.reason.as_ref())
        .build()
);

#[derive(Debug, Clone)]
pub struct SubstitutionBuilder {
    base: BackboneFields,
    allowed: Option<Element>,
    reason: Option<CodeableConcept>,
}

impl SubstitutionBuilder {
    pub fn reason(mut self, reason: impl Into<Option<CodeableConcept>>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn build(&self) -> Result<Substitution> {
        finish("MedicationRequest.Substitution", || {
            self.base.validate()?;
            let allowed: BooleanOrCodeableConcept =
                require_choice_element(self.allowed.clone(), "allowed")?;
            let substitution = Substitution {
                base: self.base.clone(),
                allowed,
                reason: self.reason.clone(),
            };
            require_value_or_children(&substitution)?;
            Ok(substitution)
        })
    }
}

impl From<&Substitution> for SubstitutionBuilder {
    fn from(substitution: &Substitution) -> Self {
        Self {
            base: substitution.base.clone(),
            allowed: Some(substitution.allowed.clone().into()),
            reason: substitution.reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::types::FhirString;
    use crate::Error;

    fn order(medication: impl Into<Option<Element>>) -> MedicationRequestBuilder {
        MedicationRequest::builder(
            Code::new("active").unwrap(),
            Code::new("order").unwrap(),
            medication,
            Reference::to("Patient/example").unwrap(),
        )
    }

    #[test]
    fn test_medication_choice() {
        let by_code = order(CodeableConcept::from_text("Amoxicillin").unwrap())
            .build()
            .unwrap();
        assert_eq!(by_code.medication().type_name(), "CodeableConcept");

        let by_reference = order(Reference::to("Medication/med0301").unwrap()).build().unwrap();
        assert!(matches!(
            by_reference.medication(),
            CodeableConceptOrReference::Reference(_)
        ));

        let err = order(Reference::to("Substance/s1").unwrap()).build().unwrap_err();
        assert_eq!(err.field(), Some("medication"));

        let err = order(Boolean::from(true)).build().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidChoiceType {
                field: "medication",
                found: "boolean",
                allowed: &["CodeableConcept", "Reference"],
            }
        );
    }

    #[test]
    fn test_required_fields_are_reported_in_order() {
        let err = MedicationRequest::builder(None, None, None, None).build().unwrap_err();
        assert_eq!(err, Error::MissingRequiredField { field: "status" });

        let err = MedicationRequest::builder(Code::new("active").unwrap(), None, None, None)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::MissingRequiredField { field: "intent" });
    }

    #[test]
    fn test_reported_reference_targets() {
        assert!(order(CodeableConcept::from_text("x").unwrap())
            .reported(Reference::to("Practitioner/p1").unwrap())
            .build()
            .is_ok());
        let err = order(CodeableConcept::from_text("x").unwrap())
            .reported(Reference::to("Device/d1").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("reported"));
        assert!(order(CodeableConcept::from_text("x").unwrap())
            .reported(Boolean::from(true))
            .build()
            .is_ok());
    }

    #[test]
    fn test_dispense_request() {
        let fill = InitialFill::builder()
            .quantity(Quantity::builder().unit(FhirString::new("tab").unwrap()).build().unwrap())
            .build()
            .unwrap();
        let dispense = DispenseRequest::builder()
            .initial_fill(fill)
            .number_of_repeats_allowed(UnsignedInt::new(3).unwrap())
            .performer(Reference::to("Organization/pharmacy").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            dispense.number_of_repeats_allowed().and_then(|n| n.value()),
            Some(&3)
        );

        let err = DispenseRequest::builder()
            .performer(Reference::to("Patient/p").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("performer"));
        assert_eq!(
            InitialFill::builder().build().unwrap_err(),
            Error::EmptyElement { element: "MedicationRequest.DispenseRequest.InitialFill" }
        );
    }

    #[test]
    fn test_substitution_allowed() {
        let substitution = Substitution::builder(Boolean::from(false)).build().unwrap();
        assert_eq!(substitution.allowed().type_name(), "boolean");
        assert_eq!(
            Substitution::builder(None).build().unwrap_err(),
            Error::MissingRequiredField { field: "allowed" }
        );
    }

    #[test]
    fn test_dosage_instruction_append_and_replace() {
        let dose = |text: &str| {
            Dosage::builder()
                .text(FhirString::new(text).unwrap())
                .build()
                .unwrap()
        };
        let request = order(CodeableConcept::from_text("x").unwrap())
            .dosage_instruction([dose("a")])
            .dosage_instruction([dose("b")])
            .build()
            .unwrap();
        assert_eq!(request.dosage_instruction().len(), 2);

        let replaced = request
            .to_builder()
            .set_dosage_instruction([dose("c")])
            .build()
            .unwrap();
        assert_eq!(replaced.dosage_instruction(), &[dose("c")]);
    }
}
