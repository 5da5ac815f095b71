//! Resources: the resource and domain-resource bases, the [`Resource`]
//! enum over the implemented types, and the table of FHIR resource type
//! names used for reference checks.

use std::any::Any;

use crate::types::element::Extension;
use crate::types::{Code, Id, Meta, Narrative, Uri};
use crate::visitor::{Field, Fields, NodeKind, Visitable};

pub mod clinical_impression;
pub mod immunization;
pub mod medication_request;
pub mod questionnaire;

pub use clinical_impression::{ClinicalImpression, ClinicalImpressionBuilder};
pub use immunization::{Immunization, ImmunizationBuilder};
pub use medication_request::{MedicationRequest, MedicationRequestBuilder};
pub use questionnaire::{Questionnaire, QuestionnaireBuilder};

/// Every FHIR R4 resource type name.
static RESOURCE_TYPES: phf::Set<&'static str> = phf::phf_set! {
    "Account", "ActivityDefinition", "AdverseEvent", "AllergyIntolerance", "Appointment",
    "AppointmentResponse", "AuditEvent", "Basic", "Binary", "BiologicallyDerivedProduct",
    "BodyStructure", "Bundle", "CapabilityStatement", "CarePlan", "CareTeam", "CatalogEntry",
    "ChargeItem", "ChargeItemDefinition", "Claim", "ClaimResponse", "ClinicalImpression",
    "CodeSystem", "Communication", "CommunicationRequest", "CompartmentDefinition", "Composition",
    "ConceptMap", "Condition", "Consent", "Contract", "Coverage", "CoverageEligibilityRequest",
    "CoverageEligibilityResponse", "DetectedIssue", "Device", "DeviceDefinition", "DeviceMetric",
    "DeviceRequest", "DeviceUseStatement", "DiagnosticReport", "DocumentManifest",
    "DocumentReference", "EffectEvidenceSynthesis", "Encounter", "Endpoint", "EnrollmentRequest",
    "EnrollmentResponse", "EpisodeOfCare", "EventDefinition", "Evidence", "EvidenceVariable",
    "ExampleScenario", "ExplanationOfBenefit", "FamilyMemberHistory", "Flag", "Goal",
    "GraphDefinition", "Group", "GuidanceResponse", "HealthcareService", "ImagingStudy",
    "Immunization", "ImmunizationEvaluation", "ImmunizationRecommendation", "ImplementationGuide",
    "InsurancePlan", "Invoice", "Library", "Linkage", "List", "Location", "Measure",
    "MeasureReport", "Media", "Medication", "MedicationAdministration", "MedicationDispense",
    "MedicationKnowledge", "MedicationRequest", "MedicationStatement", "MedicinalProduct",
    "MedicinalProductAuthorization", "MedicinalProductContraindication",
    "MedicinalProductIndication", "MedicinalProductIngredient", "MedicinalProductInteraction",
    "MedicinalProductManufactured", "MedicinalProductPackaged", "MedicinalProductPharmaceutical",
    "MedicinalProductUndesirableEffect", "MessageDefinition", "MessageHeader",
    "MolecularSequence", "NamingSystem", "NutritionOrder", "Observation", "ObservationDefinition",
    "OperationDefinition", "OperationOutcome", "Organization", "OrganizationAffiliation",
    "Parameters", "Patient", "PaymentNotice", "PaymentReconciliation", "Person", "PlanDefinition",
    "Practitioner", "PractitionerRole", "Procedure", "Provenance", "Questionnaire",
    "QuestionnaireResponse", "RelatedPerson", "RequestGroup", "ResearchDefinition",
    "ResearchElementDefinition", "ResearchStudy", "ResearchSubject", "RiskAssessment",
    "RiskEvidenceSynthesis", "Schedule", "SearchParameter", "ServiceRequest", "Slot", "Specimen",
    "SpecimenDefinition", "StructureDefinition", "StructureMap", "Subscription", "Substance",
    "SubstanceNucleicAcid", "SubstancePolymer", "SubstanceProtein",
    "SubstanceReferenceInformation", "SubstanceSourceMaterial", "SubstanceSpecification",
    "SupplyDelivery", "SupplyRequest", "Task", "TerminologyCapabilities", "TestReport",
    "TestScript", "ValueSet", "VerificationResult", "VisionPrescription",
};

/// Whether `name` is a concrete FHIR resource type.
pub fn is_resource_type(name: &str) -> bool {
    RESOURCE_TYPES.contains(name)
}

// ============================================================================
// Base fields
// ============================================================================

/// `id`, `meta`, `implicitRules` and `language`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceFields {
    pub(crate) id: Option<Id>,
    pub(crate) meta: Option<Meta>,
    pub(crate) implicit_rules: Option<Uri>,
    pub(crate) language: Option<Code>,
}

/// `text`, `contained`, `extension` and `modifierExtension`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainResourceFields {
    pub(crate) text: Option<Narrative>,
    pub(crate) contained: Vec<Resource>,
    pub(crate) extension: Vec<Extension>,
    pub(crate) modifier_extension: Vec<Extension>,
}

pub trait ResourceBase {
    fn resource_base(&self) -> &ResourceFields;

    fn id(&self) -> Option<&Id> {
        self.resource_base().id.as_ref()
    }

    fn meta(&self) -> Option<&Meta> {
        self.resource_base().meta.as_ref()
    }

    fn implicit_rules(&self) -> Option<&Uri> {
        self.resource_base().implicit_rules.as_ref()
    }

    fn language(&self) -> Option<&Code> {
        self.resource_base().language.as_ref()
    }
}

pub trait DomainResourceBase: ResourceBase {
    fn domain_base(&self) -> &DomainResourceFields;

    fn text(&self) -> Option<&Narrative> {
        self.domain_base().text.as_ref()
    }

    /// Resources owned by this one; they have no identity of their own.
    fn contained(&self) -> &[Resource] {
        &self.domain_base().contained
    }

    fn extension(&self) -> &[Extension] {
        &self.domain_base().extension
    }

    fn modifier_extension(&self) -> &[Extension] {
        &self.domain_base().modifier_extension
    }
}

impl<'a> Fields<'a> {
    /// Base fields of a domain resource, in FHIR order.
    pub fn domain_resource(
        self,
        resource: &'a ResourceFields,
        domain: &'a DomainResourceFields,
    ) -> Self {
        self.opt("id", resource.id.as_ref())
            .opt("meta", resource.meta.as_ref())
            .opt("implicitRules", resource.implicit_rules.as_ref())
            .opt("language", resource.language.as_ref())
            .opt("text", domain.text.as_ref())
            .nodes(
                "contained",
                domain.contained.iter().map(Resource::as_visitable).collect(),
            )
            .many("extension", &domain.extension)
            .many("modifierExtension", &domain.modifier_extension)
    }
}

/// Implements the shared traits of a domain resource whose struct has
/// `hash`, `resource` and `domain` fields.
macro_rules! domain_resource {
    ($name:ident, $builder:ident, |$this:ident| $fields:expr) => {
        impl $crate::resource::ResourceBase for $name {
            fn resource_base(&self) -> &$crate::resource::ResourceFields {
                &self.resource
            }
        }

        impl $crate::resource::DomainResourceBase for $name {
            fn domain_base(&self) -> &$crate::resource::DomainResourceFields {
                &self.domain
            }
        }

        impl ::std::hash::Hash for $name {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                state.write_u64(self.hash);
            }
        }

        impl $crate::visitor::Visitable for $name {
            fn type_name(&self) -> &'static str {
                stringify!($name)
            }

            fn kind(&self) -> $crate::visitor::NodeKind {
                $crate::visitor::NodeKind::Resource
            }

            fn fields(&self) -> Vec<$crate::visitor::Field<'_>> {
                let $this = self;
                $fields
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl From<$name> for $crate::resource::Resource {
            fn from(resource: $name) -> Self {
                $crate::resource::Resource::$name(Box::new(resource))
            }
        }

        impl $crate::builder::ResourceBuilder for $builder {
            fn resource_fields(&mut self) -> &mut $crate::resource::ResourceFields {
                &mut self.resource
            }
        }

        impl $crate::builder::DomainResourceBuilder for $builder {
            fn domain_fields(&mut self) -> &mut $crate::resource::DomainResourceFields {
                &mut self.domain
            }
        }

        impl $name {
            /// Structural hash computed when the resource was built.
            pub fn structural_hash(&self) -> u64 {
                self.hash
            }
        }
    };
}

/// Implements the shared traits of a backbone element whose struct and
/// builder both hold a `base: BackboneFields`.
macro_rules! backbone_element {
    ($name:ident, $builder:ident, $type_name:literal, |$this:ident| $fields:expr) => {
        impl $crate::types::element::BackboneBase for $name {
            fn backbone_base(&self) -> &$crate::types::element::BackboneFields {
                &self.base
            }
        }

        impl $crate::visitor::Visitable for $name {
            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn kind(&self) -> $crate::visitor::NodeKind {
                $crate::visitor::NodeKind::Backbone
            }

            fn fields(&self) -> Vec<$crate::visitor::Field<'_>> {
                let $this = self;
                $fields
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::builder::ElementBuilder for $builder {
            fn element_fields(&mut self) -> &mut $crate::types::element::ElementFields {
                &mut self.base.element
            }
        }

        impl $crate::builder::BackboneElementBuilder for $builder {
            fn backbone_fields(&mut self) -> &mut $crate::types::element::BackboneFields {
                &mut self.base
            }
        }
    };
}

pub(crate) use backbone_element;
pub(crate) use domain_resource;

// ============================================================================
// Resource
// ============================================================================

/// Any implemented resource, e.g. an entry of `contained`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    ClinicalImpression(Box<ClinicalImpression>),
    Immunization(Box<Immunization>),
    MedicationRequest(Box<MedicationRequest>),
    Questionnaire(Box<Questionnaire>),
}

impl Resource {
    pub fn resource_type(&self) -> &'static str {
        self.as_visitable().type_name()
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            Resource::ClinicalImpression(r) => r.id(),
            Resource::Immunization(r) => r.id(),
            Resource::MedicationRequest(r) => r.id(),
            Resource::Questionnaire(r) => r.id(),
        }
    }

    pub fn as_visitable(&self) -> &dyn Visitable {
        match self {
            Resource::ClinicalImpression(r) => r.as_ref(),
            Resource::Immunization(r) => r.as_ref(),
            Resource::MedicationRequest(r) => r.as_ref(),
            Resource::Questionnaire(r) => r.as_ref(),
        }
    }

    pub fn downcast_ref<T: Visitable>(&self) -> Option<&T> {
        self.as_visitable().downcast_ref::<T>()
    }
}

/// `Resource` is transparent to traversal and downcasts: it reports the
/// wrapped resource's type and fields, and `as_any` exposes the wrapped value,
/// so `is::<Immunization>()` and `collect::<Immunization>()` see through it.
/// A `Resource` itself is never matched as a node.
impl Visitable for Resource {
    fn type_name(&self) -> &'static str {
        self.as_visitable().type_name()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Resource
    }

    fn fields(&self) -> Vec<Field<'_>> {
        self.as_visitable().fields()
    }

    fn as_any(&self) -> &dyn Any {
        self.as_visitable().as_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CodeableConcept, DateTime, Reference};
    use crate::visitor::collect;

    fn wrapped() -> Resource {
        Immunization::builder(
            Code::new("completed").unwrap(),
            CodeableConcept::from_text("Flu").unwrap(),
            Reference::to("Patient/1").unwrap(),
            DateTime::new("2020-01-01").unwrap(),
        )
        .build()
        .unwrap()
        .into()
    }

    #[test]
    fn test_resource_is_transparent_to_downcasts() {
        let resource = wrapped();
        let node: &dyn Visitable = &resource;
        assert_eq!(node.type_name(), "Immunization");
        assert!(node.is::<Immunization>());
        assert!(!node.is::<Resource>());
        assert_eq!(
            resource.downcast_ref::<Immunization>(),
            node.downcast_ref::<Immunization>()
        );
        assert_eq!(collect::<Immunization>(&resource).len(), 1);
        assert!(collect::<Resource>(&resource).is_empty());
    }

    #[test]
    fn test_resource_type_names() {
        assert!(is_resource_type("Patient"));
        assert!(is_resource_type("MedicationRequest"));
        assert!(!is_resource_type("patient"));
        assert!(!is_resource_type("Quantity"));
        assert!(!is_resource_type("DomainResource"));
    }
}
