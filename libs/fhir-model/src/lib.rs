//! Ferrum Model - Immutable FHIR R4 object model
//!
//! Every resource and datatype is an immutable value built through a
//! builder that enforces required fields, closed choice types and reference
//! targets before handing out an instance. A single depth-first traversal
//! engine walks any model graph in FHIR declaration order; JSON rendering,
//! path tracking, collection and structural hashing are all visitors over it.
//!
//! # Example
//!
//! ```rust
//! use ferrum_model::resource::Immunization;
//! use ferrum_model::types::{CodeableConcept, Code, DateTime, Reference};
//!
//! # fn main() -> ferrum_model::Result<()> {
//! let immunization = Immunization::builder(
//!     Code::new("completed")?,
//!     CodeableConcept::from_text("Flu")?,
//!     Reference::to("Patient/1")?,
//!     DateTime::new("2020-01-01")?,
//! )
//! .build()?;
//!
//! let json = ferrum_model::visitor::to_json(&immunization);
//! assert_eq!(json["resourceType"], "Immunization");
//! assert_eq!(json["occurrenceDateTime"], "2020-01-01");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod resource;
pub mod types;
pub mod validation;
pub mod visitor;

pub use error::{Error, Result};

/// Traits needed to build, inspect and walk model values.
pub mod prelude {
    pub use crate::builder::{
        BackboneElementBuilder, DomainResourceBuilder, ElementBuilder, ResourceBuilder,
    };
    pub use crate::resource::{DomainResourceBase, ResourceBase};
    pub use crate::types::element::{BackboneBase, ElementBase};
    pub use crate::types::ChoiceType;
    pub use crate::visitor::{Visitable, Visitor};
}
