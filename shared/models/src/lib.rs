//! # CatC Domain Models
//!
//! Domain models for turning a SAR order-intake workbook into a bill of
//! materials for Cloud at Customer deployments.
//!
//! ## Key Models
//!
//! - **Configuration**: customer, subscription counts and the ordered rack list
//! - **RackRecord**: one deployed rack with its type, switches, PDU and cabling
//! - **InternalConnection**: how a rack reaches the hub rack
//! - **Bom**: per-rack part quantities derived from the configuration
//!
//! Rack type, PDU type and internal connection are closed sum types; code that
//! derives parts from them matches them exhaustively.

pub mod bom;
pub mod configuration;
pub mod rack;

#[cfg(test)]
pub mod property_tests;

pub use bom::*;
pub use configuration::*;
pub use rack::*;
