//! orgtree: validate flat employee lists, build the organizational hierarchy
//! they describe and render it as JSON, a text table, an HTML table or a tree.
//!
//! Layers, innermost first:
//! - [`domain`]: records, validator, builder, renderer (no I/O)
//! - [`application`]: the hierarchy service facade
//! - [`infrastructure`]: filesystem boundary, JSON decoding, service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::HierarchyService;
pub use domain::{EmployeeRecord, Hierarchy, HierarchyNode};
