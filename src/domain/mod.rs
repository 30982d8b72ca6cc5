//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod render;
pub mod validator;

pub use builder::HierarchyBuilder;
pub use entities::*;
pub use error::{DomainError, DomainResult, ValidationError};
pub use render::{
    render, render_markup, render_outline, render_text, Delimiters, DisplayMode, RenderOptions,
};
pub use validator::{is_valid, validate, violations};
