//! Core form schema types.
//!
//! These types are the structural contract consumed by form renderers,
//! validation engines and data-fetching layers. Everything serializes with
//! camelCase field names so documents are interchangeable with the
//! TypeScript-side contract.

pub mod data_source;
pub mod schema;
pub mod validate;
pub mod validation;

pub use data_source::{DataSource, OptionItem};
pub use schema::{Argument, DependsOn, FormSchema, HttpMethod, InputType};
pub use validate::SchemaError;
pub use validation::ValidationRule;
