//! Frontend Operator (FEO) tool server.

pub mod bundles;
mod core;
pub mod recommendations;
pub mod schema_cache;
pub mod schemas;
pub mod template;
pub mod validation;

pub use core::FeoMcpCore;
pub use schema_cache::{CachedSchema, HttpSchemaSource, SchemaCache, SchemaCacheError, SchemaSource};
