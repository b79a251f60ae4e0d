//! Turns the document model into definitions: models first, then the client.
//!
//! The model pass owns the reference cache and hands it to the client pass read-only.

pub(crate) mod cache;
pub(crate) mod cycles;
pub(crate) mod models;
pub(crate) mod operations;
pub(crate) mod type_resolver;

#[cfg(test)]
mod tests;

pub(crate) use cache::ReferenceCache;
pub(crate) use models::{ModelOutput, ModelSynthesizer};
pub(crate) use operations::{ClientOutput, ClientSynthesizer};
pub(crate) use type_resolver::SchemaResolver;
