//! Document to module tree: the model pass, the client pass, and token emission.

pub(crate) mod ast;
pub(crate) mod codegen;
pub(crate) mod converter;
pub mod metrics;
pub(crate) mod naming;
pub mod orchestrator;
