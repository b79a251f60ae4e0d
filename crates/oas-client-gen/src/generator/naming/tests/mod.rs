mod identifiers;
mod operations;
