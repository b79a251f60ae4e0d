pub mod identifiers;
pub mod operations;

#[cfg(test)]
mod tests;
