//! Model artifact discovery and scoring dispatch.
//!
//! The registry scans a root directory for scoring artifacts, loads each
//! one through an extension-keyed loader table, and exposes immutable
//! lookup by model key (artifact filename, extension stripped). Artifact
//! deserialization is opaque to the rest of the pipeline: loaders hand
//! back a [`scorer::Scorer`] and nothing else ever inspects the blob.

pub mod registry;
pub mod scorer;

#[cfg(test)]
mod tests;
