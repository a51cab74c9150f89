//! Alert history layer: bounded in-memory store, append-only durable log,
//! and the reader that stitches the two together.
//!
//! The [`store::AlertStore`] owns the newest-first bounded buffer and the
//! rolling dashboard statistics behind a single mutex, so a push and its
//! stats update are one critical section under concurrent writers. The
//! [`logfile::DurableLog`] appends every scored record to a rolling file
//! and a per-UTC-day file; the [`reader::AlertReader`] serves "N most
//! recent" queries from memory, falling back to a tail-read of the rolling
//! file when the request exceeds what memory holds.

pub mod error;
pub mod logfile;
pub mod reader;
pub mod store;
