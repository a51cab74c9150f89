//! Shared data model for the vigil alert pipeline.
//!
//! Everything that crosses a crate boundary lives here: the
//! [`types::AlertRecord`] produced by scoring and by the synthetic traffic
//! generator, the [`types::Level`] and [`types::Label`] enums, and the
//! rolling dashboard statistics.

pub mod types;
