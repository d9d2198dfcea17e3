//! Reference data abstraction
//!
//! Provides the trait gene models use to read genomic bases, plus an
//! in-memory implementation.

pub mod memory;
pub mod provider;

pub use memory::InMemoryReference;
pub use provider::ReferenceBases;
