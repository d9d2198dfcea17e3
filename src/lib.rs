// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-genemodel: gene models and mutation effect prediction
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! A [`Gene`] holds one transcript in genomic, cDNA and coding coordinates.
//! Substitutions, insertions and deletions are applied in place and each
//! returns an [`EffectPrediction`]; [`Gene::reset`] reverts them.
//!
//! # Example
//!
//! ```
//! use ferro_genemodel::annotation::{ExonAnnotation, Strand, TranscriptAnnotation};
//! use ferro_genemodel::{Consequence, Gene, InMemoryReference};
//!
//! let reference = InMemoryReference::new().with_chromosome("chr1", "ACATGCACCGTTAACG");
//! let annotation = TranscriptAnnotation::new(
//!     "TX1",
//!     "chr1",
//!     Strand::Plus,
//!     vec![
//!         ExonAnnotation::new(1, 5).with_utr5(1, 2).with_cds(3, 5),
//!         ExonAnnotation::new(8, 10).with_cds(8, 10),
//!         ExonAnnotation::new(12, 16).with_cds(12, 14).with_utr3(15, 16),
//!     ],
//! );
//!
//! let mut gene = Gene::build(&annotation, &reference).unwrap();
//! let effect = gene.substitute(8, 'A').unwrap();
//! assert_eq!(effect.consequence, Consequence::Missense);
//!
//! gene.reset();
//! assert_eq!(gene.coding_seq(), "ATGCCGTAA");
//! ```

pub mod annotation;
pub mod codon;
pub mod config;
pub mod effect;
pub mod error;
pub mod gene;
pub mod reference;

// Re-export commonly used types
pub use annotation::{ExonAnnotation, GenomicRange, Strand, TranscriptAnnotation};
pub use codon::AminoAcid;
pub use config::GeneModelConfig;
pub use effect::{Consequence, EffectPrediction, Impact};
pub use error::FerroError;
pub use gene::{ChangeLogEntry, CoordinateMapper, Feature, Gene};
pub use reference::{InMemoryReference, ReferenceBases};

/// Result type alias for ferro-genemodel operations
pub type Result<T> = std::result::Result<T, FerroError>;
