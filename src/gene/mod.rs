//! Gene models and the edits applied to them.
//!
//! A [`Gene`] is built once from a [`crate::annotation::TranscriptAnnotation`]
//! and reference bases, then edited in place:
//!
//! - [`Gene::substitute`] replaces one base
//! - [`Gene::insert`] inserts bases after a position
//! - [`Gene::delete`] removes a half-open interval
//! - [`Gene::reset`] reverts everything
//!
//! Each edit returns an [`crate::effect::EffectPrediction`] describing its
//! consequence for the encoded protein.
//!
//! # Example
//!
//! ```
//! use ferro_genemodel::annotation::{ExonAnnotation, Strand, TranscriptAnnotation};
//! use ferro_genemodel::effect::Consequence;
//! use ferro_genemodel::{Gene, InMemoryReference};
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
//! let mut gene = Gene::build(&annotation, &reference).unwrap();
//!
//! let effect = gene.delete(10, 11).unwrap();
//! assert_eq!(effect.consequence, Consequence::Splice);
//! assert_eq!(gene.cds_starts(), &[2, 7, 10]);
//!
//! gene.reset();
//! assert_eq!(gene.cds_starts(), &[2, 7, 11]);
//! ```

mod build;
mod deletion;
mod insertion;
pub mod mapper;
pub mod model;
mod reset;
mod substitution;

pub use mapper::{CdsOffset, CoordinateMapper};
pub use model::{ChangeLogEntry, Feature, Gene, SeqView};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::Gene;
    use crate::annotation::{ExonAnnotation, Strand, TranscriptAnnotation};
    use crate::codon::reverse_complement;
    use crate::reference::InMemoryReference;

    pub const FIXTURE_SEQ: &str = "ACATGCACCGTTAACG";

    /// Three exons: 5'UTR AC, CDS ATG|CCG|TAA, 3'UTR CG.
    pub fn fixture_annotation() -> TranscriptAnnotation {
        TranscriptAnnotation::new(
            "FIX1",
            "chr1",
            Strand::Plus,
            vec![
                ExonAnnotation::new(1, 5).with_utr5(1, 2).with_cds(3, 5),
                ExonAnnotation::new(8, 10).with_cds(8, 10),
                ExonAnnotation::new(12, 16).with_cds(12, 14).with_utr3(15, 16),
            ],
        )
    }

    pub fn fixture_reference() -> InMemoryReference {
        InMemoryReference::new().with_chromosome("chr1", FIXTURE_SEQ)
    }

    pub fn fixture_gene() -> Gene {
        Gene::build(&fixture_annotation(), &fixture_reference()).unwrap()
    }

    /// The same transcript placed on the minus strand, so local indices match
    /// [`fixture_gene`] and local `i` is reference position `15 - i`.
    pub fn fixture_gene_minus() -> Gene {
        let reference =
            InMemoryReference::new().with_chromosome("chr1", reverse_complement(FIXTURE_SEQ));
        let annotation = TranscriptAnnotation::new(
            "FIX1",
            "chr1",
            Strand::Minus,
            vec![
                ExonAnnotation::new(12, 16).with_utr5(15, 16).with_cds(12, 14),
                ExonAnnotation::new(7, 9).with_cds(7, 9),
                ExonAnnotation::new(1, 5).with_cds(3, 5).with_utr3(1, 2),
            ],
        );
        Gene::build(&annotation, &reference).unwrap()
    }

    /// One exon spanning the whole sequence with the CDS at 1-based `[cds_start, cds_end]`.
    pub fn single_exon_gene(seq: &str, cds_start: u64, cds_end: u64) -> Gene {
        let reference = InMemoryReference::new().with_chromosome("chr1", seq);
        let annotation = TranscriptAnnotation::new(
            "SINGLE",
            "chr1",
            Strand::Plus,
            vec![ExonAnnotation::new(1, seq.len() as u64).with_cds(cds_start, cds_end)],
        );
        Gene::build(&annotation, &reference).unwrap()
    }
}
