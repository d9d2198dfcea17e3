//! Reference bases trait
//!
//! Defines the interface through which gene models read genomic sequence.
//! FASTA readers and indexed stores live outside this crate and implement
//! [`ReferenceBases`]; [`crate::reference::InMemoryReference`] covers tests
//! and small inputs.

use crate::error::FerroError;
use std::collections::HashMap;

/// Trait for providing reference sequence data
pub trait ReferenceBases {
    /// Get a region of a chromosome on the forward strand
    ///
    /// # Arguments
    ///
    /// * `chrom` - Chromosome/contig name (e.g., "chr1")
    /// * `start` - 0-based start position
    /// * `end` - 0-based end position (exclusive)
    fn bases(&self, chrom: &str, start: u64, end: u64) -> Result<String, FerroError>;

    /// Check if a chromosome is available
    fn has_chromosome(&self, chrom: &str) -> bool;
}

impl ReferenceBases for HashMap<String, String> {
    fn bases(&self, chrom: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let seq = self
            .get(chrom)
            .ok_or_else(|| FerroError::ReferenceNotFound {
                id: chrom.to_string(),
            })?;
        slice_region(chrom, seq, start, end)
    }

    fn has_chromosome(&self, chrom: &str) -> bool {
        self.contains_key(chrom)
    }
}

/// Slice `[start, end)` out of a chromosome sequence, upper-cased
pub(crate) fn slice_region(
    chrom: &str,
    seq: &str,
    start: u64,
    end: u64,
) -> Result<String, FerroError> {
    let (start, end) = (start as usize, end as usize);
    // out-of-bounds and non-char-boundary ranges both miss
    seq.get(start..end)
        .map(str::to_ascii_uppercase)
        .ok_or_else(|| FerroError::ReferenceNotFound {
            id: format!("{}:{}-{} (length {})", chrom, start, end, seq.len()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_reference() {
        let mut reference = HashMap::new();
        reference.insert("chr1".to_string(), "acgtACGT".to_string());

        assert!(reference.has_chromosome("chr1"));
        assert_eq!(reference.bases("chr1", 0, 4).unwrap(), "ACGT");
        assert!(matches!(
            reference.bases("chr2", 0, 1),
            Err(FerroError::ReferenceNotFound { .. })
        ));
        assert!(reference.bases("chr1", 4, 20).is_err());
        assert!(reference.bases("chr1", 5, 3).is_err());
    }

    #[test]
    fn test_slice_region_non_ascii() {
        // 'é' occupies bytes 1..3
        let seq = "AéGT";
        assert!(matches!(
            slice_region("chr1", seq, 0, 2),
            Err(FerroError::ReferenceNotFound { .. })
        ));
        assert!(matches!(
            slice_region("chr1", seq, 2, 4),
            Err(FerroError::ReferenceNotFound { .. })
        ));
        assert_eq!(slice_region("chr1", seq, 3, 5).unwrap(), "GT");
    }
}
