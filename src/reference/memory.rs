//! In-memory reference for tests and small inputs

use crate::error::FerroError;
use crate::reference::provider::{slice_region, ReferenceBases};
use std::collections::HashMap;

/// Chromosome-name to sequence map
#[derive(Debug, Clone, Default)]
pub struct InMemoryReference {
    chromosomes: HashMap<String, String>,
}

impl InMemoryReference {
    /// Create an empty reference
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a chromosome sequence
    pub fn add_chromosome(&mut self, name: impl Into<String>, sequence: impl Into<String>) {
        self.chromosomes.insert(name.into(), sequence.into());
    }

    /// Builder-style variant of [`InMemoryReference::add_chromosome`]
    pub fn with_chromosome(mut self, name: impl Into<String>, sequence: impl Into<String>) -> Self {
        self.add_chromosome(name, sequence);
        self
    }

    /// Load chromosomes from a JSON object of `name -> sequence`
    pub fn from_json(content: &str) -> Result<Self, FerroError> {
        let chromosomes: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self { chromosomes })
    }

    /// Get the number of chromosomes
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Check if the reference is empty
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }
}

impl ReferenceBases for InMemoryReference {
    fn bases(&self, chrom: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let seq = self
            .chromosomes
            .get(chrom)
            .ok_or_else(|| FerroError::ReferenceNotFound {
                id: chrom.to_string(),
            })?;
        slice_region(chrom, seq, start, end)
    }

    fn has_chromosome(&self, chrom: &str) -> bool {
        self.chromosomes.contains_key(chrom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_reference() {
        let reference = InMemoryReference::new().with_chromosome("chrM", "GATCACAGGT");
        assert_eq!(reference.len(), 1);
        assert_eq!(reference.bases("chrM", 2, 5).unwrap(), "TCA");
        assert!(reference.bases("chrM", 8, 11).is_err());
        assert!(!reference.has_chromosome("chr1"));
    }

    #[test]
    fn test_non_ascii_region_is_an_error() {
        let reference = InMemoryReference::new().with_chromosome("chr1", "ACñGT");
        assert!(matches!(
            reference.bases("chr1", 0, 3),
            Err(FerroError::ReferenceNotFound { .. })
        ));
        assert_eq!(reference.bases("chr1", 4, 6).unwrap(), "GT");
    }

    #[test]
    fn test_from_json() {
        let reference = InMemoryReference::from_json(r#"{"chr1": "ACGT", "chr2": "ttaa"}"#).unwrap();
        assert_eq!(reference.len(), 2);
        assert_eq!(reference.bases("chr2", 0, 4).unwrap(), "TTAA");
        assert!(InMemoryReference::from_json("not json").is_err());
    }
}
