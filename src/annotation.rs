//! Transcript annotation input
//!
//! # Coordinate System
//!
//! All coordinates in this module are **1-based inclusive**, as produced by
//! GTF/GFF readers:
//!
//! | Field | Basis | Notes |
//! |-------|-------|-------|
//! | `GenomicRange.start`, `GenomicRange.end` | 1-based | Reference coordinates (inclusive) |
//! | `ExonAnnotation.range` | 1-based | Whole exon |
//! | `ExonAnnotation.cds`, `utr5`, `utr3` | 1-based | Sub-ranges nested in the exon |
//!
//! Gene models built from these annotations use 0-based gene-local indices;
//! see [`crate::gene`].

use crate::error::FerroError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// Whether this is the forward strand
    pub fn is_plus(&self) -> bool {
        matches!(self, Strand::Plus)
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// A 1-based closed genomic range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicRange {
    /// First base (1-based, inclusive)
    pub start: u64,
    /// Last base (1-based, inclusive)
    pub end: u64,
}

impl GenomicRange {
    /// Create a new range
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bases covered
    pub fn len(&self) -> u64 {
        if self.end >= self.start {
            self.end - self.start + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies completely within this range
    pub fn contains_range(&self, other: &GenomicRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one base
    pub fn overlaps(&self, other: &GenomicRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Convert to a 0-based half-open `(start, end)` pair
    pub fn to_zero_based_half_open(self) -> (u64, u64) {
        (self.start.saturating_sub(1), self.end)
    }
}

/// An exon with its optional coding and untranslated sub-ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExonAnnotation {
    /// Whole exon
    pub range: GenomicRange,
    /// Coding part of the exon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cds: Option<GenomicRange>,
    /// 5' untranslated part of the exon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utr5: Option<GenomicRange>,
    /// 3' untranslated part of the exon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utr3: Option<GenomicRange>,
}

impl ExonAnnotation {
    /// A non-coding exon
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            range: GenomicRange::new(start, end),
            cds: None,
            utr5: None,
            utr3: None,
        }
    }

    /// Set the coding sub-range
    pub fn with_cds(mut self, start: u64, end: u64) -> Self {
        self.cds = Some(GenomicRange::new(start, end));
        self
    }

    /// Set the 5'UTR sub-range
    pub fn with_utr5(mut self, start: u64, end: u64) -> Self {
        self.utr5 = Some(GenomicRange::new(start, end));
        self
    }

    /// Set the 3'UTR sub-range
    pub fn with_utr3(mut self, start: u64, end: u64) -> Self {
        self.utr3 = Some(GenomicRange::new(start, end));
        self
    }

    /// Coding bases in this exon
    pub fn cds_length(&self) -> u64 {
        self.cds.map(|r| r.len()).unwrap_or(0)
    }
}

/// One transcript isoform as read from a GTF/GFF file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptAnnotation {
    /// Transcript accession (e.g., "ENST00000357654")
    pub id: String,
    /// Gene symbol (e.g., "BRCA1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,
    /// Chromosome name (e.g., "chr17")
    pub chromosome: String,
    /// Strand orientation
    pub strand: Strand,
    /// Exons in any order; they are sorted into transcript order on build
    pub exons: Vec<ExonAnnotation>,
}

impl TranscriptAnnotation {
    /// Create a new annotation
    pub fn new(
        id: impl Into<String>,
        chromosome: impl Into<String>,
        strand: Strand,
        exons: Vec<ExonAnnotation>,
    ) -> Self {
        Self {
            id: id.into(),
            gene_symbol: None,
            chromosome: chromosome.into(),
            strand,
            exons,
        }
    }

    /// Set the gene symbol
    pub fn with_gene_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.gene_symbol = Some(symbol.into());
        self
    }

    /// Total number of coding bases
    pub fn cds_length(&self) -> u64 {
        self.exons.iter().map(|e| e.cds_length()).sum()
    }

    /// Genomic span covered by the exons (1-based closed)
    pub fn span(&self) -> Option<GenomicRange> {
        let start = self.exons.iter().map(|e| e.range.start).min()?;
        let end = self.exons.iter().map(|e| e.range.end).max()?;
        Some(GenomicRange::new(start, end))
    }

    /// Exons ordered 5' to 3' along the transcript
    pub fn exons_in_transcript_order(&self) -> Vec<&ExonAnnotation> {
        let mut exons: Vec<&ExonAnnotation> = self.exons.iter().collect();
        exons.sort_by_key(|e| e.range.start);
        if self.strand == Strand::Minus {
            exons.reverse();
        }
        exons
    }

    /// Check the structural constraints a gene model relies on
    pub fn validate(&self) -> Result<(), FerroError> {
        let invalid = |msg: String| FerroError::InvalidAnnotation { msg };

        if self.exons.is_empty() {
            return Err(invalid(format!("transcript {} has no exons", self.id)));
        }

        for exon in &self.exons {
            let r = exon.range;
            if r.start == 0 || r.is_empty() {
                return Err(invalid(format!(
                    "transcript {} has an empty or zero-based exon {}-{}",
                    self.id, r.start, r.end
                )));
            }
            for sub in [exon.cds, exon.utr5, exon.utr3].into_iter().flatten() {
                if sub.is_empty() || !r.contains_range(&sub) {
                    return Err(invalid(format!(
                        "transcript {}: sub-range {}-{} not within exon {}-{}",
                        self.id, sub.start, sub.end, r.start, r.end
                    )));
                }
            }
        }

        let mut sorted: Vec<&ExonAnnotation> = self.exons.iter().collect();
        sorted.sort_by_key(|e| e.range.start);
        if let Some(pair) = sorted.windows(2).find(|w| w[0].range.overlaps(&w[1].range)) {
            return Err(invalid(format!(
                "transcript {}: exons {}-{} and {}-{} overlap",
                self.id, pair[0].range.start, pair[0].range.end, pair[1].range.start, pair[1].range.end
            )));
        }

        if self.cds_length() == 0 {
            return Err(invalid(format!("transcript {} has no CDS", self.id)));
        }

        Ok(())
    }

    /// Parse annotations from a JSON array
    pub fn from_json(content: &str) -> Result<Vec<Self>, FerroError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load annotations from a JSON file
    pub fn load_json(path: &Path) -> Result<Vec<Self>, FerroError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Pick the isoform with the longest CDS; ties go to the first supplied.
pub fn select_longest_cds(isoforms: &[TranscriptAnnotation]) -> Option<&TranscriptAnnotation> {
    let mut best: Option<&TranscriptAnnotation> = None;
    for isoform in isoforms {
        match best {
            Some(b) if isoform.cds_length() <= b.cds_length() => {
                if isoform.cds_length() == b.cds_length() {
                    log::warn!(
                        "Isoforms {} and {} have equal CDS length {}; keeping {}",
                        b.id,
                        isoform.id,
                        b.cds_length(),
                        b.id
                    );
                }
            }
            _ => best = Some(isoform),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_exon_annotation(strand: Strand) -> TranscriptAnnotation {
        TranscriptAnnotation::new(
            "TX1",
            "chr1",
            strand,
            vec![
                ExonAnnotation::new(11, 20).with_utr5(11, 14).with_cds(15, 20),
                ExonAnnotation::new(31, 40).with_cds(31, 36).with_utr3(37, 40),
            ],
        )
    }

    #[test]
    fn test_genomic_range_len() {
        assert_eq!(GenomicRange::new(1, 1).len(), 1);
        assert_eq!(GenomicRange::new(5, 10).len(), 6);
        assert!(GenomicRange::new(10, 5).is_empty());
        assert_eq!(GenomicRange::new(5, 10).to_zero_based_half_open(), (4, 10));
    }

    #[test]
    fn test_cds_length_and_span() {
        let tx = two_exon_annotation(Strand::Plus);
        assert_eq!(tx.cds_length(), 12);
        assert_eq!(tx.span(), Some(GenomicRange::new(11, 40)));
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_transcript_order_minus_strand() {
        let tx = two_exon_annotation(Strand::Minus);
        let order: Vec<u64> = tx
            .exons_in_transcript_order()
            .iter()
            .map(|e| e.range.start)
            .collect();
        assert_eq!(order, vec![31, 11]);
    }

    #[test]
    fn test_validate_rejects_sub_range_outside_exon() {
        let tx = TranscriptAnnotation::new(
            "BAD",
            "chr1",
            Strand::Plus,
            vec![ExonAnnotation::new(10, 20).with_cds(15, 25)],
        );
        assert!(matches!(
            tx.validate(),
            Err(FerroError::InvalidAnnotation { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overlapping_exons() {
        let tx = TranscriptAnnotation::new(
            "BAD",
            "chr1",
            Strand::Plus,
            vec![
                ExonAnnotation::new(10, 20).with_cds(10, 20),
                ExonAnnotation::new(18, 30).with_cds(21, 30),
            ],
        );
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_noncoding() {
        let tx = TranscriptAnnotation::new(
            "NC",
            "chr1",
            Strand::Plus,
            vec![ExonAnnotation::new(10, 20)],
        );
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_select_longest_cds() {
        let short = TranscriptAnnotation::new(
            "SHORT",
            "chr1",
            Strand::Plus,
            vec![ExonAnnotation::new(1, 10).with_cds(1, 6)],
        );
        let long = two_exon_annotation(Strand::Plus);
        let isoforms = vec![short, long];
        assert_eq!(select_longest_cds(&isoforms).unwrap().id, "TX1");
        assert!(select_longest_cds(&[]).is_none());
    }

    #[test]
    fn test_json_roundtrip_strand_symbols() {
        let json = r#"[{
            "id": "TX2",
            "chromosome": "chr2",
            "strand": "-",
            "exons": [{"range": {"start": 5, "end": 9}, "cds": {"start": 5, "end": 7}}]
        }]"#;
        let parsed = TranscriptAnnotation::from_json(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].strand, Strand::Minus);
        assert_eq!(parsed[0].exons[0].cds, Some(GenomicRange::new(5, 7)));
        assert!(parsed[0].exons[0].utr5.is_none());
    }
}
