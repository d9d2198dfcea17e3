//! Functional consequence of edits applied to a gene model.
//!
//! Every mutation operator on [`crate::gene::Gene`] returns an
//! [`EffectPrediction`]; the naming logic shared by all operators lives in
//! [`EffectClassifier`].
//!
//! # Example
//!
//! ```
//! use ferro_genemodel::codon::AminoAcid;
//! use ferro_genemodel::effect::{Consequence, EffectClassifier, Impact};
//!
//! let classifier = EffectClassifier::default();
//! let consequence = classifier.classify_codon_change(AminoAcid::Pro, AminoAcid::Gln, 1);
//!
//! assert_eq!(consequence, Consequence::Missense);
//! assert_eq!(consequence.impact(), Impact::Moderate);
//! ```

mod classifier;

pub use classifier::{EffectClassifier, FrameshiftOutcome};

use crate::codon::AminoAcid;
use serde::{Deserialize, Serialize};

/// Consequence of a single edit on the modelled transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consequence {
    /// Codon changed, amino acid unchanged.
    Silent,
    /// Amino acid substitution.
    Missense,
    /// Premature stop codon introduced.
    Nonsense,
    /// The initiator codon was changed.
    DisruptStart,
    /// The stop codon was changed to a sense codon.
    DisruptStop,
    /// Coding indel whose length is not a multiple of 3.
    Frameshift,
    /// Coding insertion whose length is a multiple of 3.
    InFrameInsertion,
    /// Coding deletion whose length is a multiple of 3.
    InFrameDeletion,
    /// Intronic edit within the splice window of a coding base.
    Splice,
    /// Intronic edit within the far splice window of a coding base.
    FarSplice,
    /// Intronic edit away from any splice site.
    Intronic,
    /// Edit in the 5' UTR.
    FivePrimeUtr,
    /// Edit in the 3' UTR.
    ThreePrimeUtr,
    /// Every coding base was removed.
    TranscriptAblation,
}

impl Consequence {
    /// Get the Sequence Ontology term.
    pub fn so_term(&self) -> &'static str {
        match self {
            Consequence::Silent => "synonymous_variant",
            Consequence::Missense => "missense_variant",
            Consequence::Nonsense => "stop_gained",
            Consequence::DisruptStart => "start_lost",
            Consequence::DisruptStop => "stop_lost",
            Consequence::Frameshift => "frameshift_variant",
            Consequence::InFrameInsertion => "inframe_insertion",
            Consequence::InFrameDeletion => "inframe_deletion",
            Consequence::Splice => "splice_site_variant",
            Consequence::FarSplice => "splice_region_variant",
            Consequence::Intronic => "intron_variant",
            Consequence::FivePrimeUtr => "5_prime_UTR_variant",
            Consequence::ThreePrimeUtr => "3_prime_UTR_variant",
            Consequence::TranscriptAblation => "transcript_ablation",
        }
    }

    /// Get the Sequence Ontology ID.
    pub fn so_id(&self) -> &'static str {
        match self {
            Consequence::Silent => "SO:0001819",
            Consequence::Missense => "SO:0001583",
            Consequence::Nonsense => "SO:0001587",
            Consequence::DisruptStart => "SO:0002012",
            Consequence::DisruptStop => "SO:0001578",
            Consequence::Frameshift => "SO:0001589",
            Consequence::InFrameInsertion => "SO:0001821",
            Consequence::InFrameDeletion => "SO:0001822",
            Consequence::Splice => "SO:0001629",
            Consequence::FarSplice => "SO:0001630",
            Consequence::Intronic => "SO:0001627",
            Consequence::FivePrimeUtr => "SO:0001623",
            Consequence::ThreePrimeUtr => "SO:0001624",
            Consequence::TranscriptAblation => "SO:0001893",
        }
    }

    /// Get the impact level of this consequence.
    pub fn impact(&self) -> Impact {
        match self {
            Consequence::TranscriptAblation
            | Consequence::Splice
            | Consequence::Nonsense
            | Consequence::Frameshift
            | Consequence::DisruptStop
            | Consequence::DisruptStart => Impact::High,

            Consequence::Missense
            | Consequence::InFrameInsertion
            | Consequence::InFrameDeletion => Impact::Moderate,

            Consequence::FarSplice | Consequence::Silent => Impact::Low,

            Consequence::FivePrimeUtr | Consequence::ThreePrimeUtr | Consequence::Intronic => {
                Impact::Modifier
            }
        }
    }

    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Consequence::Silent => "Silent change (same amino acid)",
            Consequence::Missense => "Amino acid substitution",
            Consequence::Nonsense => "Premature stop codon introduced",
            Consequence::DisruptStart => "Start codon changed",
            Consequence::DisruptStop => "Stop codon changed to amino acid",
            Consequence::Frameshift => "Frameshift causing protein truncation or extension",
            Consequence::InFrameInsertion => "In-frame amino acid insertion",
            Consequence::InFrameDeletion => "In-frame amino acid deletion",
            Consequence::Splice => "Variant at a splice site",
            Consequence::FarSplice => "Variant in splice region",
            Consequence::Intronic => "Variant in intron",
            Consequence::FivePrimeUtr => "Variant in 5' UTR",
            Consequence::ThreePrimeUtr => "Variant in 3' UTR",
            Consequence::TranscriptAblation => "Complete coding sequence deletion",
        }
    }

    /// Whether the consequence changes the encoded protein.
    pub fn is_protein_altering(&self) -> bool {
        matches!(
            self,
            Consequence::Missense
                | Consequence::Nonsense
                | Consequence::DisruptStart
                | Consequence::DisruptStop
                | Consequence::Frameshift
                | Consequence::InFrameInsertion
                | Consequence::InFrameDeletion
                | Consequence::TranscriptAblation
        )
    }
}

impl std::fmt::Display for Consequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.so_term())
    }
}

/// Variant impact level (VEP-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// Modifier - minimal predicted impact.
    Modifier,
    /// Low impact.
    Low,
    /// Moderate impact.
    Moderate,
    /// High impact (likely deleterious).
    High,
}

impl Impact {
    /// Get the impact as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Moderate => "MODERATE",
            Impact::Low => "LOW",
            Impact::Modifier => "MODIFIER",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Effect of one edit.
///
/// Positions are 0-based: `cdna_pos` indexes the coding sequence and
/// `aa_pos` the protein. For non-coding edits `cdna_pos` is the nearest
/// coding base and `cdna_dist` the signed distance to it (negative when the
/// edit lies upstream).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectPrediction {
    /// Consequence class.
    pub consequence: Consequence,
    /// Coding position of (or nearest to) the edit.
    pub cdna_pos: u32,
    /// Signed distance from `cdna_pos`; 0 inside the CDS.
    pub cdna_dist: i64,
    /// First affected residue.
    pub aa_pos: Option<u32>,
    /// Reference residues at `aa_pos`.
    pub aa_ref: Vec<AminoAcid>,
    /// Alternate residues at `aa_pos`.
    pub aa_alt: Vec<AminoAcid>,
    /// Residues from `aa_pos` to the new stop, counting `aa_pos` as 1.
    ///
    /// Only set for frameshifts; `None` there means no stop was found.
    pub stop_dist: Option<u32>,
}

impl EffectPrediction {
    /// Create a prediction without amino acid details.
    pub fn new(consequence: Consequence, cdna_pos: u32, cdna_dist: i64) -> Self {
        Self {
            consequence,
            cdna_pos,
            cdna_dist,
            aa_pos: None,
            aa_ref: Vec::new(),
            aa_alt: Vec::new(),
            stop_dist: None,
        }
    }

    /// Attach the amino acid change.
    pub fn with_amino_acids(
        mut self,
        aa_pos: u32,
        aa_ref: Vec<AminoAcid>,
        aa_alt: Vec<AminoAcid>,
    ) -> Self {
        self.aa_pos = Some(aa_pos);
        self.aa_ref = aa_ref;
        self.aa_alt = aa_alt;
        self
    }

    /// Attach the distance to the new stop codon.
    pub fn with_stop_dist(mut self, stop_dist: Option<u32>) -> Self {
        self.stop_dist = stop_dist;
        self
    }

    /// Impact of the consequence.
    pub fn impact(&self) -> Impact {
        self.consequence.impact()
    }

    /// Check if this is a high-impact edit.
    pub fn is_high_impact(&self) -> bool {
        self.impact() == Impact::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consequence_impact() {
        assert_eq!(Consequence::Nonsense.impact(), Impact::High);
        assert_eq!(Consequence::Splice.impact(), Impact::High);
        assert_eq!(Consequence::Missense.impact(), Impact::Moderate);
        assert_eq!(Consequence::Silent.impact(), Impact::Low);
        assert_eq!(Consequence::FarSplice.impact(), Impact::Low);
        assert_eq!(Consequence::Intronic.impact(), Impact::Modifier);
    }

    #[test]
    fn test_consequence_so_terms() {
        assert_eq!(Consequence::Missense.so_term(), "missense_variant");
        assert_eq!(Consequence::Missense.so_id(), "SO:0001583");
        assert_eq!(Consequence::Frameshift.to_string(), "frameshift_variant");
    }

    #[test]
    fn test_protein_altering() {
        assert!(Consequence::Frameshift.is_protein_altering());
        assert!(Consequence::DisruptStart.is_protein_altering());
        assert!(!Consequence::Silent.is_protein_altering());
        assert!(!Consequence::Splice.is_protein_altering());
    }

    #[test]
    fn test_prediction_builders() {
        let prediction = EffectPrediction::new(Consequence::Frameshift, 4, 0)
            .with_amino_acids(1, vec![AminoAcid::Pro], vec![AminoAcid::His])
            .with_stop_dist(Some(3));

        assert_eq!(prediction.aa_pos, Some(1));
        assert_eq!(prediction.aa_ref, vec![AminoAcid::Pro]);
        assert_eq!(prediction.stop_dist, Some(3));
        assert!(prediction.is_high_impact());
    }

    #[test]
    fn test_prediction_serializes() {
        let prediction = EffectPrediction::new(Consequence::Splice, 2, 1);
        let json = serde_json::to_string(&prediction).unwrap();
        assert!(json.contains("\"consequence\":\"Splice\""));
        assert!(json.contains("\"cdna_dist\":1"));
    }

    #[test]
    fn test_impact_ordering() {
        assert!(Impact::High > Impact::Moderate);
        assert!(Impact::Moderate > Impact::Low);
        assert!(Impact::Low > Impact::Modifier);
    }
}
