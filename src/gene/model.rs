//! The gene model data structure.
//!
//! A [`Gene`] keeps one transcript in three synchronized coordinate spaces:
//!
//! | Space | Storage | Index |
//! |-------|---------|-------|
//! | Genomic | `genome_seq`, `features` | gene-local, 0-based, 5'→3' |
//! | cDNA | `cdna_seq` | 0-based over 5'UTR + CDS + 3'UTR |
//! | Coding | `coding` view, `Feature::Coding(k)` | 0-based within the CDS |
//!
//! Absolute reference positions are converted with [`Gene::local_index`];
//! on the minus strand the local index runs from the highest reference
//! coordinate downwards.

use crate::annotation::Strand;
use crate::codon::{complement, AminoAcid, CodonTable};
use crate::effect::{EffectClassifier, EffectPrediction};
use crate::error::FerroError;
use crate::gene::mapper::{CdsOffset, CoordinateMapper};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Role of one base of the genomic span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Between exons.
    Intron,
    /// Exonic, upstream of the CDS.
    FivePrimeUtr,
    /// Exonic, downstream of the CDS.
    ThreePrimeUtr,
    /// Coding base at this 0-based position of the CDS.
    Coding(u32),
}

impl Feature {
    /// Whether the base is part of the CDS.
    pub fn is_coding(&self) -> bool {
        matches!(self, Feature::Coding(_))
    }

    /// Whether the base is in either UTR.
    pub fn is_utr(&self) -> bool {
        matches!(self, Feature::FivePrimeUtr | Feature::ThreePrimeUtr)
    }

    /// Whether the base is part of the spliced transcript.
    pub fn is_exonic(&self) -> bool {
        !matches!(self, Feature::Intron)
    }

    /// Position within the CDS, for coding bases.
    pub fn coding_index(&self) -> Option<u32> {
        match self {
            Feature::Coding(k) => Some(*k),
            _ => None,
        }
    }
}

/// Half-open window `[start, end)` into the cDNA.
///
/// Only the bounds are stored; the sequence is always read from the live
/// cDNA so it cannot drift out of sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeqView {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl SeqView {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// First cDNA index covered.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last cDNA index covered.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of bases covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the view covers no bases.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The bounds as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The covered part of `cdna`.
    pub fn slice<'a>(&self, cdna: &'a str) -> &'a str {
        &cdna[self.start..self.end]
    }

    pub(crate) fn shift(&mut self, by: usize) {
        self.start += by;
        self.end += by;
    }
}

/// One reversible edit.
///
/// Positions are absolute 0-based reference coordinates and bases are
/// given in reference (plus-strand) orientation regardless of the gene's
/// strand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeLogEntry {
    /// One base replaced by another.
    Substitution { pos: u64, from: char, to: char },
    /// Bases inserted after `pos` or deleted starting at `pos`.
    Indel {
        pos: u64,
        removed: String,
        added: String,
    },
}

impl ChangeLogEntry {
    /// Reference position of the edit.
    pub fn pos(&self) -> u64 {
        match self {
            ChangeLogEntry::Substitution { pos, .. } | ChangeLogEntry::Indel { pos, .. } => *pos,
        }
    }

    /// Whether the entry is a single-base substitution.
    pub fn is_substitution(&self) -> bool {
        matches!(self, ChangeLogEntry::Substitution { .. })
    }
}

/// Everything an indel can change, captured once at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GeneSnapshot {
    pub(crate) start_pos: u64,
    pub(crate) cds_starts: Vec<usize>,
    pub(crate) cds_ends: Vec<usize>,
    pub(crate) genome_seq: String,
    pub(crate) cdna_seq: String,
    pub(crate) features: Vec<Feature>,
    pub(crate) utr_five: SeqView,
    pub(crate) coding: SeqView,
    pub(crate) utr_three: SeqView,
}

/// A single transcript and the edits applied to it.
///
/// Built with [`Gene::build`]; edited with [`Gene::substitute`],
/// [`Gene::insert`] and [`Gene::delete`]; reverted with [`Gene::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    pub(crate) id: String,
    pub(crate) chromosome: String,
    pub(crate) start_pos: u64,
    pub(crate) strand: Strand,
    pub(crate) cds_starts: Vec<usize>,
    pub(crate) cds_ends: Vec<usize>,
    pub(crate) genome_seq: String,
    pub(crate) cdna_seq: String,
    pub(crate) utr_five: SeqView,
    pub(crate) coding: SeqView,
    pub(crate) utr_three: SeqView,
    pub(crate) prot_seq: Vec<AminoAcid>,
    pub(crate) features: Vec<Feature>,
    pub(crate) change_log: Vec<ChangeLogEntry>,
    pub(crate) orig: Box<GeneSnapshot>,
    pub(crate) classifier: EffectClassifier,
}

impl Gene {
    /// Transcript identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chromosome the transcript lies on.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Reference coordinate of local index 0.
    pub fn start_pos(&self) -> u64 {
        self.start_pos
    }

    /// Transcript strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Whether the transcript is on the plus strand.
    pub fn is_plus_strand(&self) -> bool {
        self.strand.is_plus()
    }

    /// Local index of the first base of each coding exon.
    pub fn cds_starts(&self) -> &[usize] {
        &self.cds_starts
    }

    /// Local index of the last base of each coding exon.
    pub fn cds_ends(&self) -> &[usize] {
        &self.cds_ends
    }

    /// Genomic span in transcript orientation.
    pub fn genome_seq(&self) -> &str {
        &self.genome_seq
    }

    /// Spliced transcript.
    pub fn cdna_seq(&self) -> &str {
        &self.cdna_seq
    }

    /// 5'UTR bounds within the cDNA.
    pub fn utr_five(&self) -> SeqView {
        self.utr_five
    }

    /// CDS bounds within the cDNA.
    pub fn coding(&self) -> SeqView {
        self.coding
    }

    /// 3'UTR bounds within the cDNA.
    pub fn utr_three(&self) -> SeqView {
        self.utr_three
    }

    /// 5'UTR sequence.
    pub fn utr_five_seq(&self) -> &str {
        self.utr_five.slice(&self.cdna_seq)
    }

    /// Coding sequence.
    pub fn coding_seq(&self) -> &str {
        self.coding.slice(&self.cdna_seq)
    }

    /// 3'UTR sequence.
    pub fn utr_three_seq(&self) -> &str {
        self.utr_three.slice(&self.cdna_seq)
    }

    /// Translation of the current coding sequence.
    pub fn protein(&self) -> &[AminoAcid] {
        &self.prot_seq
    }

    /// Per-base roles, parallel to [`Gene::genome_seq`].
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Edits applied since construction or the last reset.
    pub fn change_log(&self) -> &[ChangeLogEntry] {
        &self.change_log
    }

    /// Length of the genomic span.
    pub fn len(&self) -> usize {
        self.genome_seq.len()
    }

    /// Whether the genomic span is empty (possible only after deletions).
    pub fn is_empty(&self) -> bool {
        self.genome_seq.is_empty()
    }

    /// Coordinate queries against the current state.
    pub fn mapper(&self) -> CoordinateMapper<'_> {
        CoordinateMapper::new(self)
    }

    /// Convert an absolute 0-based reference position to a local index.
    pub fn local_index(&self, pos: i64) -> Option<usize> {
        if pos < 0 {
            return None;
        }
        let start = self.start_pos as i64;
        let local = if self.is_plus_strand() {
            pos - start
        } else {
            start - pos
        };
        (local >= 0 && (local as usize) < self.genome_seq.len()).then_some(local as usize)
    }

    /// Convert a local index back to an absolute reference position.
    pub fn genomic_pos(&self, local: usize) -> u64 {
        if self.is_plus_strand() {
            self.start_pos + local as u64
        } else {
            self.start_pos - local as u64
        }
    }

    /// Check every structural invariant, describing the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.features.len() != self.genome_seq.len() {
            return Err(format!(
                "{} features for {} genome bases",
                self.features.len(),
                self.genome_seq.len()
            ));
        }
        if self.cds_starts.len() != self.cds_ends.len() {
            return Err(format!(
                "{} CDS starts but {} CDS ends",
                self.cds_starts.len(),
                self.cds_ends.len()
            ));
        }
        if self.utr_five.start != 0
            || self.utr_five.end != self.coding.start
            || self.coding.end != self.utr_three.start
            || self.utr_three.end != self.cdna_seq.len()
        {
            return Err(format!(
                "views {:?} {:?} {:?} do not tile cDNA of length {}",
                self.utr_five,
                self.coding,
                self.utr_three,
                self.cdna_seq.len()
            ));
        }

        let genome = self.genome_seq.as_bytes();
        let mut spliced = String::with_capacity(self.cdna_seq.len());
        let mut next_coding = 0;
        for (i, feature) in self.features.iter().enumerate() {
            if let Feature::Coding(k) = feature {
                if *k != next_coding {
                    return Err(format!("local {i} has coding index {k}, expected {next_coding}"));
                }
                next_coding += 1;
                if !self.cds_starts.iter().zip(&self.cds_ends).any(|(s, e)| (*s..=*e).contains(&i)) {
                    return Err(format!("coding base at local {i} is outside every CDS exon"));
                }
            }
            if feature.is_exonic() {
                spliced.push(genome[i] as char);
            }
        }
        if next_coding as usize != self.coding.len() {
            return Err(format!(
                "{next_coding} coding features but coding view has {} bases",
                self.coding.len()
            ));
        }
        if spliced != self.cdna_seq {
            return Err("cDNA does not match the exonic genome bases".to_string());
        }
        Ok(())
    }

    pub(crate) fn snapshot(&self) -> GeneSnapshot {
        GeneSnapshot {
            start_pos: self.start_pos,
            cds_starts: self.cds_starts.clone(),
            cds_ends: self.cds_ends.clone(),
            genome_seq: self.genome_seq.clone(),
            cdna_seq: self.cdna_seq.clone(),
            features: self.features.clone(),
            utr_five: self.utr_five,
            coding: self.coding,
            utr_three: self.utr_three,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: &GeneSnapshot) {
        self.start_pos = snapshot.start_pos;
        self.cds_starts.clone_from(&snapshot.cds_starts);
        self.cds_ends.clone_from(&snapshot.cds_ends);
        self.genome_seq.clone_from(&snapshot.genome_seq);
        self.cdna_seq.clone_from(&snapshot.cdna_seq);
        self.features.clone_from(&snapshot.features);
        self.utr_five = snapshot.utr_five;
        self.coding = snapshot.coding;
        self.utr_three = snapshot.utr_three;
    }

    pub(crate) fn retranslate(&mut self) {
        self.prot_seq = CodonTable::shared().translate(self.coding_seq());
    }

    /// Local index for `pos`, or an `OutOfRange` error.
    pub(crate) fn require_local(&self, pos: i64) -> Result<usize, FerroError> {
        if pos < 0 {
            return Err(FerroError::out_of_range(pos, "position is negative"));
        }
        self.local_index(pos).ok_or_else(|| {
            FerroError::out_of_range(
                pos,
                format!(
                    "outside {} ({} bases from {} on {} strand)",
                    self.id,
                    self.genome_seq.len(),
                    self.start_pos,
                    self.strand
                ),
            )
        })
    }

    /// Number of exonic bases before `local`, i.e. its cDNA index when exonic.
    pub(crate) fn exonic_before(&self, local: usize) -> usize {
        self.features[..local]
            .iter()
            .filter(|f| f.is_exonic())
            .count()
    }

    /// Overwrite one base (transcript orientation), mirroring exonic bases
    /// into the cDNA.
    pub(crate) fn write_base(&mut self, local: usize, base: char) {
        let mut buf = [0u8; 4];
        let encoded: &str = base.encode_utf8(&mut buf);
        let cdna_index = self.mapper().cdna_index(local);
        self.genome_seq.replace_range(local..=local, encoded);
        if let Some(ci) = cdna_index {
            self.cdna_seq.replace_range(ci..=ci, encoded);
        }
    }

    /// Convert transcript-orientation bases to reference orientation.
    pub(crate) fn to_reference_orientation(&self, bases: &str) -> String {
        if self.is_plus_strand() {
            bases.to_string()
        } else {
            bases.chars().rev().map(complement).collect()
        }
    }

    /// Prediction for an edit outside the CDS.
    pub(crate) fn noncoding_prediction(
        &self,
        feature: Feature,
        nearest: Option<CdsOffset>,
    ) -> EffectPrediction {
        let consequence = self
            .classifier
            .classify_noncoding(feature, nearest.map(|n| n.offset));
        match nearest {
            Some(n) => EffectPrediction::new(consequence, n.cds_pos, n.offset),
            None => EffectPrediction::new(consequence, 0, 0),
        }
    }

    /// Turn a frameshift prediction without a stop into `NoStopFound`.
    ///
    /// Called after the edit has been fully applied and logged.
    pub(crate) fn finish_frameshift(
        &self,
        prediction: EffectPrediction,
    ) -> Result<EffectPrediction, FerroError> {
        if prediction.stop_dist.is_some() {
            return Ok(prediction);
        }
        log::warn!(
            "Frameshift in {} at amino acid {} reached the end of the transcript without a stop codon",
            self.id,
            prediction.aa_pos.unwrap_or_default()
        );
        Err(FerroError::NoStopFound {
            prediction: Box::new(prediction),
        })
    }
}
