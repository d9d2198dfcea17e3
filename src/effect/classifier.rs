//! Consequence naming shared by the mutation operators.

use super::Consequence;
use crate::codon::{AminoAcid, CodonTable};
use crate::config::GeneModelConfig;
use crate::gene::Feature;

/// Outcome of retranslating after a frameshift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameshiftOutcome {
    /// First residue that differs from the original protein.
    pub aa_pos: u32,
    /// Original residue at `aa_pos` (empty past the original protein).
    pub aa_ref: Vec<AminoAcid>,
    /// New residue at `aa_pos` (empty if no full codon remains).
    pub aa_alt: Vec<AminoAcid>,
    /// Residues to the new stop counting `aa_pos` as 1.
    pub stop_dist: Option<u32>,
}

/// Names the consequence of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectClassifier {
    splice_window: u32,
    far_splice_window: u32,
    readthrough_utr: bool,
}

impl Default for EffectClassifier {
    fn default() -> Self {
        Self::new(&GeneModelConfig::default())
    }
}

impl EffectClassifier {
    /// Create a classifier using the windows in `config`.
    pub fn new(config: &GeneModelConfig) -> Self {
        Self {
            splice_window: config.splice_window,
            far_splice_window: config.far_splice_window,
            readthrough_utr: config.readthrough_utr,
        }
    }

    /// Classify a single-codon change.
    ///
    /// Checks run in order: unchanged residue, new stop, lost stop, start
    /// codon, then missense.
    pub fn classify_codon_change(
        &self,
        ref_aa: AminoAcid,
        alt_aa: AminoAcid,
        aa_pos: u32,
    ) -> Consequence {
        if ref_aa == alt_aa {
            Consequence::Silent
        } else if alt_aa.is_stop() {
            Consequence::Nonsense
        } else if ref_aa.is_stop() {
            Consequence::DisruptStop
        } else if aa_pos == 0 {
            Consequence::DisruptStart
        } else {
            Consequence::Missense
        }
    }

    /// Classify an intronic edit by its distance to the nearest coding base.
    pub fn classify_intronic(&self, offset: i64) -> Consequence {
        let distance = offset.unsigned_abs();
        if distance <= u64::from(self.splice_window) {
            Consequence::Splice
        } else if distance <= u64::from(self.far_splice_window) {
            Consequence::FarSplice
        } else {
            Consequence::Intronic
        }
    }

    /// Classify an edit outside the CDS.
    ///
    /// Every non-coding edit goes through the splice windows first. Past the
    /// far-splice window UTR edits are named by their UTR and intronic ones
    /// are `Intronic`; the same holds when there is no coding base to
    /// measure against.
    pub fn classify_noncoding(&self, feature: Feature, offset: Option<i64>) -> Consequence {
        let near = offset
            .map(|offset| self.classify_intronic(offset))
            .filter(|c| *c != Consequence::Intronic);
        match (near, feature) {
            (Some(consequence), _) => consequence,
            (None, Feature::FivePrimeUtr) => Consequence::FivePrimeUtr,
            (None, Feature::ThreePrimeUtr) => Consequence::ThreePrimeUtr,
            (None, Feature::Intron | Feature::Coding(_)) => Consequence::Intronic,
        }
    }

    /// Frame class of a coding indel with net length change `net`.
    pub fn classify_indel_frame(&self, net: i64) -> Consequence {
        if net % 3 != 0 {
            Consequence::Frameshift
        } else if net > 0 {
            Consequence::InFrameInsertion
        } else {
            Consequence::InFrameDeletion
        }
    }

    /// Retranslate after a frameshift.
    ///
    /// Translation starts at codon `first_codon` of the edited coding
    /// sequence (which begins at `coding_start` in `cdna`) and runs until a
    /// stop codon or the end of the available sequence: the end of the CDS
    /// at `coding_end`, or the end of the cDNA when 3'UTR read-through is
    /// enabled. Leading residues identical to `old_protein` are skipped so
    /// that `aa_pos` is the first real divergence.
    pub fn frameshift(
        &self,
        table: &CodonTable,
        old_protein: &[AminoAcid],
        cdna: &str,
        coding_start: usize,
        coding_end: usize,
        first_codon: usize,
    ) -> FrameshiftOutcome {
        let limit = if self.readthrough_utr {
            cdna.len()
        } else {
            coding_end.min(cdna.len())
        };

        let mut translated = Vec::new();
        let mut stop_index = None;
        let mut i = coding_start + first_codon * 3;
        while i + 3 <= limit {
            let aa = table.translate_codon(&cdna[i..i + 3]);
            translated.push(aa);
            if aa.is_stop() {
                stop_index = Some(translated.len() - 1);
                break;
            }
            i += 3;
        }

        let mut skip = 0;
        while skip + 1 < translated.len()
            && old_protein.get(first_codon + skip) == Some(&translated[skip])
        {
            skip += 1;
        }

        let aa_pos = first_codon + skip;
        FrameshiftOutcome {
            aa_pos: aa_pos as u32,
            aa_ref: old_protein.get(aa_pos).copied().into_iter().collect(),
            aa_alt: translated.get(skip).copied().into_iter().collect(),
            stop_dist: stop_index.map(|s| (s - skip + 1) as u32),
        }
    }

    /// Residues touched by an in-frame edit.
    ///
    /// `old_span` and `new_span` are the affected codons of the coding
    /// sequence before and after the edit, both starting at codon
    /// `first_codon`. When the edit starts mid-codon and the first residue
    /// survives, that residue is dropped from both sides and the reported
    /// position moves one residue on.
    pub fn in_frame_change(
        &self,
        table: &CodonTable,
        old_span: &str,
        new_span: &str,
        first_codon: usize,
        mid_codon: bool,
    ) -> (u32, Vec<AminoAcid>, Vec<AminoAcid>) {
        let mut aa_ref = table.translate(old_span);
        let mut aa_alt = table.translate(new_span);
        let mut aa_pos = first_codon;

        if mid_codon && !aa_ref.is_empty() && aa_ref.first() == aa_alt.first() {
            aa_ref.remove(0);
            aa_alt.remove(0);
            aa_pos += 1;
        }

        (aa_pos as u32, aa_ref, aa_alt)
    }
}
