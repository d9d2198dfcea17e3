//! Deletions.

use super::model::{ChangeLogEntry, Feature, Gene};
use crate::codon::CodonTable;
use crate::effect::{Consequence, EffectPrediction};
use crate::error::FerroError;

/// How a coding exon relates to a deleted local range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExonOverlap {
    /// Exon ends before the deletion.
    Before,
    /// Exon starts after the deletion.
    After,
    /// Exon wholly deleted.
    Engulfed,
    /// Deletion wholly inside the exon.
    Contains,
    /// Deletion removes the right end of the exon.
    ClipsRight,
    /// Deletion removes the left end of the exon.
    ClipsLeft,
}

impl ExonOverlap {
    /// Classify exon `[cds_start, cds_end]` against deletion `[first, last]` (all inclusive).
    fn classify(cds_start: usize, cds_end: usize, first: usize, last: usize) -> Self {
        if cds_end < first {
            ExonOverlap::Before
        } else if cds_start > last {
            ExonOverlap::After
        } else if first <= cds_start && cds_end <= last {
            ExonOverlap::Engulfed
        } else if cds_start < first && last < cds_end {
            ExonOverlap::Contains
        } else if cds_start < first {
            ExonOverlap::ClipsRight
        } else {
            ExonOverlap::ClipsLeft
        }
    }
}

/// Bases removed from each region.
#[derive(Debug, Default)]
struct DeletedCounts {
    five_prime: usize,
    coding: usize,
    three_prime: usize,
    intronic: usize,
    first_coding: Option<usize>,
    first_utr: Option<Feature>,
}

impl DeletedCounts {
    fn tally(features: &[Feature]) -> Self {
        let mut counts = DeletedCounts::default();
        for feature in features {
            match feature {
                Feature::Intron => counts.intronic += 1,
                Feature::FivePrimeUtr => {
                    counts.five_prime += 1;
                    counts.first_utr.get_or_insert(*feature);
                }
                Feature::ThreePrimeUtr => {
                    counts.three_prime += 1;
                    counts.first_utr.get_or_insert(*feature);
                }
                Feature::Coding(k) => {
                    counts.coding += 1;
                    counts.first_coding.get_or_insert(*k as usize);
                }
            }
        }
        counts
    }

    fn exonic(&self) -> usize {
        self.five_prime + self.coding + self.three_prime
    }
}

impl Gene {
    /// Delete the reference interval `[start, end)`.
    ///
    /// The interval is clamped to the gene when it overlaps only partly;
    /// one lying wholly outside is rejected. A frameshift whose
    /// retranslation finds no stop codon is still applied, and reported as
    /// [`FerroError::NoStopFound`].
    pub fn delete(&mut self, start: i64, end: i64) -> Result<EffectPrediction, FerroError> {
        if start >= end {
            return Err(FerroError::InvalidInterval { start, end });
        }
        if start < 0 {
            return Err(FerroError::out_of_range(start, "position is negative"));
        }

        let (first, stop) = self.deleted_locals(start, end)?;
        let removed_len = stop - first;
        let ref_start = if self.is_plus_strand() {
            self.genomic_pos(first)
        } else {
            self.genomic_pos(stop - 1)
        };

        let counts = DeletedCounts::tally(&self.features[first..stop]);
        let nearest = if counts.coding == 0 {
            [first, stop - 1]
                .into_iter()
                .filter_map(|local| self.mapper().genomic_to_cds(local).ok())
                .min_by_key(|hit| hit.offset.unsigned_abs())
        } else {
            None
        };
        let old_span = counts
            .first_coding
            .filter(|_| counts.coding % 3 == 0)
            .map(|k0| {
                let coding = self.coding_seq();
                let span_end = (k0 + counts.coding).div_ceil(3) * 3;
                coding[k0 - k0 % 3..span_end.min(coding.len())].to_string()
            });

        // genome and features
        let cdna_start = self.exonic_before(first);
        let removed_tx = self.genome_seq[first..stop].to_string();
        self.genome_seq.replace_range(first..stop, "");
        self.features.drain(first..stop);
        for feature in &mut self.features[first..] {
            if let Feature::Coding(j) = feature {
                *j -= counts.coding as u32;
            }
        }
        let deleted_coding = self.excise_cds_bounds(first, stop);
        debug_assert_eq!(deleted_coding, counts.coding);

        // cDNA and views
        let excised = counts.exonic();
        self.cdna_seq
            .replace_range(cdna_start..cdna_start + excised, "");
        self.utr_five.end -= counts.five_prime;
        self.coding.start -= counts.five_prime;
        self.coding.end -= counts.five_prime + counts.coding;
        self.utr_three.start -= counts.five_prime + counts.coding;
        self.utr_three.end -= excised;

        let prediction = match counts.first_coding {
            Some(k0) => self.classify_coding_deletion(k0, counts.coding, old_span.as_deref()),
            None if counts.intronic > 0 && counts.exonic() > 0 => {
                let (cds_pos, offset) = nearest.map(|n| (n.cds_pos, n.offset)).unwrap_or((0, 0));
                EffectPrediction::new(Consequence::Splice, cds_pos, offset)
            }
            None => self.noncoding_prediction(counts.first_utr.unwrap_or(Feature::Intron), nearest),
        };

        if !self.is_plus_strand() {
            self.start_pos = self.start_pos.saturating_sub(removed_len as u64);
        }
        let removed = self.to_reference_orientation(&removed_tx);
        self.change_log.push(ChangeLogEntry::Indel {
            pos: ref_start,
            removed,
            added: String::new(),
        });
        self.retranslate();

        log::debug!(
            "{}: deletion of {} bases at {} ({} coding) is {}",
            self.id,
            removed_len,
            ref_start,
            counts.coding,
            prediction.consequence
        );
        match prediction.consequence {
            Consequence::Frameshift => self.finish_frameshift(prediction),
            _ => Ok(prediction),
        }
    }

    /// Local range `[first, stop)` covered by the reference interval, clamped to the gene.
    fn deleted_locals(&self, start: i64, end: i64) -> Result<(usize, usize), FerroError> {
        let len = self.genome_seq.len() as i64;
        let anchor = self.start_pos as i64;
        let (lo, hi) = if self.is_plus_strand() {
            (start - anchor, end - anchor)
        } else {
            (anchor - end + 1, anchor - start + 1)
        };

        let (first, stop) = (lo.max(0), hi.min(len));
        if first >= stop {
            return Err(FerroError::out_of_range(
                start,
                format!("deletion {start}-{end} lies outside {}", self.id),
            ));
        }
        if (first, stop) != (lo, hi) {
            log::warn!(
                "Deletion {}-{} extends past {}; clamped to the gene boundary",
                start,
                end,
                self.id
            );
        }
        Ok((first as usize, stop as usize))
    }

    /// Update coding exon bounds for deleted locals `[first, stop)`.
    ///
    /// Returns the number of coding bases removed. Wholly deleted exons are
    /// pruned.
    fn excise_cds_bounds(&mut self, first: usize, stop: usize) -> usize {
        let width = stop - first;
        let last = stop - 1;
        let mut deleted = 0;
        let mut starts = Vec::with_capacity(self.cds_starts.len());
        let mut ends = Vec::with_capacity(self.cds_ends.len());

        for (&cs, &ce) in self.cds_starts.iter().zip(&self.cds_ends) {
            let (cs, ce) = match ExonOverlap::classify(cs, ce, first, last) {
                ExonOverlap::Before => (cs, ce),
                ExonOverlap::After => (cs - width, ce - width),
                ExonOverlap::Engulfed => {
                    deleted += ce - cs + 1;
                    continue;
                }
                ExonOverlap::Contains => {
                    deleted += width;
                    (cs, ce - width)
                }
                ExonOverlap::ClipsRight => {
                    deleted += ce - first + 1;
                    (cs, first - 1)
                }
                ExonOverlap::ClipsLeft => {
                    deleted += last - cs + 1;
                    (first, ce - width)
                }
            };
            starts.push(cs);
            ends.push(ce);
        }

        self.cds_starts = starts;
        self.cds_ends = ends;
        deleted
    }

    /// Classify a deletion of `n` coding bases starting at coding position `k0`.
    ///
    /// Runs after the cDNA has been cut but before the protein is retranslated.
    fn classify_coding_deletion(&self, k0: usize, n: usize, old_span: Option<&str>) -> EffectPrediction {
        let cds_pos = k0 as u32;
        if self.coding.is_empty() {
            return EffectPrediction::new(Consequence::TranscriptAblation, cds_pos, 0);
        }

        let table = CodonTable::shared();
        let first_codon = k0 / 3;
        match old_span {
            Some(old_span) => {
                let coding = self.coding_seq();
                let codon_start = k0 - k0 % 3;
                let new_end = (codon_start + old_span.len())
                    .saturating_sub(n)
                    .clamp(codon_start, coding.len());
                let (aa_pos, aa_ref, aa_alt) = self.classifier.in_frame_change(
                    table,
                    old_span,
                    &coding[codon_start.min(coding.len())..new_end],
                    first_codon,
                    k0 % 3 != 0,
                );
                EffectPrediction::new(Consequence::InFrameDeletion, cds_pos, 0)
                    .with_amino_acids(aa_pos, aa_ref, aa_alt)
            }
            None => {
                let outcome = self.classifier.frameshift(
                    table,
                    &self.prot_seq,
                    &self.cdna_seq,
                    self.coding.start,
                    self.coding.end,
                    first_codon,
                );
                EffectPrediction::new(Consequence::Frameshift, cds_pos, 0)
                    .with_amino_acids(outcome.aa_pos, outcome.aa_ref, outcome.aa_alt)
                    .with_stop_dist(outcome.stop_dist)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ExonAnnotation, Strand, TranscriptAnnotation};
    use crate::codon::AminoAcid::*;
    use crate::gene::test_fixtures::{fixture_gene, fixture_gene_minus, single_exon_gene};
    use crate::reference::InMemoryReference;

    #[test]
    fn test_exon_overlap_classify() {
        use ExonOverlap::*;
        assert_eq!(ExonOverlap::classify(2, 4, 6, 8), Before);
        assert_eq!(ExonOverlap::classify(10, 12, 6, 8), After);
        assert_eq!(ExonOverlap::classify(6, 8, 5, 9), Engulfed);
        assert_eq!(ExonOverlap::classify(2, 12, 6, 8), Contains);
        assert_eq!(ExonOverlap::classify(2, 7, 6, 8), ClipsRight);
        assert_eq!(ExonOverlap::classify(7, 12, 6, 8), ClipsLeft);
    }

    #[test]
    fn test_delete_intron_base() {
        let mut gene = fixture_gene();
        let effect = gene.delete(10, 11).unwrap();
        assert_eq!(gene.cds_starts(), &[2, 7, 10]);
        assert_eq!(gene.cds_ends(), &[4, 9, 12]);
        assert_eq!(effect.consequence, Consequence::Splice);
        assert_eq!(effect.cdna_pos, 5);
        assert_eq!(effect.cdna_dist, 1);
        assert_eq!(gene.genome_seq(), "ACATGCACCGTAACG");
        assert_eq!(gene.cdna_seq(), "ACATGCCGTAACG");
        assert!(gene.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_outside_gene_is_rejected() {
        let mut gene = fixture_gene();
        let before = gene.clone();
        assert!(matches!(
            gene.delete(16, 20),
            Err(FerroError::OutOfRange { .. })
        ));
        assert!(matches!(
            gene.delete(-4, -1),
            Err(FerroError::OutOfRange { .. })
        ));
        assert!(matches!(
            gene.delete(5, 5),
            Err(FerroError::InvalidInterval { start: 5, end: 5 })
        ));
        assert_eq!(gene, before);
    }

    #[test]
    fn test_delete_coding_frameshift() {
        let mut gene = fixture_gene();
        let prediction = match gene.delete(8, 9) {
            Err(FerroError::NoStopFound { prediction }) => prediction,
            other => panic!("expected NoStopFound, got {other:?}"),
        };
        assert_eq!(prediction.consequence, Consequence::Frameshift);
        assert_eq!(prediction.aa_pos, Some(1));
        assert_eq!(prediction.aa_ref, vec![Pro]);
        assert_eq!(prediction.aa_alt, vec![Arg]);
        assert_eq!(gene.coding_seq(), "ATGCGTAA");
        assert_eq!(gene.cds_starts(), &[2, 7, 10]);
        assert_eq!(gene.cds_ends(), &[4, 8, 12]);
        assert!(gene.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_in_frame_codon() {
        let mut gene = single_exon_gene("GGATGAAACCCTAAGG", 3, 14);
        let effect = gene.delete(5, 8).unwrap();
        assert_eq!(effect.consequence, Consequence::InFrameDeletion);
        assert_eq!(effect.aa_pos, Some(1));
        assert_eq!(effect.aa_ref, vec![Lys]);
        assert!(effect.aa_alt.is_empty());
        assert_eq!(gene.protein(), &[Met, Pro, Ter]);
    }

    #[test]
    fn test_delete_in_frame_mid_codon() {
        let mut gene = single_exon_gene("GGATGAAACCCTAAGG", 3, 14);
        let effect = gene.delete(4, 7).unwrap();
        assert_eq!(effect.consequence, Consequence::InFrameDeletion);
        assert_eq!(effect.aa_pos, Some(0));
        assert_eq!(effect.aa_ref, vec![Met, Lys]);
        assert_eq!(effect.aa_alt, vec![Ile]);
    }

    #[test]
    fn test_delete_in_frame_repeat_drops_unchanged_residue() {
        let mut gene = single_exon_gene("GGATGAAAAAGTAAGG", 3, 14);
        let effect = gene.delete(6, 9).unwrap();
        assert_eq!(effect.aa_pos, Some(2));
        assert_eq!(effect.aa_ref, vec![Lys]);
        assert!(effect.aa_alt.is_empty());
        assert_eq!(gene.coding_seq(), "ATGAAGTAA");
    }

    #[test]
    fn test_delete_utr_and_clamp() {
        let mut gene = fixture_gene();
        let effect = gene.delete(0, 1).unwrap();
        assert_eq!(effect.consequence, Consequence::Splice);
        assert_eq!(effect.cdna_dist, -2);
        assert_eq!(gene.utr_five_seq(), "C");
        assert_eq!(gene.cds_starts(), &[1, 6, 10]);

        let effect = gene.delete(13, 30).unwrap();
        assert_eq!(effect.consequence, Consequence::Splice);
        assert_eq!(effect.cdna_dist, 1);
        assert_eq!(gene.utr_three_seq(), "");
        assert_eq!(gene.len(), 13);
        assert!(gene.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_utr_beyond_splice_windows() {
        // 14 base 5'UTR, ATG AAA TAA, 13 base 3'UTR
        let seq = format!("{}ATGAAATAA{}", "G".repeat(14), "C".repeat(13));
        let mut gene = single_exon_gene(&seq, 15, 23);

        let effect = gene.delete(0, 2).unwrap();
        assert_eq!(effect.consequence, Consequence::FivePrimeUtr);
        assert_eq!(effect.cdna_dist, -13);

        // positions 3 and 4 now sit 9 and 8 bases before the start codon
        let effect = gene.delete(3, 5).unwrap();
        assert_eq!(effect.consequence, Consequence::FarSplice);
        assert_eq!(effect.cdna_dist, -8);
        assert!(gene.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_across_utr_exon_boundary() {
        let reference = InMemoryReference::new().with_chromosome("chr1", "GGGAAATGCCCTAAGG");
        let annotation = TranscriptAnnotation::new(
            "TX2",
            "chr1",
            Strand::Plus,
            vec![
                ExonAnnotation::new(1, 3),
                ExonAnnotation::new(6, 16).with_cds(6, 14),
            ],
        );
        let mut gene = Gene::build(&annotation, &reference).unwrap();
        let effect = gene.delete(2, 4).unwrap();
        assert_eq!(effect.consequence, Consequence::Splice);
        assert_eq!(gene.utr_five_seq(), "GG");
        assert!(gene.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_entire_cds() {
        let mut gene = fixture_gene();
        let effect = gene.delete(2, 14).unwrap();
        assert_eq!(effect.consequence, Consequence::TranscriptAblation);
        assert!(gene.cds_starts().is_empty());
        assert!(gene.coding().is_empty());
        assert!(gene.protein().is_empty());
        assert_eq!(gene.cdna_seq(), "ACCG");
        assert!(gene.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_minus_strand_matches_plus() {
        let mut plus = fixture_gene();
        let mut minus = fixture_gene_minus();
        let plus_effect = plus.delete(10, 11).unwrap();
        let minus_effect = minus.delete(5, 6).unwrap();
        assert_eq!(plus_effect, minus_effect);
        assert_eq!(plus.genome_seq(), minus.genome_seq());
        assert_eq!(plus.cds_starts(), minus.cds_starts());
        assert_eq!(minus.start_pos(), 14);
        assert_eq!(
            minus.change_log(),
            &[ChangeLogEntry::Indel {
                pos: 5,
                removed: "A".to_string(),
                added: String::new()
            }]
        );
    }
}
