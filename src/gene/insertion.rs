//! Insertions.

use super::model::{ChangeLogEntry, Feature, Gene};
use crate::codon::{reverse_complement, Base, CodonTable};
use crate::effect::{Consequence, EffectPrediction};
use crate::error::FerroError;

impl Gene {
    /// Insert `bases` after reference position `pos`.
    ///
    /// `bases` are given in reference orientation and reverse-complemented
    /// for minus-strand genes. Both bases flanking the insertion must lie
    /// inside the gene.
    ///
    /// A frameshift whose retranslation finds no stop codon is still
    /// applied, and reported as [`FerroError::NoStopFound`].
    pub fn insert(&mut self, pos: i64, bases: &str) -> Result<EffectPrediction, FerroError> {
        let added = parse_bases(bases)?;
        if added.is_empty() {
            return Err(FerroError::InvalidInterval {
                start: pos,
                end: pos,
            });
        }
        let ip = self.insertion_point(pos).ok_or_else(|| {
            FerroError::out_of_range(pos, "insertion must be flanked by bases of the gene")
        })?;

        let tx_bases = if self.is_plus_strand() {
            added.clone()
        } else {
            reverse_complement(&added)
        };
        let n = tx_bases.len();

        let left = self.features[ip - 1];
        let right = self.features[ip];
        let prediction = match left {
            Feature::Coding(k) if right.is_coding() => {
                self.insert_coding(ip, k as usize + 1, &tx_bases)
            }
            _ => self.insert_noncoding(ip, left, right, &tx_bases),
        };

        self.change_log.push(ChangeLogEntry::Indel {
            pos: pos as u64,
            removed: String::new(),
            added,
        });
        if !self.is_plus_strand() {
            self.start_pos += n as u64;
        }
        self.retranslate();

        log::debug!(
            "{}: insertion of {} bases after {} is {}",
            self.id,
            n,
            pos,
            prediction.consequence
        );
        match prediction.consequence {
            Consequence::Frameshift => self.finish_frameshift(prediction),
            _ => Ok(prediction),
        }
    }

    /// Local index the inserted bases will occupy, if both flanks are in the gene.
    fn insertion_point(&self, pos: i64) -> Option<usize> {
        if pos < 0 {
            return None;
        }
        let start = self.start_pos as i64;
        let ip = if self.is_plus_strand() {
            pos - start + 1
        } else {
            start - pos
        };
        (ip >= 1 && ip < self.genome_seq.len() as i64).then_some(ip as usize)
    }

    /// Splice bases into the genome and shift CDS bounds at or after `ip`.
    fn splice_genome(&mut self, ip: usize, tx_bases: &str, feature: impl Fn(usize) -> Feature) {
        let n = tx_bases.len();
        self.genome_seq.insert_str(ip, tx_bases);
        for bound in self.cds_starts.iter_mut().chain(self.cds_ends.iter_mut()) {
            if *bound >= ip {
                *bound += n;
            }
        }
        self.features.splice(ip..ip, (0..n).map(feature));
    }

    /// Insertion between two coding bases; `at` is the coding position of the first new base.
    fn insert_coding(&mut self, ip: usize, at: usize, tx_bases: &str) -> EffectPrediction {
        let n = tx_bases.len();
        let table = CodonTable::shared();
        let codon_start = at - at % 3;
        let mid_codon = at % 3 != 0;
        let old_span = if mid_codon {
            let coding = self.coding_seq();
            coding[codon_start..(codon_start + 3).min(coding.len())].to_string()
        } else {
            String::new()
        };

        for feature in &mut self.features[ip..] {
            if let Feature::Coding(j) = feature {
                *j += n as u32;
            }
        }
        self.splice_genome(ip, tx_bases, |i| Feature::Coding((at + i) as u32));
        // at a junction left by a deleted intron the new bases join the left run
        if let Some(end) = self.cds_ends.iter_mut().find(|end| **end + 1 == ip) {
            *end += n;
        }
        self.cdna_seq.insert_str(self.coding.start + at, tx_bases);
        self.coding.end += n;
        self.utr_three.shift(n);

        let cds_pos = (at - 1) as u32;
        if n % 3 != 0 {
            let outcome = self.classifier.frameshift(
                table,
                &self.prot_seq,
                &self.cdna_seq,
                self.coding.start,
                self.coding.end,
                at / 3,
            );
            return EffectPrediction::new(Consequence::Frameshift, cds_pos, 0)
                .with_amino_acids(outcome.aa_pos, outcome.aa_ref, outcome.aa_alt)
                .with_stop_dist(outcome.stop_dist);
        }

        let coding = self.coding_seq();
        let new_end = (codon_start + old_span.len() + n).min(coding.len());
        let (aa_pos, aa_ref, aa_alt) = self.classifier.in_frame_change(
            table,
            &old_span,
            &coding[codon_start..new_end],
            at / 3,
            mid_codon,
        );
        EffectPrediction::new(Consequence::InFrameInsertion, cds_pos, 0)
            .with_amino_acids(aa_pos, aa_ref, aa_alt)
    }

    /// Insertion next to at least one non-coding base.
    fn insert_noncoding(
        &mut self,
        ip: usize,
        left: Feature,
        right: Feature,
        tx_bases: &str,
    ) -> EffectPrediction {
        let n = tx_bases.len();
        let nearest = [ip - 1, ip]
            .into_iter()
            .filter_map(|local| self.mapper().genomic_to_cds(local).ok())
            .min_by_key(|hit| hit.offset.unsigned_abs());

        // UTR beats intron at a boundary
        let sentinel = if left.is_utr() {
            left
        } else if right.is_utr() {
            right
        } else {
            Feature::Intron
        };
        let cdna_index = self.exonic_before(ip);

        self.splice_genome(ip, tx_bases, |_| sentinel);
        match sentinel {
            Feature::FivePrimeUtr => {
                self.cdna_seq.insert_str(cdna_index, tx_bases);
                self.utr_five.end += n;
                self.coding.shift(n);
                self.utr_three.shift(n);
            }
            Feature::ThreePrimeUtr => {
                self.cdna_seq.insert_str(cdna_index, tx_bases);
                self.utr_three.end += n;
            }
            Feature::Intron | Feature::Coding(_) => {}
        }

        self.noncoding_prediction(sentinel, nearest)
    }
}

/// Upper-case and validate inserted bases.
fn parse_bases(bases: &str) -> Result<String, FerroError> {
    bases
        .chars()
        .map(|c| {
            Base::from_char(c)
                .map(Base::to_char)
                .ok_or(FerroError::InvalidBase { base: c })
        })
        .collect()
}
