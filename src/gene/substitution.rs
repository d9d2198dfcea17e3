//! Single-base substitutions.

use super::model::{ChangeLogEntry, Feature, Gene};
use crate::codon::{complement, AminoAcid, Base, CodonTable};
use crate::effect::EffectPrediction;
use crate::error::FerroError;

impl Gene {
    /// Replace the base at reference position `pos` with `base`.
    ///
    /// `base` is given in reference orientation and is complemented for
    /// minus-strand genes. The base and position are validated before the
    /// gene is touched.
    ///
    /// # Example
    ///
    /// ```
    /// use ferro_genemodel::annotation::{ExonAnnotation, Strand, TranscriptAnnotation};
    /// use ferro_genemodel::codon::AminoAcid;
    /// use ferro_genemodel::effect::Consequence;
    /// use ferro_genemodel::{Gene, InMemoryReference};
    ///
    /// let reference = InMemoryReference::new().with_chromosome("chr1", "ACATGCACCGTTAACG");
    /// let annotation = TranscriptAnnotation::new(
    ///     "TX1",
    ///     "chr1",
    ///     Strand::Plus,
    ///     vec![
    ///         ExonAnnotation::new(1, 5).with_utr5(1, 2).with_cds(3, 5),
    ///         ExonAnnotation::new(8, 10).with_cds(8, 10),
    ///         ExonAnnotation::new(12, 16).with_cds(12, 14).with_utr3(15, 16),
    ///     ],
    /// );
    /// let mut gene = Gene::build(&annotation, &reference).unwrap();
    ///
    /// let effect = gene.substitute(8, 'A').unwrap();
    /// assert_eq!(effect.consequence, Consequence::Missense);
    /// assert_eq!(effect.aa_ref, vec![AminoAcid::Pro]);
    /// assert_eq!(effect.aa_alt, vec![AminoAcid::Gln]);
    /// ```
    pub fn substitute(&mut self, pos: i64, base: char) -> Result<EffectPrediction, FerroError> {
        let alt = Base::from_char(base).ok_or(FerroError::InvalidBase { base })?;
        let local = self.require_local(pos)?;

        let ref_tx = self.genome_seq.as_bytes()[local] as char;
        let alt_tx = if self.is_plus_strand() {
            alt
        } else {
            alt.complement()
        }
        .to_char();

        let feature = self.features[local];
        let prediction = match feature {
            Feature::Coding(k) => {
                let table = CodonTable::shared();
                let translate = |gene: &Gene| {
                    gene.mapper()
                        .cds_pos_to_codon(k)
                        .map(|codon| table.translate_codon(codon))
                        .unwrap_or(AminoAcid::Xaa)
                };

                let ref_aa = translate(&*self);
                self.write_base(local, alt_tx);
                let alt_aa = translate(&*self);

                let aa_pos = k / 3;
                let consequence = self.classifier.classify_codon_change(ref_aa, alt_aa, aa_pos);
                EffectPrediction::new(consequence, k, 0).with_amino_acids(
                    aa_pos,
                    vec![ref_aa],
                    vec![alt_aa],
                )
            }
            _ => {
                let nearest = self.mapper().genomic_to_cds(local).ok();
                self.write_base(local, alt_tx);
                self.noncoding_prediction(feature, nearest)
            }
        };

        let from = if self.is_plus_strand() {
            ref_tx
        } else {
            complement(ref_tx)
        };
        self.change_log.push(ChangeLogEntry::Substitution {
            pos: pos as u64,
            from,
            to: alt.to_char(),
        });
        self.retranslate();

        log::debug!(
            "{}: {}>{} at {} is {}",
            self.id,
            from,
            alt,
            pos,
            prediction.consequence
        );
        Ok(prediction)
    }
}
