//! Building gene models from annotation and reference bases.

use super::model::{Feature, Gene, SeqView};
use crate::annotation::{select_longest_cds, GenomicRange, TranscriptAnnotation};
use crate::codon::reverse_complement;
use crate::config::GeneModelConfig;
use crate::effect::EffectClassifier;
use crate::error::FerroError;
use crate::reference::ReferenceBases;

/// Per-base flags collected from the annotation before features are assigned.
struct BaseMarks {
    exonic: Vec<bool>,
    cds: Vec<bool>,
    utr5: Vec<bool>,
    utr3: Vec<bool>,
}

impl Gene {
    /// Build a gene model with the default configuration.
    pub fn build<R>(annotation: &TranscriptAnnotation, reference: &R) -> Result<Self, FerroError>
    where
        R: ReferenceBases + ?Sized,
    {
        Self::build_with_config(annotation, reference, GeneModelConfig::default())
    }

    /// Build a gene model from the isoform with the longest CDS.
    pub fn build_longest<R>(
        isoforms: &[TranscriptAnnotation],
        reference: &R,
    ) -> Result<Self, FerroError>
    where
        R: ReferenceBases + ?Sized,
    {
        let chosen = select_longest_cds(isoforms).ok_or_else(|| FerroError::InvalidAnnotation {
            msg: "no isoforms supplied".to_string(),
        })?;
        log::debug!(
            "Selected isoform {} ({} coding bases) from {} candidates",
            chosen.id,
            chosen.cds_length(),
            isoforms.len()
        );
        Self::build(chosen, reference)
    }

    /// Build a gene model with explicit classification settings.
    pub fn build_with_config<R>(
        annotation: &TranscriptAnnotation,
        reference: &R,
        config: GeneModelConfig,
    ) -> Result<Self, FerroError>
    where
        R: ReferenceBases + ?Sized,
    {
        config.validate()?;
        annotation.validate()?;

        let span = annotation
            .span()
            .ok_or_else(|| FerroError::InvalidAnnotation {
                msg: format!("transcript {} has no exons", annotation.id),
            })?;
        let (lo, hi) = span.to_zero_based_half_open();

        if !reference.has_chromosome(&annotation.chromosome) {
            return Err(FerroError::ReferenceNotFound {
                id: annotation.chromosome.clone(),
            });
        }
        let raw = reference.bases(&annotation.chromosome, lo, hi)?;
        if raw.len() as u64 != hi - lo {
            return Err(FerroError::ReferenceNotFound {
                id: format!("{}:{}-{}", annotation.chromosome, lo, hi),
            });
        }

        let plus = annotation.strand.is_plus();
        let genome_seq = if plus { raw } else { reverse_complement(&raw) };
        let start_pos = if plus { lo } else { hi - 1 };

        let marks = mark_bases(annotation, genome_seq.len(), |p| {
            // 1-based reference position to local index
            let p0 = p - 1;
            (if plus { p0 - lo } else { hi - 1 - p0 }) as usize
        });
        let features = assign_features(&annotation.id, &marks)?;
        let (cds_starts, cds_ends) = coding_runs(&features);

        let genome = genome_seq.as_bytes();
        let mut cdna_seq = String::with_capacity(genome.len());
        let (mut n5, mut nc) = (0, 0);
        for (i, feature) in features.iter().enumerate() {
            match feature {
                Feature::Intron => continue,
                Feature::FivePrimeUtr => n5 += 1,
                Feature::Coding(_) => nc += 1,
                Feature::ThreePrimeUtr => {}
            }
            cdna_seq.push(genome[i] as char);
        }

        if nc % 3 != 0 {
            log::warn!(
                "CDS of {} has {} bases, not a multiple of 3; the trailing partial codon is not translated",
                annotation.id,
                nc
            );
        }

        let cdna_len = cdna_seq.len();
        let mut gene = Gene {
            id: annotation.id.clone(),
            chromosome: annotation.chromosome.clone(),
            start_pos,
            strand: annotation.strand,
            cds_starts,
            cds_ends,
            genome_seq,
            cdna_seq,
            utr_five: SeqView::new(0, n5),
            coding: SeqView::new(n5, n5 + nc),
            utr_three: SeqView::new(n5 + nc, cdna_len),
            prot_seq: Vec::new(),
            features,
            change_log: Vec::new(),
            orig: Box::default(),
            classifier: EffectClassifier::new(&config),
        };
        gene.retranslate();
        gene.orig = Box::new(gene.snapshot());

        log::debug!(
            "Built gene model {} on {}{}: {} genomic, {} cDNA, {} coding bases",
            gene.id,
            gene.chromosome,
            gene.strand,
            gene.len(),
            cdna_len,
            nc
        );
        Ok(gene)
    }
}

fn mark_bases(
    annotation: &TranscriptAnnotation,
    len: usize,
    to_local: impl Fn(u64) -> usize,
) -> BaseMarks {
    let mut marks = BaseMarks {
        exonic: vec![false; len],
        cds: vec![false; len],
        utr5: vec![false; len],
        utr3: vec![false; len],
    };
    let mark = |flags: &mut [bool], range: GenomicRange| {
        for p in range.start..=range.end {
            flags[to_local(p)] = true;
        }
    };

    for exon in annotation.exons_in_transcript_order() {
        mark(&mut marks.exonic, exon.range);
        if let Some(cds) = exon.cds {
            mark(&mut marks.cds, cds);
        }
        if let Some(utr5) = exon.utr5 {
            mark(&mut marks.utr5, utr5);
        }
        if let Some(utr3) = exon.utr3 {
            mark(&mut marks.utr3, utr3);
        }
    }
    marks
}

/// Assign a feature to every base, walking 5'→3'.
///
/// Exonic bases without a CDS flag are 5'UTR until the first coding base
/// and 3'UTR after it. Explicit UTR sub-ranges must agree.
fn assign_features(id: &str, marks: &BaseMarks) -> Result<Vec<Feature>, FerroError> {
    let len = marks.exonic.len();
    let mut features = Vec::with_capacity(len);
    let mut next_coding = 0u32;
    let mut last_coding = None;

    for i in 0..len {
        let feature = if !marks.exonic[i] {
            Feature::Intron
        } else if marks.cds[i] {
            next_coding += 1;
            last_coding = Some(i);
            Feature::Coding(next_coding - 1)
        } else if next_coding == 0 {
            Feature::FivePrimeUtr
        } else {
            Feature::ThreePrimeUtr
        };

        if (marks.utr5[i] && feature != Feature::FivePrimeUtr)
            || (marks.utr3[i] && feature != Feature::ThreePrimeUtr)
        {
            return Err(FerroError::InvalidAnnotation {
                msg: format!("transcript {id}: UTR annotation disagrees with CDS at local base {i}"),
            });
        }
        features.push(feature);
    }

    if let Some(last) = last_coding {
        if let Some(i) = features[..last]
            .iter()
            .position(|f| *f == Feature::ThreePrimeUtr)
        {
            return Err(FerroError::InvalidAnnotation {
                msg: format!("transcript {id}: CDS is interrupted by untranslated exonic base {i}"),
            });
        }
    }

    Ok(features)
}

/// Inclusive local bounds of each contiguous run of coding bases.
fn coding_runs(features: &[Feature]) -> (Vec<usize>, Vec<usize>) {
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    for (i, feature) in features.iter().enumerate() {
        if !feature.is_coding() {
            continue;
        }
        if i == 0 || !features[i - 1].is_coding() {
            starts.push(i);
        }
        if i + 1 == features.len() || !features[i + 1].is_coding() {
            ends.push(i);
        }
    }
    (starts, ends)
}
