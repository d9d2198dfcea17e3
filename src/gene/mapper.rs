//! Conversions between genomic, cDNA and coding positions.
//!
//! All genomic positions here are gene-local indices; use
//! [`Gene::local_index`] to get one from a reference coordinate.
//!
//! # Offsets
//!
//! A non-coding base is described by its nearest coding base and a signed
//! offset `local - local_of(coding base)`. Negative offsets lie upstream
//! (5') of the coding base and positive ones downstream, so `|offset|` is
//! the number of bases between them and `offset == 0` only for coding
//! bases. An intronic base equally far from two coding bases is reported
//! against the upstream one (positive offset).

use super::model::{Feature, Gene};
use crate::error::FerroError;
use serde::{Deserialize, Serialize};

/// A position expressed relative to the CDS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CdsOffset {
    /// 0-based position of the nearest coding base.
    pub cds_pos: u32,
    /// Signed distance from that coding base; 0 for coding bases.
    pub offset: i64,
}

impl CdsOffset {
    /// Whether the position is itself coding.
    pub fn is_coding(&self) -> bool {
        self.offset == 0
    }
}

/// Read-only coordinate queries over a [`Gene`].
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    gene: &'a Gene,
}

impl<'a> CoordinateMapper<'a> {
    pub(crate) fn new(gene: &'a Gene) -> Self {
        Self { gene }
    }

    /// Nearest coding position and offset for a local index.
    pub fn genomic_to_cds(&self, local: usize) -> Result<CdsOffset, FerroError> {
        let features = &self.gene.features;
        let feature = features.get(local).ok_or_else(|| {
            FerroError::out_of_range(
                local as i64,
                format!("local index beyond gene of {} bases", features.len()),
            )
        })?;

        let found = match feature {
            Feature::Coding(k) => Some((*k, local)),
            Feature::Intron => self.nearest_coding(local),
            Feature::FivePrimeUtr => features[local + 1..]
                .iter()
                .enumerate()
                .find_map(|(i, f)| f.coding_index().map(|k| (k, local + 1 + i))),
            Feature::ThreePrimeUtr => features[..local]
                .iter()
                .enumerate()
                .rev()
                .find_map(|(i, f)| f.coding_index().map(|k| (k, i))),
        };

        let (cds_pos, coding_local) = found.ok_or_else(|| {
            FerroError::out_of_range(local as i64, "gene has no coding bases")
        })?;
        Ok(CdsOffset {
            cds_pos,
            offset: local as i64 - coding_local as i64,
        })
    }

    /// Search outward from an intronic base, upstream side first at each distance.
    fn nearest_coding(&self, local: usize) -> Option<(u32, usize)> {
        let features = &self.gene.features;
        let max = local.max(features.len().saturating_sub(local + 1));
        (1..=max).find_map(|d| {
            let upstream = local
                .checked_sub(d)
                .and_then(|i| features[i].coding_index().map(|k| (k, i)));
            upstream.or_else(|| {
                features
                    .get(local + d)
                    .and_then(|f| f.coding_index().map(|k| (k, local + d)))
            })
        })
    }

    /// Local index of a coding position.
    pub fn cds_to_genomic(&self, cds_pos: u32) -> Result<usize, FerroError> {
        let gene = self.gene;
        let mut exon_coding_starts = Vec::with_capacity(gene.cds_starts.len());
        let mut total = 0usize;
        for (start, end) in gene.cds_starts.iter().zip(&gene.cds_ends) {
            exon_coding_starts.push(total);
            total += end - start + 1;
        }

        let pos = cds_pos as usize;
        if pos >= total {
            return Err(FerroError::out_of_range(
                cds_pos as i64,
                format!("coding position beyond CDS of {total} bases"),
            ));
        }
        let exon = exon_coding_starts.partition_point(|&s| s <= pos) - 1;
        Ok(gene.cds_starts[exon] + (pos - exon_coding_starts[exon]))
    }

    /// Codon containing a coding position.
    pub fn cds_pos_to_codon(&self, cds_pos: u32) -> Result<&'a str, FerroError> {
        let gene: &'a Gene = self.gene;
        let coding = gene.coding_seq();
        let start = cds_pos as usize - cds_pos as usize % 3;
        coding.get(start..start + 3).ok_or_else(|| {
            FerroError::out_of_range(
                cds_pos as i64,
                format!("no complete codon in CDS of {} bases", coding.len()),
            )
        })
    }

    /// Index of an exonic base in the cDNA, `None` for introns.
    pub fn cdna_index(&self, local: usize) -> Option<usize> {
        match self.gene.features.get(local)? {
            Feature::Intron => None,
            Feature::Coding(k) => Some(self.gene.coding.start + *k as usize),
            Feature::FivePrimeUtr | Feature::ThreePrimeUtr => Some(self.gene.exonic_before(local)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::test_fixtures::{fixture_gene, fixture_gene_minus};

    #[test]
    fn test_genomic_to_cds_coding() {
        let gene = fixture_gene();
        let mapper = gene.mapper();
        let hit = mapper.genomic_to_cds(8).unwrap();
        assert_eq!(hit, CdsOffset { cds_pos: 4, offset: 0 });
        assert!(hit.is_coding());
    }

    #[test]
    fn test_genomic_to_cds_intron() {
        let gene = fixture_gene();
        let mapper = gene.mapper();
        // locals 5,6 sit between C2 (local 4) and C3 (local 7)
        assert_eq!(
            mapper.genomic_to_cds(5).unwrap(),
            CdsOffset { cds_pos: 2, offset: 1 }
        );
        assert_eq!(
            mapper.genomic_to_cds(6).unwrap(),
            CdsOffset { cds_pos: 3, offset: -1 }
        );
        // local 10 is equidistant from C5 and C6; upstream wins
        assert_eq!(
            mapper.genomic_to_cds(10).unwrap(),
            CdsOffset { cds_pos: 5, offset: 1 }
        );
    }

    #[test]
    fn test_genomic_to_cds_utrs() {
        let gene = fixture_gene();
        let mapper = gene.mapper();
        assert_eq!(
            mapper.genomic_to_cds(0).unwrap(),
            CdsOffset { cds_pos: 0, offset: -2 }
        );
        assert_eq!(
            mapper.genomic_to_cds(15).unwrap(),
            CdsOffset { cds_pos: 8, offset: 2 }
        );
        assert!(mapper.genomic_to_cds(16).is_err());
    }

    #[test]
    fn test_cds_to_genomic() {
        let gene = fixture_gene();
        let mapper = gene.mapper();
        assert_eq!(mapper.cds_to_genomic(0).unwrap(), 2);
        assert_eq!(mapper.cds_to_genomic(2).unwrap(), 4);
        assert_eq!(mapper.cds_to_genomic(3).unwrap(), 7);
        assert_eq!(mapper.cds_to_genomic(8).unwrap(), 13);
        assert!(matches!(
            mapper.cds_to_genomic(9),
            Err(FerroError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_cds_round_trip() {
        let gene = fixture_gene();
        let mapper = gene.mapper();
        for k in 0..9 {
            let local = mapper.cds_to_genomic(k).unwrap();
            assert_eq!(mapper.genomic_to_cds(local).unwrap().cds_pos, k);
        }
    }

    #[test]
    fn test_cds_pos_to_codon() {
        let gene = fixture_gene();
        let mapper = gene.mapper();
        assert_eq!(mapper.cds_pos_to_codon(0).unwrap(), "ATG");
        assert_eq!(mapper.cds_pos_to_codon(4).unwrap(), "CCG");
        assert_eq!(mapper.cds_pos_to_codon(8).unwrap(), "TAA");
        assert!(mapper.cds_pos_to_codon(9).is_err());
    }

    #[test]
    fn test_cdna_index() {
        let gene = fixture_gene();
        let mapper = gene.mapper();
        assert_eq!(mapper.cdna_index(1), Some(1));
        assert_eq!(mapper.cdna_index(2), Some(2));
        assert_eq!(mapper.cdna_index(5), None);
        assert_eq!(mapper.cdna_index(7), Some(5));
        assert_eq!(mapper.cdna_index(14), Some(11));
        assert_eq!(mapper.cdna_index(15), Some(12));
        assert_eq!(mapper.cdna_index(99), None);
    }

    #[test]
    fn test_minus_strand_mapping_matches_plus() {
        let plus = fixture_gene();
        let minus = fixture_gene_minus();
        for local in 0..plus.len() {
            assert_eq!(
                plus.mapper().genomic_to_cds(local).unwrap(),
                minus.mapper().genomic_to_cds(local).unwrap()
            );
        }
    }
}
