//! Genetic code, codon table and translation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A single nucleotide base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parse a base from a character (case-insensitive).
    ///
    /// Only A, C, G and T are accepted; IUPAC ambiguity codes and U are not.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            _ => None,
        }
    }

    /// Convert to character.
    pub fn to_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// Watson-Crick complement.
    pub fn complement(self) -> Self {
        match self {
            Base::A => Base::T,
            Base::C => Base::G,
            Base::G => Base::C,
            Base::T => Base::A,
        }
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Amino acid enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala, // A
    Arg, // R
    Asn, // N
    Asp, // D
    Cys, // C
    Gln, // Q
    Glu, // E
    Gly, // G
    His, // H
    Ile, // I
    Leu, // L
    Lys, // K
    Met, // M
    Phe, // F
    Pro, // P
    Ser, // S
    Thr, // T
    Trp, // W
    Tyr, // Y
    Val, // V
    Ter, // * (stop codon)
    Xaa, // X (untranslatable codon)
}

impl AminoAcid {
    /// Get 3-letter code
    pub fn to_three_letter(&self) -> &'static str {
        match self {
            Self::Ala => "Ala",
            Self::Arg => "Arg",
            Self::Asn => "Asn",
            Self::Asp => "Asp",
            Self::Cys => "Cys",
            Self::Gln => "Gln",
            Self::Glu => "Glu",
            Self::Gly => "Gly",
            Self::His => "His",
            Self::Ile => "Ile",
            Self::Leu => "Leu",
            Self::Lys => "Lys",
            Self::Met => "Met",
            Self::Phe => "Phe",
            Self::Pro => "Pro",
            Self::Ser => "Ser",
            Self::Thr => "Thr",
            Self::Trp => "Trp",
            Self::Tyr => "Tyr",
            Self::Val => "Val",
            Self::Ter => "Ter",
            Self::Xaa => "Xaa",
        }
    }

    /// Get 1-letter code
    pub fn to_one_letter(&self) -> char {
        match self {
            Self::Ala => 'A',
            Self::Arg => 'R',
            Self::Asn => 'N',
            Self::Asp => 'D',
            Self::Cys => 'C',
            Self::Gln => 'Q',
            Self::Glu => 'E',
            Self::Gly => 'G',
            Self::His => 'H',
            Self::Ile => 'I',
            Self::Leu => 'L',
            Self::Lys => 'K',
            Self::Met => 'M',
            Self::Phe => 'F',
            Self::Pro => 'P',
            Self::Ser => 'S',
            Self::Thr => 'T',
            Self::Trp => 'W',
            Self::Tyr => 'Y',
            Self::Val => 'V',
            Self::Ter => '*',
            Self::Xaa => 'X',
        }
    }

    /// Whether this is the stop signal.
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Ter)
    }
}

impl std::fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}

/// A codon (three nucleotides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    /// Create a new codon from three bases.
    pub fn new(b1: Base, b2: Base, b3: Base) -> Self {
        Self([b1, b2, b3])
    }

    /// Parse a codon from a string of exactly three bases.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let b1 = Base::from_char(chars.next()?)?;
        let b2 = Base::from_char(chars.next()?)?;
        let b3 = Base::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self([b1, b2, b3]))
    }

    /// Get the three bases.
    pub fn bases(&self) -> &[Base; 3] {
        &self.0
    }
}

impl std::fmt::Display for Codon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Standard genetic code table (NCBI translation table 1).
#[derive(Debug, Clone)]
pub struct CodonTable {
    codon_to_aa: HashMap<Codon, AminoAcid>,
}

impl CodonTable {
    /// Create the standard genetic code.
    pub fn standard() -> Self {
        // TCAG order: first base selects the block of 16, second the row of 4.
        const BASES: [Base; 4] = [Base::T, Base::C, Base::A, Base::G];
        const CODE: &str = "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

        let mut codon_to_aa = HashMap::with_capacity(64);
        for (i, aa_char) in CODE.chars().enumerate() {
            let codon = Codon::new(BASES[i / 16], BASES[(i / 4) % 4], BASES[i % 4]);
            codon_to_aa.insert(codon, one_letter_to_amino_acid(aa_char));
        }

        Self { codon_to_aa }
    }

    /// Shared instance of the standard table.
    pub fn shared() -> &'static CodonTable {
        static TABLE: OnceLock<CodonTable> = OnceLock::new();
        TABLE.get_or_init(CodonTable::standard)
    }

    /// Get the amino acid encoded by a codon.
    pub fn amino_acid_for(&self, codon: &Codon) -> AminoAcid {
        self.codon_to_aa
            .get(codon)
            .copied()
            .unwrap_or(AminoAcid::Xaa)
    }

    /// Translate a three-base string; anything unparseable becomes `Xaa`.
    pub fn translate_codon(&self, codon: &str) -> AminoAcid {
        Codon::parse(codon)
            .map(|c| self.amino_acid_for(&c))
            .unwrap_or(AminoAcid::Xaa)
    }

    /// Check if a codon is a stop codon.
    pub fn is_stop(&self, codon: &Codon) -> bool {
        self.amino_acid_for(codon).is_stop()
    }

    /// Translate a sequence codon by codon.
    ///
    /// Translation runs through the whole sequence (stop codons included as
    /// `Ter`); a trailing partial codon is ignored.
    pub fn translate(&self, seq: &str) -> Vec<AminoAcid> {
        seq.as_bytes()
            .chunks_exact(3)
            .map(|c| {
                std::str::from_utf8(c)
                    .map(|s| self.translate_codon(s))
                    .unwrap_or(AminoAcid::Xaa)
            })
            .collect()
    }
}

fn one_letter_to_amino_acid(c: char) -> AminoAcid {
    match c {
        'A' => AminoAcid::Ala,
        'R' => AminoAcid::Arg,
        'N' => AminoAcid::Asn,
        'D' => AminoAcid::Asp,
        'C' => AminoAcid::Cys,
        'Q' => AminoAcid::Gln,
        'E' => AminoAcid::Glu,
        'G' => AminoAcid::Gly,
        'H' => AminoAcid::His,
        'I' => AminoAcid::Ile,
        'L' => AminoAcid::Leu,
        'K' => AminoAcid::Lys,
        'M' => AminoAcid::Met,
        'F' => AminoAcid::Phe,
        'P' => AminoAcid::Pro,
        'S' => AminoAcid::Ser,
        'T' => AminoAcid::Thr,
        'W' => AminoAcid::Trp,
        'Y' => AminoAcid::Tyr,
        'V' => AminoAcid::Val,
        '*' => AminoAcid::Ter,
        _ => AminoAcid::Xaa,
    }
}

/// Complement a single nucleotide character, preserving anything else.
pub fn complement(c: char) -> char {
    match Base::from_char(c) {
        Some(b) => b.complement().to_char(),
        None => c,
    }
}

/// Compute reverse complement of a DNA sequence.
pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement).collect()
}

/// Render a protein as one-letter codes.
pub fn protein_to_string(protein: &[AminoAcid]) -> String {
    protein.iter().map(|aa| aa.to_one_letter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_from_char() {
        assert_eq!(Base::from_char('a'), Some(Base::A));
        assert_eq!(Base::from_char('T'), Some(Base::T));
        assert_eq!(Base::from_char('U'), None);
        assert_eq!(Base::from_char('N'), None);
    }

    #[test]
    fn test_codon_parse() {
        let codon = Codon::parse("ATG").unwrap();
        assert_eq!(codon.bases(), &[Base::A, Base::T, Base::G]);
        assert_eq!(codon.to_string(), "ATG");
        assert!(Codon::parse("AT").is_none());
        assert!(Codon::parse("ATGC").is_none());
        assert!(Codon::parse("ANG").is_none());
    }

    #[test]
    fn test_standard_code() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon("ATG"), AminoAcid::Met);
        assert_eq!(table.translate_codon("CCG"), AminoAcid::Pro);
        assert_eq!(table.translate_codon("CAG"), AminoAcid::Gln);
        assert_eq!(table.translate_codon("TGG"), AminoAcid::Trp);
        assert_eq!(table.translate_codon("AGA"), AminoAcid::Arg);
        assert_eq!(table.translate_codon("GGG"), AminoAcid::Gly);
        for stop in ["TAA", "TAG", "TGA"] {
            assert_eq!(table.translate_codon(stop), AminoAcid::Ter);
            assert!(table.is_stop(&Codon::parse(stop).unwrap()));
        }
        assert_eq!(table.translate_codon("NNN"), AminoAcid::Xaa);
    }

    #[test]
    fn test_translate_ignores_partial_codon() {
        let protein = CodonTable::shared().translate("ATGCCGTAAGC");
        assert_eq!(
            protein,
            vec![AminoAcid::Met, AminoAcid::Pro, AminoAcid::Ter]
        );
        assert_eq!(protein_to_string(&protein), "MP*");
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement("ATGC"), "GCAT");
        assert_eq!(reverse_complement("AACCN"), "NGGTT");
        assert_eq!(complement('g'), 'C');
    }
}
