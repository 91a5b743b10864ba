//! Ordered residue alphabets with constant-time position lookup.
//!
//! An [`Alphabet`] is a set of residues in a particular order, capturing all
//! possible residues of a family of sequences. The ordering is semantically
//! significant: indices into the alphabet are in correspondence with indices
//! into emission columns and substitution-matrix rows built over it.

use std::fmt;

use crate::sequence::Residue;

/// An ordered set of residues.
///
/// Residues must be distinct; this is not actively enforced, and a duplicate
/// residue makes the position index report only the last occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    residues: Vec<Residue>,
}

impl Alphabet {
    /// Create an alphabet from the residues given, in order.
    pub fn new(residues: Vec<Residue>) -> Self {
        Self { residues }
    }

    /// Create an alphabet from a byte string, in order.
    pub fn from_bytes(bs: &[u8]) -> Self {
        Self::new(bs.to_vec())
    }

    /// The alphabet matching the BLOSUM62 substitution matrix included in
    /// this workspace: the 20 standard amino acids plus B, X, Z and the gap
    /// symbol, in alphabetical order.
    pub fn blosum62() -> Self {
        Self::from_bytes(b"ABCDEFGHIKLMNPQRSTVWXYZ-")
    }

    /// The default alphabet for DNA sequences.
    pub fn dna() -> Self {
        Self::from_bytes(b"ACGTN-")
    }

    /// The default alphabet for RNA sequences.
    pub fn rna() -> Self {
        Self::from_bytes(b"ACGUN-")
    }

    /// Number of residues in the alphabet.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// True iff the alphabet has no residues.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// The residues, in alphabet order.
    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// True iff `r` is a member of the alphabet.
    pub fn contains(&self, r: Residue) -> bool {
        self.residues.contains(&r)
    }

    /// Build a constant-time mapping from bytes to alphabet positions.
    ///
    /// The index is built once and is independent of the alphabet afterwards;
    /// do not mutate an alphabet after building tables that depend on its
    /// ordering.
    pub fn index(&self) -> AlphabetIndex {
        let mut positions = [None; 256];
        for (i, &r) in self.residues.iter().enumerate() {
            positions[r as usize] = Some(i as u8);
        }
        AlphabetIndex { positions }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &r in &self.residues {
            write!(f, "{}", char::from(r))?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Alphabet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Alphabet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize;

        let s = String::deserialize(deserializer)?;
        let mut residues = Vec::with_capacity(s.len());
        for c in s.chars() {
            let code = u32::from(c);
            if code > 255 {
                return Err(serde::de::Error::custom(format!(
                    "residue '{c}' is not a single byte"
                )));
            }
            residues.push(code as Residue);
        }
        Ok(Alphabet::new(residues))
    }
}

/// A 256-entry byte-to-position map built by [`Alphabet::index`].
///
/// Bytes that are not alphabet members look up as `None`, so an unknown
/// residue is always distinguishable from the residue at position zero.
#[derive(Clone)]
pub struct AlphabetIndex {
    positions: [Option<u8>; 256],
}

impl AlphabetIndex {
    /// Position of `r` in the alphabet, or `None` if `r` is not a member.
    pub fn lookup(&self, r: Residue) -> Option<usize> {
        self.positions[r as usize].map(usize::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_preserved() {
        let a = Alphabet::from_bytes(b"CAB");
        assert_eq!(a.residues(), b"CAB");
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn index_maps_members_in_order() {
        let idx = Alphabet::from_bytes(b"ACGTN-").index();
        assert_eq!(idx.lookup(b'A'), Some(0));
        assert_eq!(idx.lookup(b'C'), Some(1));
        assert_eq!(idx.lookup(b'-'), Some(5));
    }

    #[test]
    fn index_rejects_unknown_bytes() {
        let idx = Alphabet::from_bytes(b"ACGT").index();
        assert_eq!(idx.lookup(b'Z'), None);
        assert_eq!(idx.lookup(0), None);
        // The first residue is still position 0, distinct from "absent".
        assert_eq!(idx.lookup(b'A'), Some(0));
    }

    #[test]
    fn equality_is_order_sensitive() {
        assert_eq!(Alphabet::from_bytes(b"AC"), Alphabet::from_bytes(b"AC"));
        assert_ne!(Alphabet::from_bytes(b"AC"), Alphabet::from_bytes(b"CA"));
        assert_ne!(Alphabet::from_bytes(b"AC"), Alphabet::from_bytes(b"ACG"));
    }

    #[test]
    fn display_is_the_residue_string() {
        assert_eq!(Alphabet::dna().to_string(), "ACGTN-");
    }

    #[test]
    fn predefined_alphabets_end_with_gap() {
        for a in [Alphabet::blosum62(), Alphabet::dna(), Alphabet::rna()] {
            assert_eq!(*a.residues().last().unwrap(), b'-');
        }
        assert_eq!(Alphabet::blosum62().len(), 24);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_string_form() {
        let a = Alphabet::dna();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"ACGTN-\"");
        let back: Alphabet = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
