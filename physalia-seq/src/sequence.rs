//! Biological sequence containers.
//!
//! A [`Sequence`] is any kind of biological sequence: DNA, RNA, amino acid,
//! secondary structure, and so on. Residues carry no validation beyond being
//! bytes; which residues are meaningful is decided by the [`Alphabet`] a
//! model or scoring table was built over.
//!
//! [`Alphabet`]: crate::alphabet::Alphabet

/// A single entry in a sequence (amino acid, nucleotide, or the gap `-`).
pub type Residue = u8;

/// A named run of residues.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    pub name: String,
    pub residues: Vec<Residue>,
}

impl Sequence {
    /// Create a sequence from a name and residues.
    pub fn new(name: impl Into<String>, residues: Vec<Residue>) -> Self {
        Self {
            name: name.into(),
            residues,
        }
    }

    /// Convenience constructor from string data.
    pub fn from_text(name: &str, residues: &str) -> Self {
        Self::new(name, residues.as_bytes().to_vec())
    }

    /// Number of residues in the sequence.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// True iff the sequence has no residues.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// The residues as a byte slice.
    pub fn bytes(&self) -> &[u8] {
        &self.residues
    }

    /// A copy of the residue range `[start, end)` under the same name.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Sequence {
        Sequence {
            name: self.name.clone(),
            residues: self.residues[start..end].to_vec(),
        }
    }
}

/// The model-state class of a residue under the A2M alignment convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueClass {
    /// An aligned (consensus-column) residue.
    Match,
    /// An inserted residue relative to the consensus.
    Insertion,
    /// A gap in a consensus column.
    Deletion,
}

impl ResidueClass {
    /// Classify a residue from an A2M-formatted alignment row: `-` is a
    /// deletion, `.` and lowercase letters are insertions, uppercase letters
    /// are matches. Any other byte classifies as a match.
    ///
    /// MSAs read from A3M or FASTA files are represented in A2M form, so
    /// rows from those formats classify correctly too.
    pub fn classify(r: Residue) -> ResidueClass {
        match r {
            b'-' => ResidueClass::Deletion,
            b'.' => ResidueClass::Insertion,
            _ if r.is_ascii_lowercase() => ResidueClass::Insertion,
            _ => ResidueClass::Match,
        }
    }
}
