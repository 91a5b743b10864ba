//! Alphabets, sequences, and emission profiles for the physalia workspace.
//!
//! Provides the data layer shared by the alignment and profile-HMM engines:
//!
//! - **Alphabets** — [`Alphabet`], an ordered residue set with a constant-time
//!   position index ([`AlphabetIndex`])
//! - **Sequences** — [`Sequence`], a named run of [`Residue`] bytes
//! - **Emission tables** — [`EProbs`], dense per-residue probability vectors
//! - **Profiles** — [`FrequencyProfile`] column counts and their log-odds
//!   [`Profile`] form
//!
//! # Example
//!
//! ```
//! use physalia_seq::{Alphabet, FrequencyProfile, Sequence};
//!
//! let alpha = Alphabet::from_bytes(b"ABC");
//! let mut counts = FrequencyProfile::new(3, alpha.clone());
//! counts.add(&Sequence::from_text("1", "ABC")).unwrap();
//! counts.add(&Sequence::from_text("2", "ABC")).unwrap();
//!
//! let mut null = FrequencyProfile::new(1, alpha);
//! null.add(&Sequence::from_text("bg", "A")).unwrap();
//! null.add(&Sequence::from_text("bg", "B")).unwrap();
//! null.add(&Sequence::from_text("bg", "C")).unwrap();
//!
//! let profile = counts.profile(&null).unwrap();
//! assert_eq!(profile.emissions.len(), 3);
//! ```

pub mod alphabet;
pub mod emissions;
pub mod profile;
pub mod sequence;

pub use alphabet::{Alphabet, AlphabetIndex};
pub use emissions::EProbs;
pub use profile::{FrequencyProfile, Profile};
pub use sequence::{Residue, ResidueClass, Sequence};
