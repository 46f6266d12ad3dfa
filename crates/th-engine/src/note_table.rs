//! Equal-tempered note lattice.
//!
//! A single base octave (octave 0) is replicated upward by powers of two.
//! Rotating the lattice by a key offset and then keeping positions whose
//! index mod 12 is in a scale's degree set yields the notes of that scale
//! in that key.

use crate::error::TableError;
use crate::scale::Key;

/// Chromatic notes per octave.
pub const NOTES_PER_OCTAVE: usize = 12;

/// Octaves in the standard table (C0 through B10).
pub const DEFAULT_OCTAVES: usize = 11;

/// Semitone ratio used for the sharps of the base octave.
const SHARP: f64 = 1.05946;

/// Octave-0 frequencies, C0 through B0 ("Musical Instrument Design", Hopkin).
pub const BASE_FREQUENCIES: [f64; NOTES_PER_OCTAVE] = [
    16.352,
    16.352 * SHARP,
    18.354,
    18.354 * SHARP,
    20.602,
    21.827,
    21.827 * SHARP,
    24.500,
    24.500 * SHARP,
    27.500,
    27.500 * SHARP,
    30.868,
];

/// Octave-0 labels; `*` is replaced with the octave number.
pub const BASE_LABELS: [&str; NOTES_PER_OCTAVE] = [
    "C*", "C*#", "D*", "D*#", "E*", "F*", "F*#", "G*", "G*#", "A*", "A*#", "B*",
];

/// A labelled pitch.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    label: String,
    frequency: f64,
}

impl Note {
    pub fn new(label: impl Into<String>, frequency: f64) -> Self {
        Self {
            label: label.into(),
            frequency,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

/// Ordered sequence of notes, twelve per octave.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteTable {
    notes: Vec<Note>,
}

impl NoteTable {
    /// Build a table from a base octave replicated across `octaves` octaves.
    ///
    /// Only the first twelve base entries are used.
    pub fn build(
        base_frequencies: &[f64],
        base_labels: &[&str],
        octaves: usize,
    ) -> Result<Self, TableError> {
        if base_frequencies.len() < NOTES_PER_OCTAVE {
            return Err(TableError::TooFewBaseNotes(base_frequencies.len()));
        }
        if base_labels.len() != base_frequencies.len() {
            return Err(TableError::LabelCountMismatch {
                frequencies: base_frequencies.len(),
                labels: base_labels.len(),
            });
        }
        if octaves == 0 {
            return Err(TableError::ZeroOctaves);
        }

        Ok(Self {
            notes: lattice(base_frequencies, base_labels, octaves),
        })
    }

    /// The standard eleven-octave table.
    pub fn standard() -> Self {
        Self::with_octaves(DEFAULT_OCTAVES)
    }

    /// The standard base octave over `octaves` octaves (at least one).
    pub fn with_octaves(octaves: usize) -> Self {
        Self {
            notes: lattice(&BASE_FREQUENCIES, &BASE_LABELS, octaves.max(1)),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Rotate left by the key's semitone offset.
    ///
    /// The first `offset` notes move to the end, so position 0 of the result
    /// is the key's tonic in octave 0. The moved notes break ascending order
    /// at the tail.
    pub fn rotated(&self, key: Key) -> NoteTable {
        let mut notes = self.notes.clone();
        if !notes.is_empty() {
            let offset = key.offset() % notes.len();
            notes.rotate_left(offset);
        }
        NoteTable { notes }
    }

    /// Keep notes whose position mod 12 is one of `degrees`.
    pub fn filter_by_scale(&self, degrees: &[u8]) -> Result<Vec<Note>, TableError> {
        if degrees.is_empty() {
            return Err(TableError::EmptyDegreeSet);
        }
        if let Some(&bad) = degrees.iter().find(|&&d| d as usize >= NOTES_PER_OCTAVE) {
            return Err(TableError::DegreeOutOfRange(bad));
        }

        Ok(self
            .notes
            .iter()
            .enumerate()
            .filter(|(i, _)| degrees.contains(&((i % NOTES_PER_OCTAVE) as u8)))
            .map(|(_, note)| note.clone())
            .collect())
    }

    /// Degree-0 notes of each octave.
    pub fn roots(&self) -> Vec<Note> {
        self.notes
            .iter()
            .step_by(NOTES_PER_OCTAVE)
            .cloned()
            .collect()
    }
}

fn lattice(base_frequencies: &[f64], base_labels: &[&str], octaves: usize) -> Vec<Note> {
    let mut notes = Vec::with_capacity(octaves * NOTES_PER_OCTAVE);
    for octave in 0..octaves {
        let scale = 2f64.powi(octave as i32);
        let octave_name = octave.to_string();
        for (label, freq) in base_labels.iter().zip(base_frequencies).take(NOTES_PER_OCTAVE) {
            notes.push(Note::new(label.replace('*', &octave_name), freq * scale));
        }
    }
    notes
}

impl Default for NoteTable {
    fn default() -> Self {
        Self::standard()
    }
}
