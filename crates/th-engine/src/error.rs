//! Note table and scale construction errors.

/// Error type for building note tables and candidate sets.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// Base octave has fewer than twelve frequencies
    TooFewBaseNotes(usize),
    /// Base labels don't line up with base frequencies
    LabelCountMismatch { frequencies: usize, labels: usize },
    /// A table needs at least one octave
    ZeroOctaves,
    /// Scale has no degrees
    EmptyDegreeSet,
    /// Scale degree outside 0..12
    DegreeOutOfRange(u8),
    /// Quantizer was given nothing to snap to
    EmptyCandidates,
    /// Candidate tones must be strictly ascending
    Unsorted { index: usize },
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::TooFewBaseNotes(n) => {
                write!(f, "Base octave needs 12 notes, got {}", n)
            }
            TableError::LabelCountMismatch { frequencies, labels } => write!(
                f,
                "Base octave has {} frequencies but {} labels",
                frequencies, labels
            ),
            TableError::ZeroOctaves => write!(f, "Note table needs at least one octave"),
            TableError::EmptyDegreeSet => write!(f, "Scale degree set is empty"),
            TableError::DegreeOutOfRange(d) => write!(f, "Scale degree {} is not in 0..12", d),
            TableError::EmptyCandidates => write!(f, "No candidate tones to quantize against"),
            TableError::Unsorted { index } => {
                write!(f, "Candidate tones not ascending at index {}", index)
            }
        }
    }
}

impl std::error::Error for TableError {}
