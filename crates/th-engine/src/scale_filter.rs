//! Scale/key selection published to the quantizer.
//!
//! Every selection change builds a fresh [`ActiveScale`] and swaps it in
//! whole. Readers load whatever selection is current and never see a
//! half-built candidate list.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::error::TableError;
use crate::note_table::{Note, NoteTable};
use crate::quantizer::CandidateTones;
use crate::scale::{Key, Scale};

/// Notes of one scale in one key, plus the quantizer built from them.
#[derive(Clone, Debug)]
pub struct ActiveScale {
    scale: Scale,
    key: Key,
    notes: Vec<Note>,
    roots: Vec<Note>,
    tones: CandidateTones,
}

impl ActiveScale {
    /// Derive the scale's notes and roots from the full table.
    ///
    /// Chromatic uses the unrotated table. Other scales filter the rotated
    /// table and keep its ascending run, dropping notes that wrapped to the
    /// tail during rotation.
    pub fn build(table: &NoteTable, scale: Scale, key: Key) -> Result<Self, TableError> {
        let rotated = table.rotated(key);
        let roots = ascending_run(rotated.roots());
        let notes = match scale {
            Scale::Chromatic => table.notes().to_vec(),
            _ => ascending_run(rotated.filter_by_scale(scale.degrees())?),
        };
        let tones = CandidateTones::new(notes.iter().map(Note::frequency).collect())?;

        Ok(Self {
            scale,
            key,
            notes,
            roots,
            tones,
        })
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Candidate notes, ascending.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Root note of each octave in the active key.
    pub fn roots(&self) -> &[Note] {
        &self.roots
    }

    pub fn tones(&self) -> &CandidateTones {
        &self.tones
    }

    pub fn is_root(&self, note: &Note) -> bool {
        self.roots.iter().any(|r| r == note)
    }
}

fn ascending_run(notes: Vec<Note>) -> Vec<Note> {
    let end = notes
        .windows(2)
        .position(|w| w[1].frequency() <= w[0].frequency())
        .map_or(notes.len(), |i| i + 1);
    let mut notes = notes;
    notes.truncate(end);
    notes
}

/// Quantizer over an atomically swappable scale selection.
pub struct ScaleFilter {
    table: NoteTable,
    active: ArcSwap<ActiveScale>,
}

impl ScaleFilter {
    pub fn new(table: NoteTable, scale: Scale, key: Key) -> Result<Self, TableError> {
        let active = ActiveScale::build(&table, scale, key)?;
        Ok(Self {
            table,
            active: ArcSwap::from_pointee(active),
        })
    }

    pub fn table(&self) -> &NoteTable {
        &self.table
    }

    /// Current selection.
    pub fn active(&self) -> Arc<ActiveScale> {
        self.active.load_full()
    }

    /// Rebuild for `scale` in `key` and publish it.
    pub fn select(&self, scale: Scale, key: Key) -> Result<Arc<ActiveScale>, TableError> {
        let next = Arc::new(ActiveScale::build(&self.table, scale, key)?);
        self.active.store(Arc::clone(&next));
        log::debug!(
            "Scale selection {} in {}: {} candidates",
            scale,
            key,
            next.notes().len()
        );
        Ok(next)
    }

    pub fn set_scale(&self, scale: Scale) -> Result<Arc<ActiveScale>, TableError> {
        let key = self.active.load().key();
        self.select(scale, key)
    }

    pub fn set_key(&self, key: Key) -> Result<Arc<ActiveScale>, TableError> {
        let scale = self.active.load().scale();
        self.select(scale, key)
    }

    /// Quantize against the selection current at the time of the call.
    pub fn quantize(&self, frequency: f64) -> f64 {
        self.active.load().tones().quantize(frequency)
    }
}
