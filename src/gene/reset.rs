//! Reverting edits.

use super::model::{ChangeLogEntry, Gene};
use crate::codon::complement;

impl Gene {
    /// Undo every edit since construction.
    ///
    /// Pure substitution sessions are replayed backwards; any indel forces a
    /// restore from the construction snapshot. Calling this on an unedited
    /// gene is a no-op.
    pub fn reset(&mut self) {
        let log = std::mem::take(&mut self.change_log);
        if log.is_empty() {
            return;
        }

        if log.iter().all(ChangeLogEntry::is_substitution) && self.replay_substitutions(&log) {
            log::debug!("{}: reverted {} substitutions by replay", self.id, log.len());
        } else {
            let orig = std::mem::take(&mut self.orig);
            self.restore(&orig);
            self.orig = orig;
            log::debug!("{}: reverted {} edits from snapshot", self.id, log.len());
        }
        self.retranslate();
    }

    /// Write back the original base of each substitution, newest first.
    ///
    /// Returns `false` if an entry no longer maps into the gene.
    fn replay_substitutions(&mut self, log: &[ChangeLogEntry]) -> bool {
        for entry in log.iter().rev() {
            let ChangeLogEntry::Substitution { pos, from, .. } = entry else {
                return false;
            };
            let Some(local) = self.local_index(*pos as i64) else {
                return false;
            };
            let base = if self.is_plus_strand() {
                *from
            } else {
                complement(*from)
            };
            self.write_base(local, base);
        }
        true
    }
}
