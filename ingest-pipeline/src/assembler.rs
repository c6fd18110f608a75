//! Ordered assembly of per-batch ids into one result vector.
//!
//! Slots are preallocated for the whole input. Each batch owns the disjoint
//! range `[start_offset, start_offset + len)`, so placements never collide;
//! the vector is handed out only after every batch task has been joined.

use crate::errors::IngestError;

pub(crate) struct ResultAssembler {
    slots: Vec<Option<String>>,
    filled: usize,
}

impl ResultAssembler {
    pub(crate) fn with_len(total: usize) -> Self {
        Self {
            slots: vec![None; total],
            filled: 0,
        }
    }

    /// Writes `ids` into `[start, start + ids.len())`.
    pub(crate) fn place(&mut self, start: usize, ids: Vec<String>) -> Result<(), IngestError> {
        let end = start + ids.len();
        let Some(range) = self.slots.get_mut(start..end) else {
            return Err(IngestError::Internal(format!(
                "id range {start}..{end} exceeds result length {}",
                self.slots.len()
            )));
        };
        if range.iter().any(Option::is_some) {
            return Err(IngestError::Internal(format!(
                "id range {start}..{end} overlaps an earlier batch"
            )));
        }
        for (slot, id) in range.iter_mut().zip(ids) {
            *slot = Some(id);
        }
        self.filled += end - start;
        Ok(())
    }

    /// Returns the ordered ids once every slot is filled.
    pub(crate) fn finish(self) -> Result<Vec<String>, IngestError> {
        if self.filled != self.slots.len() {
            return Err(IngestError::Internal(format!(
                "only {} of {} ids assembled",
                self.filled,
                self.slots.len()
            )));
        }
        Ok(self.slots.into_iter().flatten().collect())
    }
}
