//! In-memory model definition.

use crate::{AcmodId, AcmodSet, PhoneId, TiedStateId};

/// State list and transition matrix of one acoustic-model unit.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ModelDefEntry {
    pub acmod: AcmodId,
    pub tmat: u32,
    /// One entry per state; `NO_ID` for non-emitting states.
    pub states: Vec<TiedStateId>,
}

impl ModelDefEntry {
    #[inline]
    pub fn n_state(&self) -> usize {
        self.states.len()
    }

    pub fn is_emitting(&self, state: usize) -> bool {
        self.states.get(state).is_some_and(|s| s.is_valid())
    }
}

/// A complete model definition: catalog, per-unit entries and counts.
///
/// `entries` is indexed by [`AcmodId`], so CI entries come first.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ModelDef {
    pub acmod_set: AcmodSet,
    pub entries: Vec<ModelDefEntry>,
    pub n_tied_state: u32,
    pub n_tied_ci_state: u32,
    pub n_tied_tmat: u32,
}

impl ModelDef {
    pub fn entry(&self, acmod: AcmodId) -> Option<&ModelDefEntry> {
        self.entries.get(acmod.index())
    }

    /// Number of states (emitting or not) of a CI phone's model.
    pub fn n_state(&self, phone: PhoneId) -> Option<usize> {
        self.entry(AcmodId::from(phone)).map(ModelDefEntry::n_state)
    }

    /// Total number of states across all units (`n_state_map`).
    pub fn n_total_state(&self) -> usize {
        self.entries.iter().map(ModelDefEntry::n_state).sum()
    }

    /// Iterate the CI entries.
    pub fn ci_entries(&self) -> impl Iterator<Item = &ModelDefEntry> {
        self.entries.iter().take(self.acmod_set.n_ci())
    }

    /// Iterate the CD entries.
    pub fn cd_entries(&self) -> impl Iterator<Item = &ModelDefEntry> {
        self.entries.iter().skip(self.acmod_set.n_ci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(acmod: u32, states: &[u32]) -> ModelDefEntry {
        let mut states: Vec<_> = states.iter().copied().map(TiedStateId::new).collect();
        states.push(TiedStateId::NO_ID);
        ModelDefEntry {
            acmod: AcmodId::new(acmod),
            tmat: 0,
            states,
        }
    }

    #[test]
    fn test_emitting_states() {
        let e = entry(0, &[0, 1, 2]);
        assert_eq!(e.n_state(), 4);
        assert!(e.is_emitting(0));
        assert!(e.is_emitting(2));
        assert!(!e.is_emitting(3));
        assert!(!e.is_emitting(4));
    }

    #[test]
    fn test_counts_and_partitions() {
        let mut acmod_set = AcmodSet::new();
        let aa = acmod_set.add_phone("AA", vec![]).unwrap();
        let mdef = ModelDef {
            acmod_set,
            entries: vec![entry(0, &[0, 1, 2])],
            n_tied_state: 3,
            n_tied_ci_state: 3,
            n_tied_tmat: 1,
        };
        assert_eq!(mdef.n_total_state(), 4);
        assert_eq!(mdef.n_state(aa), Some(4));
        assert_eq!(mdef.ci_entries().count(), 1);
        assert_eq!(mdef.cd_entries().count(), 0);
    }
}
