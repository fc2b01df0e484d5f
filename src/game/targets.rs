//! Per-slot occupancy of the grid.

use serde::Serialize;

use super::timers::TimerId;

/// What popped out of a hole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Mole,
    /// Penalty target: costs points and breaks the combo.
    Bomb,
    /// Power-up: slows spawning for a few seconds.
    Freeze,
}

impl TargetKind {
    /// CSS class used by the DOM renderer.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Mole => "mole",
            TargetKind::Bomb => "bomb",
            TargetKind::Freeze => "freeze",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Up and hittable; escapes when `expiry` fires.
    Showing { expiry: TimerId },
    /// Already hit; leaves the slot when `clear` fires.
    Struck { clear: TimerId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveTarget {
    pub kind: TargetKind,
    pub(crate) phase: Phase,
}

impl ActiveTarget {
    pub fn is_struck(&self) -> bool {
        matches!(self.phase, Phase::Struck { .. })
    }
}

/// Occupancy of the grid, one entry per hole. A slot holds at most one target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveTargets {
    slots: Vec<Option<ActiveTarget>>,
}

impl ActiveTargets {
    /// Empty set sized for `holes` slots.
    pub fn with_holes(holes: usize) -> Self {
        Self {
            slots: vec![None; holes],
        }
    }

    pub fn hole_count(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&ActiveTarget> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn kind(&self, slot: usize) -> Option<TargetKind> {
        self.get(slot).map(|t| t.kind)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn free_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ActiveTarget)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|t| (i, t)))
    }

    /// Occupy a free slot. Returns false (and changes nothing) if the slot is
    /// taken or out of range.
    pub(crate) fn occupy(&mut self, slot: usize, kind: TargetKind, expiry: TimerId) -> bool {
        match self.slots.get_mut(slot) {
            Some(cell) if cell.is_none() => {
                *cell = Some(ActiveTarget {
                    kind,
                    phase: Phase::Showing { expiry },
                });
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_phase(&mut self, slot: usize, phase: Phase) {
        if let Some(Some(target)) = self.slots.get_mut(slot) {
            target.phase = phase;
        }
    }

    pub(crate) fn remove(&mut self, slot: usize) -> Option<ActiveTarget> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Empty every slot, returning the indices that were occupied.
    pub(crate) fn drain(&mut self) -> Vec<usize> {
        let occupied: Vec<usize> = self.iter().map(|(i, _)| i).collect();
        for slot in &occupied {
            self.slots[*slot] = None;
        }
        occupied
    }
}
