//! Grid cells and the targets that pop up in them

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Target types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Clean can, worth a point
    #[default]
    Normal,
    /// Dirty can, costs points when tapped
    Obstacle,
}

/// A live target occupying one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub cell: usize,
    pub kind: TargetKind,
    /// Virtual time the target appeared (ms)
    pub created_at_ms: u64,
}

/// Fixed grid of cells, each holding at most one target
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Option<Target>>,
    /// Cell used by the previous spawn
    last_index: Option<usize>,
}

impl Grid {
    pub fn new(cell_count: usize) -> Self {
        Self {
            cells: vec![None; cell_count],
            last_index: None,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Pick a cell uniformly, stepping forward one cell if it repeats the previous spawn
    pub fn choose_cell<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        let n = self.cells.len();
        if n == 0 {
            return None;
        }
        let mut idx = rng.random_range(0..n);
        if n > 1 && Some(idx) == self.last_index {
            idx = (idx + 1) % n;
        }
        self.last_index = Some(idx);
        Some(idx)
    }

    /// Put a target in its cell, returning whatever was there before
    pub fn place(&mut self, target: Target) -> Option<Target> {
        let cell = target.cell;
        match self.cells.get_mut(cell) {
            Some(slot) => slot.replace(target),
            None => None,
        }
    }

    /// Remove and return the target in `cell`
    pub fn take(&mut self, cell: usize) -> Option<Target> {
        self.cells.get_mut(cell).and_then(Option::take)
    }

    /// Remove the target with `id`, if it is still live
    pub fn take_by_id(&mut self, id: u32) -> Option<Target> {
        self.cells
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|t| t.id == id))
            .and_then(Option::take)
    }

    pub fn get(&self, cell: usize) -> Option<&Target> {
        self.cells.get(cell).and_then(Option::as_ref)
    }

    pub fn is_live(&self, id: u32) -> bool {
        self.live().any(|t| t.id == id)
    }

    /// Live targets in cell order
    pub fn live(&self) -> impl Iterator<Item = &Target> {
        self.cells.iter().flatten()
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Remove every live target, returning them in cell order
    pub fn clear(&mut self) -> Vec<Target> {
        self.cells.iter_mut().filter_map(Option::take).collect()
    }
}
