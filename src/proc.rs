use std::mem;

use tracing::debug;

use crate::grid::{Cell, Grid};

/// Neighbour thresholds of a two-state life rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub min_survival: u8,
    pub max_survival: u8,
    pub reproduction: u8,
}

impl Rules {
    /// B3/S23.
    pub const CONWAY: Rules = Rules {
        min_survival: 2,
        max_survival: 3,
        reproduction: 3,
    };

    pub fn next(&self, current: Cell, live_neighbors: u8) -> Cell {
        match current {
            Cell::Alive => {
                (self.min_survival..=self.max_survival).contains(&live_neighbors).into()
            }
            Cell::Dead => (live_neighbors == self.reproduction).into(),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::CONWAY
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Extinct { generation: u64 },
    CapReached { generation: u64 },
}

/// Owns the current generation and advances it one step at a time.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    back: Grid,
    generation: u64,
    max_generations: Option<u64>,
    rules: Rules,
}

impl Engine {
    #[inline]
    pub fn new(grid: Grid, max_generations: Option<u64>) -> Self {
        Self::with_rules(grid, max_generations, Rules::CONWAY)
    }

    pub fn with_rules(grid: Grid, max_generations: Option<u64>, rules: Rules) -> Self {
        let back = grid.clone();
        Engine {
            grid,
            back,
            generation: 0,
            max_generations,
            rules,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[inline]
    pub fn generation_count(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn max_generations(&self) -> Option<u64> {
        self.max_generations
    }

    #[inline]
    pub fn is_extinct(&self) -> bool {
        self.grid.is_extinct()
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// `None` while the run can go on. A run that reaches the cap counts as
    /// capped even when its last generation is empty; `Extinct` means the
    /// population died out before the cap.
    pub fn outcome(&self) -> Option<Outcome> {
        let generation = self.generation;
        if self.max_generations.is_some_and(|m| generation >= m) {
            Some(Outcome::CapReached { generation })
        } else if self.is_extinct() {
            Some(Outcome::Extinct { generation })
        } else {
            None
        }
    }

    /// Computes the next generation from the current one and swaps it in.
    ///
    /// Every cell reads only the pre-step grid; the result is written to the
    /// back buffer, so no cell sees a neighbour's new state.
    pub fn step(&mut self) {
        let size = self.grid.size();
        for i in 0..size {
            for j in 0..size {
                let next = self
                    .rules
                    .next(self.grid.get(i, j), self.grid.live_neighbors(i, j));
                self.back.set(i, j, next);
            }
        }
        mem::swap(&mut self.grid, &mut self.back);
        self.generation += 1;
        debug!(
            generation = self.generation,
            live = self.grid.live_count(),
            "generation computed"
        );
    }
}
