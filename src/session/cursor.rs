use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetAdvance {
    NextSet { set_index: u32 },
    ExerciseComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExerciseAdvance {
    Moved { exercise_index: usize },
    SessionComplete,
    AlreadyComplete,
}

/// Position within an ordered list of exercise blocks.
///
/// Holds `exercise_index < targets.len()` and
/// `set_index <= targets[exercise_index]` at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseCursor {
    targets: Vec<u32>,
    exercise_index: usize,
    set_index: u32,
    exhausted: bool,
}

impl ExerciseCursor {
    /// `targets` holds the prescribed set count of each block; `None` if empty.
    pub fn new(targets: Vec<u32>) -> Option<Self> {
        if targets.is_empty() {
            return None;
        }
        Some(Self {
            targets,
            exercise_index: 0,
            set_index: 0,
            exhausted: false,
        })
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn set_index(&self) -> u32 {
        self.set_index
    }

    pub fn block_count(&self) -> usize {
        self.targets.len()
    }

    pub fn current_target(&self) -> u32 {
        self.targets[self.exercise_index]
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn next_exercise_index(&self) -> Option<usize> {
        let next = self.exercise_index + 1;
        (next < self.targets.len()).then_some(next)
    }

    /// Sum of prescribed sets across all blocks.
    pub fn total_target_sets(&self) -> u32 {
        self.targets
            .iter()
            .fold(0u32, |acc, &sets| acc.saturating_add(sets))
    }

    pub fn advance_set(&mut self) -> SetAdvance {
        let target = self.current_target();
        if self.set_index < target {
            self.set_index += 1;
        }
        if self.set_index >= target {
            SetAdvance::ExerciseComplete
        } else {
            SetAdvance::NextSet {
                set_index: self.set_index,
            }
        }
    }

    pub fn advance_exercise(&mut self) -> ExerciseAdvance {
        if self.exhausted {
            return ExerciseAdvance::AlreadyComplete;
        }
        match self.next_exercise_index() {
            Some(next) => {
                self.exercise_index = next;
                self.set_index = 0;
                ExerciseAdvance::Moved {
                    exercise_index: next,
                }
            }
            None => {
                self.exhausted = true;
                ExerciseAdvance::SessionComplete
            }
        }
    }

    /// Jump to a block, clamped to the last one. Re-opens completed blocks.
    pub fn select_exercise(&mut self, index: usize) -> usize {
        self.exercise_index = index.min(self.targets.len() - 1);
        self.set_index = 0;
        self.exhausted = false;
        self.exercise_index
    }
}
