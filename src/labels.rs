//! Tracks which character the writer is supposed to be recording. During
//! dataset collection the pen cycles through a fixed label set: each press
//! of the activation switch moves to the next character, and the cycle
//! wraps around once every label has been visited.

/// The label set the reference dataset was collected with: a noise class,
/// upper and lower case letters, and digits. Order matters; it must match
/// the class indices the classifier was trained with.
pub fn full_character_set() -> Vec<String> {
    let mut labels = vec!["noise".to_string()];
    labels.extend(('A'..='Z').map(|c| c.to_string()));
    labels.extend(('a'..='z').map(|c| c.to_string()));
    labels.extend(('0'..='9').map(|c| c.to_string()));
    labels
}

/// What a start marker meant for the label cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// First activation since boot; arms recording without advancing.
    First,
    /// Advanced to the next label in the set.
    Advanced,
    /// Advanced past the last label and wrapped back to the first. Every
    /// label has now been recorded once.
    PassComplete,
}

/// The current-label counter, with the first-activation and wrap-around
/// rules made explicit. The very first start marker after boot only arms
/// the cycle, so the writer's first session records the initial label.
#[derive(Debug, Clone)]
pub struct LabelCycle {
    labels: Vec<String>,
    index: usize,
    armed: bool,
}

impl LabelCycle {
    /// Builds a cycle over the given label set.
    pub fn new(labels: Vec<String>) -> Self {
        assert!(!labels.is_empty(), "label set must not be empty");
        Self {
            labels,
            index: 0,
            armed: false,
        }
    }

    /// The label currently being recorded.
    pub fn current(&self) -> &str {
        &self.labels[self.index]
    }

    /// Position within the label set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of labels in the set.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True only for an empty label set, which the constructor forbids.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Applies one start marker to the cycle.
    pub fn on_activation(&mut self) -> Activation {
        if !self.armed {
            self.armed = true;
            return Activation::First;
        }
        self.index += 1;
        if self.index == self.labels.len() {
            self.index = 0;
            return Activation::PassComplete;
        }
        Activation::Advanced
    }
}
