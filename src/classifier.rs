//! The classifier seam. The actual sequence model (and its CTC decoding)
//! lives outside this crate; the pipeline only needs something that can
//! turn a standardized window into an opaque result. [DummyClassifier]
//! stands in for the trained model in the monitor binary and in tests.

use crate::normalizer::NormalizedWindow;
use std::fmt;

/// Things a classifier backend can report instead of a prediction.
#[derive(Debug)]
pub enum ClassifierError {
    /// The backend itself failed (model runtime, FFI, subprocess...).
    Backend(String),
    /// The window's column count does not match what the model expects.
    ShapeMismatch {
        /// Columns the model was built for.
        expected: usize,
        /// Columns the window actually has.
        got: usize,
    },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::Backend(msg) => write!(f, "classifier backend error: {}", msg),
            ClassifierError::ShapeMismatch { expected, got } => {
                write!(f, "window has {} columns, model expects {}", got, expected)
            }
        }
    }
}

impl std::error::Error for ClassifierError {}

/// An external capability that scores one window at a time. The output is
/// opaque to the pipeline; decoding class scores into text is the model
/// layer's concern.
pub trait Classifier {
    /// Whatever the backend produces for one window.
    type Output: Send + 'static;

    /// Scores a single standardized window.
    fn predict(&mut self, window: &NormalizedWindow) -> Result<Self::Output, ClassifierError>;
}

/// A deterministic stand-in for the trained model. It hashes the window's
/// energy into the label set, which is meaningless as recognition but
/// exercises every seam the real model will sit behind.
pub struct DummyClassifier {
    labels: Vec<String>,
    expected_width: usize,
}

impl DummyClassifier {
    /// Builds a dummy over the given label set, checking windows against
    /// the given column count.
    pub fn new(labels: Vec<String>, expected_width: usize) -> Self {
        assert!(!labels.is_empty(), "label set must not be empty");
        Self {
            labels,
            expected_width,
        }
    }
}

impl Classifier for DummyClassifier {
    type Output = String;

    fn predict(&mut self, window: &NormalizedWindow) -> Result<String, ClassifierError> {
        if window.width() != self.expected_width {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.expected_width,
                got: window.width(),
            });
        }
        let energy: f32 = window.rows().iter().flatten().map(|v| v.abs()).sum();
        let index = (energy * 100.0) as usize % self.labels.len();
        Ok(self.labels[index].clone())
    }
}
