//! The session buffer and its window extraction policy. Samples accumulate
//! in a deque between the start and stop markers; depending on the
//! configured [WindowMode] the buffer either emits overlapping windows as
//! the stream runs, or one padded window for the whole session when it
//! ends. Prefix eviction is a deque drain, so a long session never gets
//! reallocated wholesale to reclaim consumed rows.

use crate::config::{PenConfig, WindowMode};
use std::collections::VecDeque;

/// A fixed-length slice of consecutive samples, detached from the session
/// buffer. Every window handed out has exactly `window_size` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    rows: Vec<Vec<f32>>,
}

impl Window {
    /// Builds a window directly from rows. All rows must have the same
    /// width; mostly useful in tests and classifier backends.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        if let Some(first) = rows.first() {
            assert!(
                rows.iter().all(|r| r.len() == first.len()),
                "window rows must all have the same width"
            );
        }
        Self { rows }
    }

    /// The sample rows, oldest first.
    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the window holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of feature columns per row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }
}

/// Owns the live session's samples and applies the windowing policy.
pub struct WindowBuffer {
    rows: VecDeque<Vec<f32>>,
    width: usize,
    window_size: usize,
    window_step: usize,
    // Rows still owed to the last step when it exceeded what was
    // buffered; incoming rows are discarded until this reaches zero.
    pending_skip: usize,
    mode: WindowMode,
}

impl WindowBuffer {
    /// Builds an empty buffer for the given configuration.
    pub fn new(config: &PenConfig) -> Self {
        Self {
            rows: VecDeque::new(),
            width: config.feature_count(),
            window_size: config.window_size,
            window_step: config.window_step,
            pending_skip: 0,
            mode: config.mode,
        }
    }

    /// Rows currently buffered.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows are buffered.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A start marker discards whatever a previously aborted session left
    /// behind.
    pub fn start_session(&mut self) {
        self.rows.clear();
        self.pending_skip = 0;
    }

    /// Appends one sample. In sliding mode this returns every window that
    /// became ready: the first `window_size` buffered rows are copied out
    /// and `window_step` rows are evicted from the front, repeating while
    /// enough rows remain. A step larger than the window leaves a gap; the
    /// part of the step that ran past the buffer is charged against the
    /// rows that arrive next. In single-shot mode samples only accumulate.
    pub fn push(&mut self, values: Vec<f32>) -> Vec<Window> {
        debug_assert_eq!(values.len(), self.width, "row width mismatch");
        if self.pending_skip > 0 {
            self.pending_skip -= 1;
            return Vec::new();
        }
        self.rows.push_back(values);

        let mut ready = Vec::new();
        if self.mode == WindowMode::Sliding {
            while self.rows.len() >= self.window_size {
                let rows: Vec<Vec<f32>> =
                    self.rows.iter().take(self.window_size).cloned().collect();
                ready.push(Window { rows });
                let drained = self.window_step.min(self.rows.len());
                self.rows.drain(..drained);
                self.pending_skip = self.window_step - drained;
            }
        }
        ready
    }

    /// A stop marker ends the session. Single-shot mode emits one window
    /// for the whole session, truncated at the tail if too long and padded
    /// with zero rows at the tail if too short; an empty session emits
    /// nothing. Sliding mode just clears. Either way the buffer is empty
    /// afterwards.
    pub fn end_session(&mut self) -> Option<Window> {
        self.pending_skip = 0;
        let mut rows: Vec<Vec<f32>> = self.rows.drain(..).collect();
        if rows.is_empty() || self.mode == WindowMode::Sliding {
            return None;
        }
        rows.truncate(self.window_size);
        while rows.len() < self.window_size {
            rows.push(vec![0.0; self.width]);
        }
        Some(Window { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PenConfig;

    fn config(size: usize, step: usize, mode: WindowMode) -> PenConfig {
        let mut config = PenConfig::imu_force_optic();
        config.window_size = size;
        config.window_step = step;
        config.mode = mode;
        config
    }

    fn row(width: usize, fill: f32) -> Vec<f32> {
        vec![fill; width]
    }

    #[test]
    fn sliding_emits_after_window_size_rows() {
        let mut buf = WindowBuffer::new(&config(4, 2, WindowMode::Sliding));
        let mut windows = Vec::new();
        for i in 0..10 {
            windows.extend(buf.push(row(12, i as f32)));
        }
        // floor((10 - 4) / 2) + 1
        assert_eq!(windows.len(), 4);
        for w in &windows {
            assert_eq!(w.len(), 4);
            assert_eq!(w.width(), 12);
        }
        assert_eq!(windows[0].rows()[0], row(12, 0.0));
        assert_eq!(windows[1].rows()[0], row(12, 2.0));
    }

    #[test]
    fn seventy_rows_size_64_step_32_yields_one_window() {
        let mut buf = WindowBuffer::new(&config(64, 32, WindowMode::Sliding));
        let mut windows = Vec::new();
        for i in 0..70 {
            windows.extend(buf.push(row(12, i as f32)));
        }
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].rows()[0], row(12, 0.0));
        assert_eq!(windows[0].rows()[63], row(12, 63.0));
        // 38 rows left over: not enough for a second window.
        assert_eq!(buf.len(), 38);
        assert_eq!(buf.end_session(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn step_larger_than_window_leaves_gaps() {
        let mut buf = WindowBuffer::new(&config(2, 5, WindowMode::Sliding));
        let mut windows = Vec::new();
        for i in 0..12 {
            windows.extend(buf.push(row(12, i as f32)));
        }
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[1].rows()[0], row(12, 5.0));
        assert_eq!(windows[2].rows()[0], row(12, 10.0));
        // Rows 2..5 and 7..10 fell in the gaps and never reached a window.
        assert!(buf.is_empty());
    }

    #[test]
    fn session_start_clears_a_pending_gap() {
        let mut buf = WindowBuffer::new(&config(2, 5, WindowMode::Sliding));
        buf.push(row(12, 0.0));
        assert_eq!(buf.push(row(12, 1.0)).len(), 1);
        // Mid-gap restart: the new session owes nothing to the old step.
        buf.start_session();
        buf.push(row(12, 8.0));
        let windows = buf.push(row(12, 9.0));
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].rows()[0], row(12, 8.0));
    }

    #[test]
    fn single_shot_pads_short_session_with_zero_rows() {
        let mut buf = WindowBuffer::new(&config(64, 32, WindowMode::SingleShot));
        for i in 0..40 {
            assert!(buf.push(row(12, 1.0 + i as f32)).is_empty());
        }
        let window = buf.end_session().unwrap();
        assert_eq!(window.len(), 64);
        assert_eq!(window.rows()[39], row(12, 40.0));
        for padded in &window.rows()[40..] {
            assert_eq!(padded, &row(12, 0.0));
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn single_shot_truncates_long_session_from_the_tail() {
        let mut buf = WindowBuffer::new(&config(4, 4, WindowMode::SingleShot));
        for i in 0..9 {
            buf.push(row(12, i as f32));
        }
        let window = buf.end_session().unwrap();
        assert_eq!(window.len(), 4);
        assert_eq!(window.rows()[0], row(12, 0.0));
        assert_eq!(window.rows()[3], row(12, 3.0));
    }

    #[test]
    fn empty_session_emits_no_window() {
        let mut buf = WindowBuffer::new(&config(64, 32, WindowMode::SingleShot));
        assert_eq!(buf.end_session(), None);
    }

    #[test]
    fn session_start_discards_partial_buffer() {
        let mut buf = WindowBuffer::new(&config(64, 32, WindowMode::SingleShot));
        for _ in 0..10 {
            buf.push(row(12, 7.0));
        }
        buf.start_session();
        assert!(buf.is_empty());
        assert_eq!(buf.end_session(), None);
    }
}
