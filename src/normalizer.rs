//! Column-wise standardization of a window. Mean and standard deviation
//! are computed from the window's own rows, not from a scaler fit on the
//! training set; that mirrors how the reference classifier was trained
//! (the capture scripts re-fit a scaler on every buffer), so per-window
//! statistics are the contract here even though they discard cross-window
//! scale information.

use crate::window_buffer::Window;

/// A window after standardization, ready for the classifier. Transient;
/// consumed by one predict call and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWindow {
    rows: Vec<Vec<f32>>,
}

impl NormalizedWindow {
    /// The standardized rows, oldest first.
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

/// Standardizes each column of the window to zero mean and unit variance,
/// using the population standard deviation. A column with zero variance
/// maps to all zeros rather than dividing by zero.
pub fn standardize(window: &Window) -> NormalizedWindow {
    let n = window.len();
    let width = window.width();
    if n == 0 {
        return NormalizedWindow { rows: Vec::new() };
    }

    let mut means = vec![0.0f32; width];
    for row in window.rows() {
        for (m, v) in means.iter_mut().zip(row) {
            *m += v;
        }
    }
    for m in &mut means {
        *m /= n as f32;
    }

    let mut stds = vec![0.0f32; width];
    for row in window.rows() {
        for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
            *s += (v - m) * (v - m);
        }
    }
    for s in &mut stds {
        *s = (*s / n as f32).sqrt();
    }

    let rows = window
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&means)
                .zip(&stds)
                .map(|((v, m), s)| if *s > 0.0 { (v - m) / s } else { 0.0 })
                .collect()
        })
        .collect();

    NormalizedWindow { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_buffer::Window;

    fn column(window_rows: &[Vec<f32>], i: usize) -> Vec<f32> {
        window_rows.iter().map(|r| r[i]).collect()
    }

    #[test]
    fn known_values() {
        // Column 0 has mean 2 and population std sqrt(2/3).
        let window = Window::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]);
        let normalized = standardize(&window);
        let std = (2.0f32 / 3.0).sqrt();
        let col = column(normalized.rows(), 0);
        assert!((col[0] + 1.0 / std).abs() < 1e-5);
        assert!(col[1].abs() < 1e-6);
        assert!((col[2] - 1.0 / std).abs() < 1e-5);
    }

    #[test]
    fn zero_variance_column_maps_to_zeros() {
        let window = Window::from_rows(vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]]);
        let normalized = standardize(&window);
        for v in column(normalized.rows(), 0) {
            assert_eq!(v, 0.0);
            assert!(!v.is_nan());
        }
        // The varying column still standardizes normally.
        assert!(column(normalized.rows(), 1)[0] < 0.0);
    }

    #[test]
    fn standardizing_twice_is_stable() {
        let window = Window::from_rows(vec![
            vec![10.0, -3.0],
            vec![20.0, 0.5],
            vec![35.0, 2.0],
            vec![15.0, 9.0],
        ]);
        let once = standardize(&window);
        let twice = standardize(&Window::from_rows(once.rows().to_vec()));

        // A standardized window has mean ~0 and std ~1 per column, so a
        // second pass changes nearly nothing.
        for (a, b) in once.rows().iter().flatten().zip(twice.rows().iter().flatten()) {
            assert!((a - b).abs() < 1e-4);
        }
        for i in 0..2 {
            let col = column(twice.rows(), i);
            let mean: f32 = col.iter().sum::<f32>() / col.len() as f32;
            let var: f32 =
                col.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / col.len() as f32;
            assert!(mean.abs() < 1e-5);
            assert!((var.sqrt() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn shape_is_preserved() {
        let window = Window::from_rows(vec![vec![1.0; 11]; 64]);
        let normalized = standardize(&window);
        assert_eq!(normalized.len(), 64);
        assert_eq!(normalized.width(), 11);
    }
}
