//! A simulated pen for development without hardware. A background thread
//! emits the same line mix the firmware produces: an activation marker, a
//! burst of comma-separated samples shaped like a stroke, a deactivation
//! marker, then a pause, over and over until stopped.

use rand::prelude::*;
use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

enum Signal {
    StrokeLen(usize),
    Noise(f32),
    Stop,
}

/// Handle to the simulated pen. Iterate to drain generated lines; the
/// queue fills in the background until [DummyPen::stop] is called.
pub struct DummyPen {
    handle: Option<thread::JoinHandle<()>>,
    tx: mpsc::Sender<Signal>,
    lines: Arc<Mutex<VecDeque<String>>>,
}

/// Configures and launches a [DummyPen].
pub struct DummyPenBuilder {
    channels: usize,
    stroke_len: usize,
    noise: f32,
    sample_period: Duration,
    start_marker: String,
    stop_marker: String,
}

impl Default for DummyPenBuilder {
    fn default() -> Self {
        Self {
            channels: 11,
            stroke_len: 80,
            noise: 0.05,
            sample_period: Duration::from_millis(5),
            start_marker: "System Activated".to_string(),
            stop_marker: "System Deactivated".to_string(),
        }
    }
}

impl DummyPenBuilder {
    /// Number of sensor channels per sample line.
    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Samples emitted between activation and deactivation.
    pub fn stroke_len(mut self, stroke_len: usize) -> Self {
        self.stroke_len = stroke_len;
        self
    }

    /// Relative noise added to each sample.
    pub fn noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    /// Delay between consecutive sample lines.
    pub fn sample_period(mut self, sample_period: Duration) -> Self {
        self.sample_period = sample_period;
        self
    }

    /// Control markers to emit, for simulating other firmware variants.
    pub fn markers(mut self, start: &str, stop: &str) -> Self {
        self.start_marker = start.to_string();
        self.stop_marker = stop.to_string();
        self
    }

    /// Spawns the generator thread and returns the pen handle.
    pub fn build(self) -> DummyPen {
        let (tx, rx) = mpsc::channel::<Signal>();
        let lines = Arc::new(Mutex::new(VecDeque::new()));
        let th_lines = Arc::clone(&lines);

        let handle = thread::spawn(move || {
            let mut rng = thread_rng();
            let mut running = true;
            let mut stroke_len = self.stroke_len;
            let mut noise = self.noise;
            while running {
                th_lines
                    .lock()
                    .unwrap()
                    .push_back(self.start_marker.clone());
                for i in 0..stroke_len {
                    if let Ok(received) = rx.try_recv() {
                        match received {
                            Signal::StrokeLen(new_len) => stroke_len = new_len,
                            Signal::Noise(new_noise) => noise = new_noise,
                            Signal::Stop => {
                                running = false;
                                break;
                            }
                        }
                    }
                    let line = generate_sample(&mut rng, self.channels, i, noise);
                    th_lines.lock().unwrap().push_back(line);
                    spin_sleep::sleep(self.sample_period);
                }
                th_lines
                    .lock()
                    .unwrap()
                    .push_back(self.stop_marker.clone());
                spin_sleep::sleep(self.sample_period * 4);
            }
        });

        DummyPen {
            handle: Some(handle),
            tx,
            lines,
        }
    }
}

/// One synthetic sample: a slow sinusoid per channel, phase-shifted so the
/// channels are distinguishable, plus noise. Magnitudes are roughly what
/// the real IMU reports.
fn generate_sample(rng: &mut ThreadRng, channels: usize, step: usize, noise: f32) -> String {
    (0..channels)
        .map(|c| {
            let base = ((step as f32) * 0.2 + c as f32).sin() * 512.0;
            let jitter = rng.gen_range(-1.0..1.0) * noise * 512.0;
            format!("{:.2}", base + jitter)
        })
        .collect::<Vec<_>>()
        .join(",")
}

impl DummyPen {
    /// Starts building a simulated pen.
    pub fn builder() -> DummyPenBuilder {
        DummyPenBuilder::default()
    }

    /// Changes the stroke length for subsequent sessions. Ignored once the
    /// generator has stopped.
    pub fn set_stroke_len(&self, stroke_len: usize) {
        let _ = self.tx.send(Signal::StrokeLen(stroke_len));
    }

    /// Changes the noise level for subsequent samples. Ignored once the
    /// generator has stopped.
    pub fn set_noise(&self, noise: f32) {
        let _ = self.tx.send(Signal::Noise(noise));
    }

    /// Stops the generator thread and waits for it to finish.
    pub fn stop(&mut self) {
        // The generator may already have exited; a dead channel is fine.
        let _ = self.tx.send(Signal::Stop);
        if let Some(thread) = self.handle.take() {
            thread.join().unwrap();
        }
    }
}

impl Iterator for DummyPen {
    type Item = String;
    fn next(&mut self) -> Option<Self::Item> {
        self.lines.lock().unwrap().pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PenConfig;
    use crate::framer::{Event, LineFramer};

    #[test]
    fn generated_lines_frame_cleanly() {
        let config = PenConfig::all_sensors();
        let framer = LineFramer::new(&config);
        let mut pen = DummyPen::builder()
            .channels(config.feature_count())
            .stroke_len(5)
            .sample_period(Duration::from_micros(100))
            .build();

        // Let it produce at least one full session.
        let mut collected = Vec::new();
        while collected.len() < 8 {
            if let Some(line) = pen.next() {
                collected.push(line);
            }
        }
        pen.stop();

        assert_eq!(framer.classify(&collected[0]), Event::SessionStart);
        for line in &collected[1..6] {
            assert!(matches!(framer.classify(line), Event::DataRow(_)));
        }
    }

    #[test]
    fn tuning_a_stopped_pen_is_a_no_op() {
        let mut pen = DummyPen::builder()
            .stroke_len(1)
            .sample_period(Duration::from_micros(100))
            .build();
        pen.stop();
        pen.set_stroke_len(10);
        pen.set_noise(0.5);
    }

    #[test]
    fn sample_lines_have_the_right_arity() {
        let mut rng = thread_rng();
        let line = generate_sample(&mut rng, 9, 3, 0.0);
        assert_eq!(line.split(',').count(), 9);
    }
}
