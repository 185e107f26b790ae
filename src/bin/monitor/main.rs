//! Runs the whole pipeline against a simulated pen and renders live
//! predictions in the terminal. No hardware or trained model required;
//! this exists to watch the plumbing work.

use glyphpen::{
    classifier::DummyClassifier,
    component::run_component,
    config::{PenConfig, WindowMode},
    dummy_pen::DummyPen,
    gui::prediction_feed,
    labels::{full_character_set, LabelCycle},
    pipeline::Pipeline,
};

use log::info;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    thread::spawn,
    time::Duration,
};

// Completed predictions waiting for the UI; the pipeline blocks rather
// than queueing past this.
const PREDICTION_QUEUE_DEPTH: usize = 64;

fn main() {
    env_logger::init();

    let mut config = PenConfig::all_sensors();
    config.mode = WindowMode::Sliding;

    let mut pen = DummyPen::builder()
        .channels(config.feature_count())
        .stroke_len(80)
        .sample_period(Duration::from_millis(5))
        .build();

    let (line_tx, line_rx) = mpsc::channel::<String>();
    let (event_tx, event_rx) = mpsc::sync_channel(PREDICTION_QUEUE_DEPTH);

    let pipeline = Pipeline::new(
        &config,
        LabelCycle::new(full_character_set()),
        DummyClassifier::new(full_character_set(), config.feature_count()),
    );
    let worker = run_component(Box::new(pipeline), line_rx, event_tx);

    let stop = Arc::new(AtomicBool::new(false));
    let feeder_stop = Arc::clone(&stop);
    let feeder = spawn(move || {
        while !feeder_stop.load(Ordering::Relaxed) {
            match pen.next() {
                Some(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                None => spin_sleep::sleep(Duration::from_millis(2)),
            }
        }
        pen.stop();
    });

    let history = prediction_feed(event_rx, 20).expect("monitor ui failed");

    stop.store(true, Ordering::Relaxed);
    feeder.join().expect("feeder thread panicked");
    worker.join().expect("pipeline thread panicked");

    info!("saw {} predictions this run", history.len());
}
