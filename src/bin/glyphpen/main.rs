//! Capture and live-classification CLI for the GlyphPen. `capture` logs
//! labeled telemetry rows to CSV while the writer cycles through the
//! label set; `live` standardizes sliding windows and logs what the
//! classifier makes of them.

use clap::Parser;
use glyphpen::{
    args::{
        CommandTask::{Capture, Live},
        GlyphArgs,
    },
    capture_log::CaptureLog,
    classifier::DummyClassifier,
    config::{PenConfig, WindowMode},
    gui::device_selector,
    labels::{full_character_set, LabelCycle},
    pipeline::Pipeline,
    transport::SerialLineSource,
};

use log::{error, info};
use serial2::SerialPort;
use std::{path::PathBuf, process::exit, sync::atomic::AtomicBool};

fn main() {
    env_logger::init();
    let args = GlyphArgs::parse();

    let mut config = match &args.config {
        Some(path) => match PenConfig::from_path(path) {
            Ok(config) => config,
            Err(error) => {
                error!("could not load config {}: {}", path, error);
                exit(1);
            }
        },
        None => PenConfig::all_sensors(),
    };

    let port_path = match &args.port {
        Some(port) => PathBuf::from(port),
        None => {
            let available_ports = SerialPort::available_ports().unwrap_or_default();
            match device_selector(available_ports) {
                Ok(Some(path)) => path,
                Ok(None) => {
                    info!("no device selected");
                    return;
                }
                Err(error) => {
                    error!("device selector failed: {}", error);
                    exit(1);
                }
            }
        }
    };

    let sink = match &args.command {
        Capture(cmd) => {
            // One window per pen stroke when capturing, like the dataset
            // the model is trained on.
            config.mode = WindowMode::SingleShot;
            CaptureLog::new().with_telemetry(&cmd.outfile, &config.channels)
        }
        Live(cmd) => {
            config.mode = WindowMode::Sliding;
            if let Some(window_size) = cmd.window_size {
                config.window_size = window_size;
            }
            if let Some(window_step) = cmd.window_step {
                config.window_step = window_step;
            }
            let log = CaptureLog::new().with_predictions(&cmd.outfile);
            match (&cmd.telemetry, log) {
                (Some(path), Ok(log)) => log.with_telemetry(path, &config.channels),
                (None, log) => log,
                (_, err) => err,
            }
        }
    };
    let mut sink = match sink {
        Ok(sink) => sink,
        Err(error) => {
            error!("could not open output file: {}", error);
            exit(1);
        }
    };

    if let Err(error) = config.validate() {
        error!("{}", error);
        exit(1);
    }

    let source = match SerialLineSource::open(&port_path, args.baud) {
        Ok(source) => source,
        Err(error) => {
            error!("could not open {}: {}", port_path.display(), error);
            exit(1);
        }
    };

    info!(
        "logging from {} ({} channels, window {}x{})",
        port_path.display(),
        config.feature_count(),
        config.window_size,
        config.window_step
    );

    // The trained model runs out-of-process for now; the dummy keeps the
    // prediction plumbing exercised until its backend lands here.
    let classifier = DummyClassifier::new(full_character_set(), config.feature_count());
    let mut pipeline = Pipeline::new(&config, LabelCycle::new(full_character_set()), classifier);

    // Runs until the device goes away or the process is interrupted; every
    // CSV row is flushed as it is written.
    let stop = AtomicBool::new(false);
    if let Err(error) = pipeline.run(source, &stop, &mut sink) {
        error!("pipeline stopped: {}", error);
        exit(1);
    }
}
