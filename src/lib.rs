//! GlyphPen is the host-side software for a handwriting-recognition pen
//! prototype. The pen is instrumented with an IMU, force sensors, and an
//! optical sensor, and streams comma-separated telemetry over a serial
//! link, interleaved with human-readable control markers that bracket each
//! recording session.
//!
//! This crate frames that mixed line stream into typed events, buffers the
//! numeric samples into fixed-length windows, standardizes each window
//! column-wise, and hands the result to an external sequence classifier.
//! Companion binaries log labeled telemetry to CSV for dataset collection
//! (`glyphpen capture`), run live classification (`glyphpen live`), and
//! render a terminal feed of predictions from a simulated pen (`monitor`).
//!
//! The firmware for the pen itself lives in a separate repository; this
//! side of the link only ever sees lines of text.

#![warn(missing_docs)]
pub mod args;
pub mod capture_log;
pub mod classifier;
pub mod component;
pub mod config;
pub mod dummy_pen;
pub mod framer;
pub mod gui;
pub mod labels;
pub mod normalizer;
pub mod pipeline;
pub mod transport;
pub mod window_buffer;
