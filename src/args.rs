// Commandline argument parser using clap for GlyphPen

use clap::{Args, Parser, Subcommand};

/// Host-side capture and live classification for the GlyphPen.
#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
pub struct GlyphArgs {
    /// Which task to perform, dataset capture or live classification
    #[command(subcommand)]
    pub command: CommandTask,

    /// Serial device path; a selector is shown when omitted
    #[arg(short = 'p', long = "port")]
    pub port: Option<String>,

    /// Baud rate; must match what the firmware was built with
    #[arg(short = 'b', long = "baud", default_value_t = 9600)]
    pub baud: u32,

    /// Path to a RON pipeline config; defaults to the all-sensors preset
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,
}

/// The two ways to run against the pen.
#[derive(Debug, Subcommand, Clone)]
pub enum CommandTask {
    /// Log labeled telemetry to CSV while cycling through the label set
    #[command(about)]
    Capture(CaptureCommand),

    /// Classify sliding windows as they stream and log the predictions
    #[command(about)]
    Live(LiveCommand),
}

/// Options for dataset capture.
#[derive(Debug, Args, Clone)]
#[command(version, about)]
pub struct CaptureCommand {
    /// Filename for the telemetry CSV
    #[arg(short = 'o', long = "out")]
    pub outfile: String,
}

/// Options for live classification.
#[derive(Debug, Args, Clone)]
#[command(version, about)]
pub struct LiveCommand {
    /// Filename for the prediction CSV
    #[arg(short = 'o', long = "out")]
    pub outfile: String,

    /// Also log raw telemetry rows to this CSV
    #[arg(short = 't', long = "telemetry")]
    pub telemetry: Option<String>,

    /// Override the configured window size
    #[arg(short = 'w', long = "window")]
    pub window_size: Option<usize>,

    /// Override the configured window step
    #[arg(short = 's', long = "step")]
    pub window_step: Option<usize>,
}
