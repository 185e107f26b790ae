//! Wires the framer, the window buffer, the label cycle, the normalizer,
//! and a classifier into one synchronous pipeline. Each incoming line runs
//! the whole chain to completion before the next is read; the only
//! blocking point is the transport itself. For deployments that want the
//! pipeline off the UI thread, [Pipeline] also implements
//! [Component](crate::component::Component) over lines, so
//! [run_component](crate::component::run_component) can drive it between
//! a line channel and a bounded prediction queue.

use crate::classifier::Classifier;
use crate::component::{Component, ComponentError};
use crate::config::PenConfig;
use crate::framer::{Event, LineFramer};
use crate::labels::{Activation, LabelCycle};
use crate::normalizer::standardize;
use crate::transport::TransportError;
use crate::window_buffer::{Window, WindowBuffer};

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// One parsed telemetry sample, stamped on receipt and tagged with the
/// label currently being recorded.
#[derive(Debug, Clone)]
pub struct DataRow {
    /// Host-side capture time.
    pub at: DateTime<Local>,
    /// The sensor channel values, in declared channel order.
    pub values: Vec<f32>,
    /// Ground-truth label, when a label cycle is active.
    pub label: Option<String>,
}

/// A completed classification of one window.
#[derive(Debug, Clone)]
pub struct PredictionEvent<T> {
    /// When the window was classified.
    pub at: DateTime<Local>,
    /// Whatever the classifier produced.
    pub result: T,
    /// The label the writer was supposed to be writing, for later scoring
    /// of the model.
    pub expected: Option<String>,
}

/// Receives what the pipeline produces. Persistence (CSV) and display
/// (terminal UI) both live behind this; the pipeline itself never writes
/// files or renders anything.
pub trait Sink<T> {
    /// A telemetry row was captured.
    fn on_row(&mut self, _row: &DataRow) {}
    /// A window was classified.
    fn on_prediction(&mut self, _event: &PredictionEvent<T>) {}
    /// The label cycle wrapped around; every label has been recorded once.
    fn on_pass_complete(&mut self) {}
}

/// Collects prediction events, useful for tests and for the Component
/// adapter below.
impl<T: Clone> Sink<T> for Vec<PredictionEvent<T>> {
    fn on_prediction(&mut self, event: &PredictionEvent<T>) {
        self.push(event.clone());
    }
}

/// Terminal pipeline failures. Classifier errors are not here on purpose;
/// a bad window is logged and dropped so one failed predict call cannot
/// kill a recording session.
#[derive(Debug)]
pub enum PipelineError {
    /// The transport failed or ended; the pipeline stopped cleanly without
    /// flushing a partial window.
    Transport(TransportError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Transport(error) => write!(f, "transport failed: {}", error),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<TransportError> for PipelineError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// The full line-to-prediction pipeline for one pen.
pub struct Pipeline<C: Classifier> {
    framer: LineFramer,
    buffer: WindowBuffer,
    labels: LabelCycle,
    classifier: C,
}

impl<C: Classifier> Pipeline<C> {
    /// Builds a pipeline from a validated config, a label cycle, and a
    /// classifier backend.
    pub fn new(config: &PenConfig, labels: LabelCycle, classifier: C) -> Self {
        Self {
            framer: LineFramer::new(config),
            buffer: WindowBuffer::new(config),
            labels,
            classifier,
        }
    }

    /// The label currently being recorded.
    pub fn current_label(&self) -> &str {
        self.labels.current()
    }

    /// Runs one line through the whole chain, reporting everything it
    /// produced to the sink.
    pub fn handle_line<S: Sink<C::Output>>(&mut self, line: &str, sink: &mut S) {
        match self.framer.classify(line) {
            Event::SessionStart => {
                self.buffer.start_session();
                match self.labels.on_activation() {
                    Activation::First => {
                        info!("recording armed, first label is {:?}", self.labels.current())
                    }
                    Activation::Advanced => info!("next label: {:?}", self.labels.current()),
                    Activation::PassComplete => {
                        info!(
                            "all labels recorded once, wrapping back to {:?}",
                            self.labels.current()
                        );
                        sink.on_pass_complete();
                    }
                }
            }
            Event::SessionEnd => {
                info!("recording stopped");
                if let Some(window) = self.buffer.end_session() {
                    self.predict(window, sink);
                }
            }
            Event::DataRow(values) => {
                let row = DataRow {
                    at: Local::now(),
                    values,
                    label: Some(self.labels.current().to_owned()),
                };
                sink.on_row(&row);
                for window in self.buffer.push(row.values) {
                    self.predict(window, sink);
                }
            }
            Event::Garbage => debug!("dropping line: {:?}", line),
        }
    }

    fn predict<S: Sink<C::Output>>(&mut self, window: Window, sink: &mut S) {
        let normalized = standardize(&window);
        match self.classifier.predict(&normalized) {
            Ok(result) => sink.on_prediction(&PredictionEvent {
                at: Local::now(),
                result,
                expected: Some(self.labels.current().to_owned()),
            }),
            // Recoverable: drop this window, keep the session going.
            Err(error) => warn!("classifier failed, dropping window: {}", error),
        }
    }

    /// Drives the pipeline from an injected line stream until the stream
    /// ends, the transport fails, or the stop flag is raised. The stop
    /// flag is checked once per line, so cancellation is cooperative.
    pub fn run<I, S>(
        &mut self,
        lines: I,
        stop: &AtomicBool,
        sink: &mut S,
    ) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = Result<String, TransportError>>,
        S: Sink<C::Output>,
    {
        for line in lines {
            if stop.load(Ordering::Relaxed) {
                info!("stop requested, winding down");
                break;
            }
            let line = line.map_err(PipelineError::Transport)?;
            self.handle_line(&line, sink);
        }
        Ok(())
    }
}

impl<C: Classifier> fmt::Display for Pipeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "glyph pipeline")
    }
}

/// Lets the pipeline run as a threaded stage: lines in, batches of
/// prediction events out.
impl<C: Classifier> Component for Pipeline<C>
where
    C::Output: Clone,
{
    type InData = String;
    type OutData = Vec<PredictionEvent<C::Output>>;

    fn convert(&mut self, input: String) -> Self::OutData {
        let mut events = Vec::new();
        self.handle_line(&input, &mut events);
        events
    }

    fn finalize(&mut self) -> Result<(), ComponentError> {
        Ok(())
    }
}
