//! Defines the Component trait, the common interface for GlyphPen
//! processing stages. A component consumes data from the preceding stage,
//! processes it, and passes new data to the subsequent stage, which lets a
//! stage run synchronously in a loop or on its own thread between a pair
//! of channels.

use log::{info, warn};
use std::sync::mpsc::{Receiver, SyncSender};
use std::thread::{self, JoinHandle};

/// Errors a component can hit while shutting down.
#[derive(Debug)]
pub enum ComponentError {
    /// An io failure while flushing or closing an output.
    IoError(std::io::Error),
}

/// A stage in the GlyphPen pipeline. All structs that perform a processing
/// step must implement Component so they can be integrated into the
/// pipeline.
pub trait Component: ToString {
    /// What the stage consumes.
    type InData;
    /// What the stage produces.
    type OutData;

    /// Converts an input of type A into an output of type B
    fn convert(&mut self, input: Self::InData) -> Self::OutData;

    /// Cleans up at termination of pipeline
    fn finalize(&mut self) -> Result<(), ComponentError>;
}

/// Runs the given Component on its own thread. On receiving data on the
/// input channel, the Component converts it and sends the result to the
/// output channel. The output channel is bounded, so a slow consumer
/// back-pressures the component rather than growing a queue without limit;
/// if the consumer goes away entirely the thread winds down.
pub fn run_component<C: Component + Send + 'static>(
    mut component: Box<C>,
    input: Receiver<<C as Component>::InData>,
    output: SyncSender<<C as Component>::OutData>,
) -> JoinHandle<()>
where
    <C as Component>::InData: Send + 'static,
    <C as Component>::OutData: Send + 'static,
{
    thread::spawn(move || {
        while let Ok(data) = input.recv() {
            let out_data = component.convert(data);
            if let Err(error) = output.send(out_data) {
                warn!("{} : receiver gone ({}), stopping.", component.to_string(), error);
                break;
            }
        }

        if let Err(component_error) = component.finalize() {
            warn!(
                "{} : error during terminating : {component_error:?}.",
                component.to_string(),
            );
        }
        info!("{} : terminated.", component.to_string());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{channel, sync_channel};

    struct MockComponent {}

    impl Component for MockComponent {
        type InData = i32;
        type OutData = i32;

        fn convert(&mut self, input: i32) -> i32 {
            input + 1
        }

        fn finalize(&mut self) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    impl ToString for MockComponent {
        fn to_string(&self) -> String {
            "MockComponent".to_string()
        }
    }

    /// Writing a value to the Component's input produces that value,
    /// converted, on the Component's output.
    #[test]
    fn test_mock_component() {
        let (test_tx, block_rx) = channel::<i32>();
        let (block_tx, test_rx) = sync_channel::<i32>(4);

        run_component(Box::new(MockComponent {}), block_rx, block_tx);

        assert_eq!(test_tx.send(0), Ok(()));
        assert_eq!(test_rx.recv(), Ok(1));
    }

    #[test]
    fn test_chained_component() {
        let (test_tx, block_a_rx) = channel::<i32>();
        let (block_a_tx, block_b_rx) = sync_channel::<i32>(4);
        let (block_b_tx, test_rx) = sync_channel::<i32>(4);

        run_component(Box::new(MockComponent {}), block_a_rx, block_a_tx);
        run_component(Box::new(MockComponent {}), block_b_rx, block_b_tx);

        assert_eq!(test_tx.send(0), Ok(()));
        assert_eq!(test_rx.recv(), Ok(2));
    }
}
