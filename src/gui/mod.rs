//! Terminal UI pieces: a serial device picker and a live prediction feed.

mod device_selector;
mod error;
mod prediction_feed;

pub use device_selector::device_selector;
pub use error::PenGuiError;
pub use prediction_feed::prediction_feed;
