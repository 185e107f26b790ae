use std::{error::Error, fmt::Display, sync::mpsc};

/// Failures while driving the terminal UI.
#[derive(Debug)]
pub enum PenGuiError {
    /// Terminal io failed.
    IOError(std::io::Error),
    /// A channel to a worker thread went away.
    MPSCSendError,
    /// The worker thread's result never arrived.
    MPSCRecvError(mpsc::RecvError),
    /// A worker thread panicked.
    JoinError,
}

impl Display for PenGuiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#?}", self)
    }
}

impl Error for PenGuiError {}

impl From<std::io::Error> for PenGuiError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl<T> From<mpsc::SendError<T>> for PenGuiError {
    fn from(_: mpsc::SendError<T>) -> Self {
        Self::MPSCSendError
    }
}

impl From<mpsc::RecvError> for PenGuiError {
    fn from(value: mpsc::RecvError) -> Self {
        Self::MPSCRecvError(value)
    }
}
