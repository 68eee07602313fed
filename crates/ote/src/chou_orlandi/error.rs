use crate::OtError;

/// Errors that can occur when using the CO15 sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("count mismatch: expected {0}, got {1}")]
    CountMismatch(usize, usize),
}

impl From<SenderError> for OtError {
    fn from(err: SenderError) -> Self {
        match err {
            SenderError::Io(err) => OtError::Io(err),
            err => OtError::Sender(Box::new(err)),
        }
    }
}

/// Errors that can occur when using the CO15 receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("count mismatch: expected {0}, got {1}")]
    CountMismatch(usize, usize),
}

impl From<ReceiverError> for OtError {
    fn from(err: ReceiverError) -> Self {
        match err {
            ReceiverError::Io(err) => OtError::Io(err),
            err => OtError::Receiver(Box::new(err)),
        }
    }
}
