use crate::OtError;

/// Errors that can occur when using the IKNP sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("number of OTs must be a non-zero multiple of 128, got {0}")]
    InvalidCount(usize),
    #[error("count mismatch: got {0} zero-messages and {1} one-messages")]
    CountMismatch(usize, usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("base OT error: {0}")]
    BaseOt(#[from] OtError),
}

/// Errors that can occur when using the IKNP receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("number of OTs must be a non-zero multiple of 128, got {0}")]
    InvalidCount(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("base OT error: {0}")]
    BaseOt(#[from] OtError),
}
