use thiserror::Error;

/// Errors raised while configuring a recurrent stack.
///
/// Shape and device mismatches during a forward pass are not represented here;
/// they surface from the backend unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurrentError {
    #[error("unknown recurrent mode `{0}` (expected `RNN` or `LSTM`)")]
    UnknownMode(String),

    #[error("invalid recurrent configuration: {0}")]
    InvalidConfig(String),
}
