use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, NnError>;

#[derive(Error, Debug)]
pub enum NnError {
    /// Activation name not one of `sigmoid`, `relu`, `lin`, `tanh`.
    #[error("Unknown activation function \"{0}\"")]
    UnknownActivation(String),

    #[error("Input size mismatch: expected {expected} values, got {got}")]
    InputSizeMismatch { expected: usize, got: usize },

    #[error("Got {inputs} input samples but {targets} targets")]
    LengthMismatch { inputs: usize, targets: usize },

    #[error("Gradient shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A node's backward pass ran without a cached forward input.
    #[error("{0}: backward called before forward")]
    BackwardBeforeForward(&'static str),

    #[error("update_weights called with no accumulated gradients")]
    EmptyGradients,

    #[error("Training requires at least one sample and a batch size of at least 1")]
    EmptyDataset,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
