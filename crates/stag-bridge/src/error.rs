/// Failures raised while converting between client arrays and engine values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// A parameter has the wrong form, e.g. a color that is not a triple.
    #[error("{0}")]
    InvalidArgument(String),

    /// An element does not hold the number of values its layout requires.
    #[error("{what}: expected {expected} values, got {got}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    /// An element that must be an integer is not integer-representable.
    #[error("element {index} cannot be converted to an integer: {reason}")]
    TypeConversion { index: usize, reason: String },
}

/// Errors returned by the detect/draw orchestrators.
///
/// `E` is the engine's own error type. It is carried as-is so callers see
/// exactly what the engine reported.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError<E> {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Engine(E),
}

impl<E> BridgeError<E> {
    /// The engine error, if the failure came from the engine.
    pub fn into_engine(self) -> Option<E> {
        match self {
            BridgeError::Engine(err) => Some(err),
            BridgeError::Convert(_) => None,
        }
    }
}
