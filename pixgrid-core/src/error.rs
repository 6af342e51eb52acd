use crate::state::LayerID;

/// Every way an edit can be refused.
///
/// All variants are local and recoverable. An operation that returns one of these leaves the
/// document exactly as it found it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("cell ({x}, {y}) is outside of a {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },
    #[error("layer {0} not found")]
    LayerNotFound(LayerID),
    #[error("can't delete the last remaining layer")]
    LastLayer,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
