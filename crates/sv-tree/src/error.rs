use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("skeleton has no vertices")]
    Empty,
    #[error("{what} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("edge ({a}, {b}) references a vertex outside 0..{len}")]
    EdgeOutOfRange { a: usize, b: usize, len: usize },
    #[error("root {root} outside 0..{len}")]
    RootOutOfRange { root: usize, len: usize },
    #[error("skeleton is disconnected: reached {reached} of {total} vertices from the root")]
    Disconnected { reached: usize, total: usize },
}
