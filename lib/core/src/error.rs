use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], for callers that only need to
/// know whether the input or the configuration was at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed graph, matrix or assignment handed to a computation.
    InvalidInput,
    /// Configuration rejected when it was constructed.
    UnsupportedConfiguration,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Duplicate node id '{0}' in graph '{1}'")]
    DuplicateNode(String, String),

    #[error("Duplicate edge {from} -> {to} in graph '{graph}'")]
    DuplicateEdge { graph: String, from: String, to: String },

    #[error("Edge {from} -> {to} references unknown node '{missing}'")]
    DanglingEdge { from: String, to: String, missing: String },

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Graphs disagree on directedness: '{source_graph}' is {source_kind}, '{target_graph}' is {target_kind}")]
    DirectednessMismatch {
        source_graph: String,
        source_kind: &'static str,
        target_graph: String,
        target_kind: &'static str,
    },

    #[error("Cost matrix is not square: row {row} has {actual} columns, expected {expected}")]
    NonSquareMatrix { row: usize, expected: usize, actual: usize },

    #[error("Negative cost {value} at ({row}, {col})")]
    NegativeCost { row: usize, col: usize, value: f64 },

    #[error("NaN cost at ({row}, {col})")]
    NanCost { row: usize, col: usize },

    #[error("No feasible assignment: {0}")]
    Infeasible(String),

    #[error("Assignment of size {actual} does not fit graphs needing {expected}")]
    AssignmentSize { expected: usize, actual: usize },

    #[error("Attribute '{attribute}' value '{value}' is not numeric")]
    NonNumericAttribute { attribute: String, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown cost kind: {0}")]
    UnknownCostKind(String),

    #[error("Unknown solver: {0}")]
    UnknownSolver(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidConfig(_)
            | Error::UnknownCostKind(_)
            | Error::UnknownSolver(_)
            | Error::UnknownAlgorithm(_) => ErrorKind::UnsupportedConfiguration,
            _ => ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::NodeNotFound("a".into()).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            Error::NanCost { row: 0, col: 1 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            Error::UnknownSolver("munkres".into()).kind(),
            ErrorKind::UnsupportedConfiguration
        );
        assert_eq!(
            Error::InvalidConfig("alpha".into()).kind(),
            ErrorKind::UnsupportedConfiguration
        );
    }

    #[test]
    fn test_error_messages() {
        let err = Error::NonSquareMatrix { row: 2, expected: 3, actual: 4 };
        assert_eq!(
            err.to_string(),
            "Cost matrix is not square: row 2 has 4 columns, expected 3"
        );
    }
}
