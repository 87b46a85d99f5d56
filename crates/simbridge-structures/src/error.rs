use std::error::Error;
use std::fmt::{Display, Formatter};

/// Common error type for simbridge data operations.
///
/// Raised when values handed to the core data types do not fit the robot
/// model, e.g. an angle vector of the wrong length.
///
/// # Examples
/// ```
/// use simbridge_structures::{JointVector, SimbridgeDataError};
///
/// let err = JointVector::from_slice(&[0.0; 3]).unwrap_err();
/// assert!(matches!(err, SimbridgeDataError::WrongJointCount { found: 3, .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SimbridgeDataError {
    /// A per-joint vector did not carry exactly one value per joint
    WrongJointCount { expected: usize, found: usize },
    /// Identifier is not part of the wire vocabulary
    UnknownIdentifier(String),
    /// Invalid parameters provided to a function
    BadParameters(String),
}

impl Display for SimbridgeDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SimbridgeDataError::WrongJointCount { expected, found } => write!(
                f,
                "Wrong joint count: expected {} values, found {}",
                expected, found
            ),
            SimbridgeDataError::UnknownIdentifier(id) => write!(f, "Unknown identifier: {}", id),
            SimbridgeDataError::BadParameters(msg) => write!(f, "Bad Parameters: {}", msg),
        }
    }
}
impl Error for SimbridgeDataError {}
