use thiserror::Error;

/// Error returned by the `ProbingTable` constructors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum CapacityError {
    /// The requested initial capacity was zero.
    #[error("invalid capacity: a probing table needs at least one slot")]
    InvalidCapacity,
}
