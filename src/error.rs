use std::fmt;

/// Failure reported by a `LedgerStore` primitive or one of its iterators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    LockPoisoned(&'static str),
    /// The backing ledger rejected or failed the call.
    Backend(String),
    /// The query expression could not be evaluated.
    Query(String),
    /// An iterator was read after it had been closed.
    IteratorClosed,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "ledger lock poisoned during {}", operation)
            }
            StoreError::Backend(msg) => write!(f, "ledger error: {}", msg),
            StoreError::Query(msg) => write!(f, "invalid query: {}", msg),
            StoreError::IteratorClosed => write!(f, "results iterator already closed"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Error returned by every chaincode operation.
///
/// Variants are terminal for the invocation: nothing is retried and nothing
/// is written once one of them has been produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChaincodeError {
    /// Wrong number of positional arguments.
    Arity { expected: usize, actual: usize },
    /// A numeric field (1-based `position`) did not parse as a base-10 integer.
    Type { position: usize, field: &'static str },
    /// An argument parsed but violates a contract (key source, separator).
    InvalidArgument(String),
    /// `save` found a live record under the derived key.
    AlreadyExists(String),
    /// `update` or `delete` found no live record under the key.
    NotFound(String),
    Store(StoreError),
    /// A record or projected value could not be encoded or decoded.
    Serialization(String),
    UnknownFunction(String),
}

impl fmt::Display for ChaincodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChaincodeError::Arity { expected, actual } => write!(
                f,
                "Incorrect number of arguments. Expecting {}, got {}",
                expected, actual
            ),
            ChaincodeError::Type { position, field } => write!(
                f,
                "argument {} ({}) must be a numeric string",
                position, field
            ),
            ChaincodeError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ChaincodeError::AlreadyExists(key) => write!(f, "data is already exist: {}", key),
            ChaincodeError::NotFound(key) => write!(f, "data does not exist: {}", key),
            ChaincodeError::Store(e) => write!(f, "Failed to access state: {}", e),
            ChaincodeError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            ChaincodeError::UnknownFunction(_) => {
                write!(f, "Received unknown function invocation")
            }
        }
    }
}

impl std::error::Error for ChaincodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChaincodeError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ChaincodeError {
    fn from(err: StoreError) -> Self {
        ChaincodeError::Store(err)
    }
}

impl From<serde_json::Error> for ChaincodeError {
    fn from(err: serde_json::Error) -> Self {
        ChaincodeError::Serialization(err.to_string())
    }
}
