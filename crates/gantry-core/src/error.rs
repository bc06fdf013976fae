//! Error types for the hosted runtime

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Hosted runtime error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// No class registered under the requested path
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// A class with this path is already registered
    #[error("class already registered: {0}")]
    DuplicateClass(String),

    /// A class id that does not exist in the registry
    #[error("unknown class id: {0}")]
    UnknownClassId(usize),

    /// Member lookup failed on a class
    #[error("{class} has no member '{name}'")]
    NoSuchMember {
        /// Class path searched
        class: String,
        /// Member name requested
        name: String,
    },

    /// Slot-addressed field access out of bounds
    #[error("slot {slot} out of bounds for {class}")]
    SlotOutOfBounds {
        /// Class path of the receiver
        class: String,
        /// Offending slot index
        slot: usize,
    },

    /// Value does not fit the expected type
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Wrong number of arguments for a constructor or method
    #[error("expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Arguments supplied
        got: usize,
    },

    /// A non-object value where an object reference was required
    #[error("not an object: {0}")]
    NotAnObject(String),

    /// Interfaces cannot be instantiated directly
    #[error("cannot instantiate interface {0}")]
    InterfaceInstantiation(String),

    /// The requested class is not an interface
    #[error("{0} is not an interface")]
    NotAnInterface(String),

    /// A bodyless (abstract) method was invoked on a plain object
    #[error("abstract method invoked: {class}.{name}")]
    AbstractCall {
        /// Declaring class path
        class: String,
        /// Method name
        name: String,
    },

    /// An interface send reached a proxy object but no dispatcher is installed
    #[error("no proxy dispatcher registered")]
    NoDispatcher,

    /// Hosted code raised an exception; propagated verbatim to the caller
    #[error("hosted exception: {0}")]
    Thrown(String),
}
