//! Bridge error taxonomy
//!
//! Every failure surfaces to the calling code as a value of this enum;
//! nothing is recovered internally and nothing is retried. Hosted-side
//! exceptions arrive through the `Runtime` variant rather than any shared
//! unwind mechanism.

use gantry_core::HostError;

/// Result type for bridge calls
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge error types
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The requested class path does not resolve in the host
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// No member of any kind under this name
    #[error("{class} has no attribute '{name}'")]
    NoSuchAttribute {
        /// Class path searched
        class: String,
        /// Attribute requested
        name: String,
    },

    /// Member exists but was reached through the wrong context
    /// (instance member via class handle, or static member via instance)
    #[error("'{name}' on {class} is {declared}, not reachable from {context} context")]
    WrongContext {
        /// Class path
        class: String,
        /// Member name
        name: String,
        /// How the member is declared ("an instance member" / "static")
        declared: &'static str,
        /// Context it was accessed from ("class" / "instance")
        context: &'static str,
    },

    /// No same-arity candidate accepts the supplied argument types
    #[error("no overload of {class}.{name} accepts ({given})")]
    NoOverload {
        /// Class path
        class: String,
        /// Member name (`<init>` for constructors)
        name: String,
        /// Display of the argument types given
        given: String,
    },

    /// Two or more candidates rank equally for the supplied arguments
    #[error("ambiguous overloads of {class}.{name} for ({given})")]
    AmbiguousOverload {
        /// Class path
        class: String,
        /// Member name (`<init>` for constructors)
        name: String,
        /// Display of the argument types given
        given: String,
    },

    /// A value could not be coerced at the marshalling boundary
    #[error("cannot convert {got} to {expected}")]
    TypeMismatch {
        /// Target signature
        expected: String,
        /// Value type supplied
        got: String,
    },

    /// `interface_of` was given a non-interface class
    #[error("{0} is not an interface")]
    NotAnInterface(String),

    /// Proxy construction left an interface method unimplemented
    #[error("proxy for {interface} does not implement '{method}'")]
    UnimplementedMethod {
        /// Interface path
        interface: String,
        /// Missing method name
        method: String,
    },

    /// A descriptor string failed to parse
    #[error("malformed descriptor: {0}")]
    BadDescriptor(String),

    /// The hosted runtime raised; propagated as a catchable bridge error
    #[error(transparent)]
    Runtime(#[from] HostError),
}
