use thiserror::Error;

/// Boxed failure produced by user code (configured actions, event subscribers).
pub type UserError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The dispatch core recovers nothing locally: every error is either structural misuse
/// detected by the engine or a failure raised by user code that is forwarded untouched.
///
/// # Error Categories
///
/// ## Structural Misuse
/// - [`Error::NotSupported`] - An operation was invoked outside its sanctioned path
/// - [`Error::NotFakable`] - The proxy factory cannot synthesize the requested type
/// - [`Error::MemberNotFound`] - The faked type has no member with the given name
/// - [`Error::ArgumentCount`] - A call supplied the wrong number of arguments
/// - [`Error::ArgumentType`] - A call supplied an argument of the wrong kind
///
/// ## Forwarded Failures
/// - [`Error::User`] - A configured action or event subscriber failed
///
/// ## Internal Errors
/// - [`Error::LockError`] - Thread synchronization failure
/// - [`Error::Error`] - Miscellaneous failures
///
/// # Examples
///
/// ```rust
/// use dotfake::{Error, events::Raise};
///
/// let raiser = Raise::with_empty();
/// match raiser.now(None, None) {
///     Err(Error::NotSupported(message)) => println!("rejected: {message}"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The operation is not supported on this path.
    ///
    /// Raised when the firing method of an event raiser is invoked directly
    /// instead of through event dispatch.
    #[error("Operation is not supported - {0}")]
    NotSupported(String),

    /// The proxy factory cannot synthesize an instance of this type.
    #[error("Type can not be faked - {0}")]
    NotFakable(String),

    /// The faked type does not declare the requested member.
    #[error("Member not found - {type_name}::{member}")]
    MemberNotFound {
        /// Name of the faked type
        type_name: String,
        /// Name of the member that was looked up
        member: String,
    },

    /// A call supplied the wrong number of arguments.
    #[error("Invalid argument count for {method} - expected {expected}, got {actual}")]
    ArgumentCount {
        /// The method being called
        method: String,
        /// Number of declared parameters
        expected: usize,
        /// Number of supplied arguments
        actual: usize,
    },

    /// A call supplied an argument that does not fit the declared parameter type.
    #[error("Invalid argument {index} for {method} - expected {expected}")]
    ArgumentType {
        /// The method being called
        method: String,
        /// Zero-based position of the offending argument
        index: usize,
        /// The declared parameter type
        expected: String,
    },

    /// Failure raised by user code.
    ///
    /// Configured actions and event subscribers report failures through this variant.
    /// The engine propagates the boxed value as-is, so callers can downcast back to the
    /// original type with [`Error::downcast_user_ref`].
    #[error(transparent)]
    User(UserError),

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically
    /// when a lock guarding a fake's rules has been poisoned.
    #[error("Failed to lock target")]
    LockError,

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}

impl Error {
    /// Wraps a user-defined failure.
    ///
    /// # Arguments
    ///
    /// * `error` - The failure produced by user code
    pub fn user<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::User(Box::new(error))
    }

    /// Returns the user failure as `T`, if this error carries one of that type.
    #[must_use]
    pub fn downcast_user_ref<T>(&self) -> Option<&T>
    where
        T: std::error::Error + 'static,
    {
        match self {
            Error::User(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns `true` if this error was raised by user code.
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Error::User(_))
    }
}
