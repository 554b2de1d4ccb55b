//! Common error type definitions.

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source of structured error types when the concrete error
/// comes from a backend this crate does not know about.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;
