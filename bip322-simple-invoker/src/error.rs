use thiserror::Error;

/// Failures at the boundary between the invoker and the foreign signer.
#[derive(Error, Debug)]
pub enum InvokerError {
    #[error("{0} contains an interior NUL byte")]
    InteriorNul(&'static str),

    #[error("signer failed: {0}")]
    Signer(String),

    #[error("signer returned a string that is not valid UTF-8")]
    InvalidUtf8,

    #[error("no signing key: {0}")]
    MissingKey(String),
}
