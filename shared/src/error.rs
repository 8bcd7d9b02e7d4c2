use thiserror::Error;

/// Failure reported by a native window or keyboard primitive.
///
/// None of these ever reach the user: the controller logs them, counts them
/// and carries on as if the call had succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NativeError {
    /// The title has no representation in the OS string format.
    #[error("window title {title:?} cannot be converted to a native string")]
    Encoding { title: String },

    /// An OS call reported failure.
    #[error("{call} failed with code {code}")]
    Call { call: &'static str, code: i64 },
}
