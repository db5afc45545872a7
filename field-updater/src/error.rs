use thiserror::Error;

use crate::descriptor::LookupError;

/// Why an [`AtomicFieldUpdater`](crate::AtomicFieldUpdater) could not be built.
///
/// Checks run in a fixed order, so the variant tells the caller which check
/// failed first:
///
/// 1. the field exists ([`LookupFailure`](Self::LookupFailure))
/// 2. its declared type is the requested value type ([`TypeMismatch`](Self::TypeMismatch))
/// 3. it is declared [`Volatile`](crate::Volatile) ([`NotVolatile`](Self::NotVolatile))
///
/// Failures are deterministic. Retrying with the same owner, value type and
/// name fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdaterError {
    /// No field with the requested name is recorded for the owner type.
    /// The lookup diagnostic is kept as the error source.
    #[error("cannot resolve field updater on `{}`", .0.owner())]
    LookupFailure(#[from] LookupError),

    /// The field exists but holds a different type. Asking for a reference
    /// updater on a primitive field, or the reverse, lands here too.
    #[error("field `{field}` is declared as `{found}`, not `{expected}`")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The field has the right type but is not declared `Volatile`.
    #[error("field `{field}` must be volatile type")]
    NotVolatile { field: &'static str },
}

impl UpdaterError {
    /// The underlying lookup diagnostic, for [`LookupFailure`](Self::LookupFailure).
    pub fn lookup_error(&self) -> Option<&LookupError> {
        match self {
            UpdaterError::LookupFailure(e) => Some(e),
            _ => None,
        }
    }
}
