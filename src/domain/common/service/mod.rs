//! Shared domain helpers (argument checks)

use tracing::warn;
use validator::Validate;

use crate::errors::EvaError;

/// Validates `args` and logs violations without failing the call.
///
/// Requests keep going on a best-effort basis; the returned error lets callers
/// that cannot proceed bail out themselves.
pub fn warn_if_invalid<V: Validate>(operation: &str, args: &V) -> Option<EvaError> {
    match args.validate() {
        Ok(()) => None,
        Err(errors) => {
            let err = EvaError::InvalidArgument(format!("{}: {}", operation, errors));
            warn!("{}", err);
            Some(err)
        }
    }
}
