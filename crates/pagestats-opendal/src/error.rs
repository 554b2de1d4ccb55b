//! Conversion of OpenDAL errors.

use opendal::ErrorKind;
use pagestats_core::storage::StorageError;

/// Converts an [`opendal::Error`] into a [`StorageError`].
pub(crate) fn from_opendal(err: opendal::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::not_found(err.to_string()),
        ErrorKind::PermissionDenied => StorageError::permission_denied(err.to_string()),
        _ => StorageError::backend(err),
    }
}
