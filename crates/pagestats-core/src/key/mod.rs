//! Artifact key namespaces and the stats key grammar.
//!
//! Artifacts of one page live in a shared bucket under three parallel
//! namespaces:
//!
//! ```text
//! ocr/hits/{workflow}/{remainder}.json
//! ocr/json/{workflow}/{remainder}.json
//! ocr/stats/{workflow}/{remainder}__{public_uuid}.json
//! ```
//!
//! Hit and json keys can be derived from each other with a pure namespace
//! swap. The stats key carries a public identifier written by an earlier
//! step, so only its prefix can be derived; the full key has to be found in
//! storage.

mod artifact;
mod error;
mod parts;

pub use artifact::{ArtifactKind, derive_json_key, stats_prefix};
pub use error::{KeyError, KeyErrorKind};
pub use parts::KeyParts;
