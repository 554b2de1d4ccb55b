//! Artifact namespaces and derivations between them.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Suffix of hit and json keys, stripped to form the stats prefix.
const JSON_SUFFIX: &str = ".json";

/// The three kinds of stored artifacts of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArtifactKind {
    /// Marker that a page matched a downstream interest criterion.
    Hits,
    /// Raw OCR result of a page.
    Json,
    /// Computed page statistics.
    Stats,
}

impl ArtifactKind {
    /// Returns the key namespace of this artifact kind, e.g. `ocr/hits`.
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::Hits => "ocr/hits",
            Self::Json => "ocr/json",
            Self::Stats => "ocr/stats",
        }
    }

    /// Detects the artifact kind of a key from its leading namespace.
    pub fn of(key: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.strip(key).is_some())
    }

    /// Returns the part of `key` after this namespace and its separator.
    pub fn strip(self, key: &str) -> Option<&str> {
        key.strip_prefix(self.namespace())?.strip_prefix('/')
    }

    /// Moves `key` from this namespace into `target`.
    ///
    /// A key outside this namespace is returned unchanged.
    pub fn rebase(self, key: &str, target: Self) -> String {
        match self.strip(key) {
            Some(rest) => format!("{}/{}", target.namespace(), rest),
            None => key.to_owned(),
        }
    }
}

/// Derives the OCR json key of a page from its hit key.
///
/// ```
/// use pagestats_core::key::derive_json_key;
///
/// assert_eq!(
///     derive_json_key("ocr/hits/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002.json"),
///     "ocr/json/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002.json",
/// );
/// ```
pub fn derive_json_key(hit_key: &str) -> String {
    ArtifactKind::Hits.rebase(hit_key, ArtifactKind::Json)
}

/// Derives the prefix shared by the stats key(s) of a page from its hit key.
///
/// The prefix lacks the `__{public_uuid}.json` suffix, which is not
/// derivable from the hit key.
///
/// ```
/// use pagestats_core::key::stats_prefix;
///
/// assert_eq!(
///     stats_prefix("ocr/hits/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002.json"),
///     "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002",
/// );
/// ```
pub fn stats_prefix(hit_key: &str) -> String {
    let mut prefix = ArtifactKind::Hits.rebase(hit_key, ArtifactKind::Stats);
    if prefix.ends_with(JSON_SUFFIX) {
        prefix.truncate(prefix.len() - JSON_SUFFIX.len());
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIT_KEY: &str = "ocr/hits/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002.json";

    #[test]
    fn derives_json_key() {
        assert_eq!(
            derive_json_key(HIT_KEY),
            "ocr/json/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002.json"
        );
    }

    #[test]
    fn derives_stats_prefix() {
        assert_eq!(
            stats_prefix(HIT_KEY),
            "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002"
        );
    }

    #[test]
    fn only_trailing_json_suffix_is_stripped() {
        assert_eq!(
            stats_prefix("ocr/hits/wf/batch.json.d/page.json"),
            "ocr/stats/wf/batch.json.d/page"
        );
        assert_eq!(stats_prefix("ocr/hits/wf/page.txt"), "ocr/stats/wf/page.txt");
    }

    #[test]
    fn keys_outside_namespace_are_unchanged() {
        assert_eq!(derive_json_key("ocr/json/wf/a.json"), "ocr/json/wf/a.json");
        assert_eq!(derive_json_key("other/ocr/hits/a.json"), "other/ocr/hits/a.json");
        assert_eq!(derive_json_key("ocr/hitsx/a.json"), "ocr/hitsx/a.json");
    }

    #[test]
    fn detects_artifact_kind() {
        assert_eq!(ArtifactKind::of(HIT_KEY), Some(ArtifactKind::Hits));
        assert_eq!(ArtifactKind::of("ocr/json/a.json"), Some(ArtifactKind::Json));
        assert_eq!(ArtifactKind::of("ocr/stats/a__b.json"), Some(ArtifactKind::Stats));
        assert_eq!(ArtifactKind::of("ocr/raw/a.json"), None);
    }

    #[test]
    fn parses_kind_names() {
        assert_eq!("stats".parse::<ArtifactKind>().unwrap(), ArtifactKind::Stats);
        assert_eq!(ArtifactKind::Hits.to_string(), "hits");
    }
}
