//! Discovery of the stats key belonging to a hit key.

use pagestats_core::key::stats_prefix;
use pagestats_core::storage::ObjectStorage;

use crate::{Result, WorkerError};

/// Tracing target for stats key resolution.
const TRACING_TARGET: &str = "pagestats_worker::resolver";

/// Finds the full stats key of the page identified by `hit_key`.
///
/// The stats key ends in a public identifier that an earlier step appended,
/// so it is looked up by prefix. Only keys of the form
/// `{prefix}__{id}.{ext}` belong to the page; keys of sibling pages whose
/// name merely extends the prefix (`page_1` and `page_10`) are skipped.
/// When several keys match the lexicographically smallest one is returned,
/// independent of the order the backend lists them in.
///
/// # Errors
///
/// Returns [`WorkerError::NotFound`] when no key matches and
/// [`WorkerError::Storage`] when listing fails.
pub async fn resolve_stats_key(
    storage: &dyn ObjectStorage,
    bucket: &str,
    hit_key: &str,
) -> Result<String> {
    let prefix = stats_prefix(hit_key);
    let listed = storage.list_objects(bucket, &prefix).await?;

    let (mut keys, skipped): (Vec<_>, Vec<_>) = listed
        .into_iter()
        .partition(|key| belongs_to_page(&prefix, key));

    if !skipped.is_empty() {
        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %bucket,
            prefix = %prefix,
            skipped_keys = ?skipped,
            "Skipped keys of other pages"
        );
    }

    tracing::info!(
        target: TRACING_TARGET,
        bucket = %bucket,
        prefix = %prefix,
        matching_keys = ?keys,
        "Listed stats keys"
    );

    keys.sort_unstable();
    keys.dedup();

    if keys.len() > 1 {
        tracing::warn!(
            target: TRACING_TARGET,
            bucket = %bucket,
            prefix = %prefix,
            count = keys.len(),
            chosen = %keys[0],
            "Several stats keys share the prefix, using the smallest"
        );
    }

    keys.into_iter()
        .next()
        .ok_or(WorkerError::NotFound {
            bucket: bucket.to_owned(),
            prefix,
        })
}

/// Returns whether `key` is `{prefix}__{id}.{ext}` with an alphanumeric id
/// and a lowercase extension.
fn belongs_to_page(prefix: &str, key: &str) -> bool {
    let Some(tail) = key.strip_prefix(prefix).and_then(|tail| tail.strip_prefix("__")) else {
        return false;
    };

    let Some((id, extension)) = tail.rsplit_once('.') else {
        return false;
    };

    !id.is_empty()
        && id.chars().all(|c| c.is_ascii_alphanumeric())
        && !extension.is_empty()
        && extension.chars().all(|c| c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use pagestats_test::MockStorage;

    use super::*;

    const BUCKET: &str = "covenants-deed-images";
    const HIT_KEY: &str = "ocr/hits/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002.json";

    #[tokio::test]
    async fn resolves_single_match() {
        let storage = MockStorage::new();
        storage
            .insert(
                BUCKET,
                "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__a1b2c3.json",
                "{}",
            )
            .insert(
                BUCKET,
                "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0003__ffff.json",
                "{}",
            );

        let key = resolve_stats_key(&storage, BUCKET, HIT_KEY).await.unwrap();
        assert_eq!(
            key,
            "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__a1b2c3.json"
        );
    }

    #[tokio::test]
    async fn picks_smallest_of_several_matches() {
        let storage = MockStorage::new();
        storage
            .insert(
                BUCKET,
                "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__zz9.json",
                "{}",
            )
            .insert(
                BUCKET,
                "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__ab1.json",
                "{}",
            );

        let key = resolve_stats_key(&storage, BUCKET, HIT_KEY).await.unwrap();
        assert!(key.ends_with("__ab1.json"));
    }

    #[tokio::test]
    async fn smallest_match_wins_regardless_of_listing_order() {
        const SMALLEST: &str = "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__a00.json";
        const MIDDLE: &str = "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__m55.json";
        const LARGEST: &str = "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__z99.json";

        let first = MockStorage::new();
        first
            .insert(BUCKET, SMALLEST, "{}")
            .insert(BUCKET, LARGEST, "{}")
            .insert(BUCKET, MIDDLE, "{}");

        let last = MockStorage::new();
        last.insert(BUCKET, LARGEST, "{}")
            .insert(BUCKET, MIDDLE, "{}")
            .insert(BUCKET, SMALLEST, "{}");

        assert_eq!(resolve_stats_key(&first, BUCKET, HIT_KEY).await.unwrap(), SMALLEST);
        assert_eq!(resolve_stats_key(&last, BUCKET, HIT_KEY).await.unwrap(), SMALLEST);
    }

    #[tokio::test]
    async fn ignores_sibling_page_extending_the_prefix() {
        let storage = MockStorage::new();
        storage
            .insert(BUCKET, "ocr/stats/wf/batch/page_10__other.json", "{}")
            .insert(BUCKET, "ocr/stats/wf/batch/page_1__own.json", "{}")
            .insert(BUCKET, "ocr/stats/wf/batch/page_1_b__third.json", "{}");

        let key = resolve_stats_key(&storage, BUCKET, "ocr/hits/wf/batch/page_1.json")
            .await
            .unwrap();
        assert_eq!(key, "ocr/stats/wf/batch/page_1__own.json");
    }

    #[tokio::test]
    async fn only_sibling_pages_is_not_found() {
        let storage = MockStorage::new();
        storage
            .insert(BUCKET, "ocr/stats/wf/batch/page_10__other.json", "{}")
            .insert(BUCKET, "ocr/stats/wf/batch/page_1__v2__own.json", "{}");

        let err = resolve_stats_key(&storage, BUCKET, "ocr/hits/wf/batch/page_1.json")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::NotFound { .. }));
    }

    #[test]
    fn page_membership() {
        let prefix = "ocr/stats/wf/batch/page_1";
        assert!(belongs_to_page(prefix, "ocr/stats/wf/batch/page_1__a1b2.json"));
        assert!(!belongs_to_page(prefix, "ocr/stats/wf/batch/page_10__a1b2.json"));
        assert!(!belongs_to_page(prefix, "ocr/stats/wf/batch/page_1.json"));
        assert!(!belongs_to_page(prefix, "ocr/stats/wf/batch/page_1__.json"));
        assert!(!belongs_to_page(prefix, "ocr/stats/wf/batch/page_1__a-b.json"));
        assert!(!belongs_to_page(prefix, "ocr/stats/wf/batch/page_1__ab"));
    }

    #[tokio::test]
    async fn empty_listing_is_not_found() {
        let storage = MockStorage::new();
        storage.insert("another-bucket", "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002__a1.json", "{}");

        let err = resolve_stats_key(&storage, BUCKET, HIT_KEY).await.unwrap_err();
        match err {
            WorkerError::NotFound { bucket, prefix } => {
                assert_eq!(bucket, BUCKET);
                assert_eq!(
                    prefix,
                    "ocr/stats/wi-milwaukee-county/17760704/00673792_NOTINDEX_0002"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn listing_failure_is_storage_error() {
        let storage = MockStorage::new();
        storage.fail_lists();

        let err = resolve_stats_key(&storage, BUCKET, HIT_KEY).await.unwrap_err();
        assert_eq!(err.kind(), "storage");
    }
}
