//! Merge engine: pure reconciliation of file record sets.

use filesync_types::{CollectionId, FileId, FileRecord};
use std::collections::{BTreeMap, HashSet};

/// Collapses records sharing a file id to the one with the highest
/// `updation_time`.
///
/// On equal times a tombstone beats a live record, then the higher
/// collection id wins, so the result depends only on the input multiset.
/// Output is ordered by file id.
pub fn merge_by_latest_version<I>(files: I) -> Vec<FileRecord>
where
    I: IntoIterator<Item = FileRecord>,
{
    let mut latest: BTreeMap<FileId, FileRecord> = BTreeMap::new();
    for file in files {
        match latest.get(&file.id) {
            Some(existing) if !supersedes(&file, existing) => {}
            _ => {
                latest.insert(file.id, file);
            }
        }
    }
    latest.into_values().collect()
}

fn supersedes(candidate: &FileRecord, existing: &FileRecord) -> bool {
    let rank = |f: &FileRecord| (f.updation_time, f.is_deleted, f.collection_id);
    rank(candidate) > rank(existing)
}

/// Drops records whose collection is not in `known`. Input order is kept.
pub fn prune_to_known_collections(
    files: Vec<FileRecord>,
    known: &HashSet<CollectionId>,
) -> Vec<FileRecord> {
    files
        .into_iter()
        .filter(|f| known.contains(&f.collection_id))
        .collect()
}
