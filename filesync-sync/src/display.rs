//! Preparation of file sets for the presentation layer.

use filesync_types::FileRecord;
use std::cmp::Reverse;

/// Applies user edits carried in public magic metadata to the core metadata:
/// `editedTime` replaces the creation time and `editedName` the title.
pub fn merge_metadata(mut files: Vec<FileRecord>) -> Vec<FileRecord> {
    for file in &mut files {
        let (Some(public), Some(metadata)) = (&file.pub_magic_metadata, &mut file.metadata) else {
            continue;
        };
        if let Some(edited_time) = public.data.edited_time {
            metadata.creation_time = edited_time;
        }
        if let Some(edited_name) = &public.data.edited_name {
            metadata.title = edited_name.clone();
        }
    }
    files
}

/// Newest first: by creation time, then modification time, then id.
pub fn sort_files(mut files: Vec<FileRecord>) -> Vec<FileRecord> {
    files.sort_by_key(|f| Reverse((f.creation_time(), f.modification_time(), f.id)));
    files
}

/// The form every live-sink push takes.
pub fn prepare_for_display(files: Vec<FileRecord>) -> Vec<FileRecord> {
    sort_files(merge_metadata(files))
}
