//! Post-extraction layout normalization
//!
//! Real-world archives either wrap their content in a single top-level
//! directory or dump loose entries directly at the root. After this pass
//! the extraction root holds either the archive's own top-level directory
//! or a single synthetic wrapper, never a mix of loose entries.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Wrapper directory created for scattered layouts.
pub const WRAPPER_DIR: &str = "extracted";

/// Classify `entries` (paths relative to the extraction root, parents
/// listed before children) and, for a scattered layout, return the paths to
/// relocate under [`WRAPPER_DIR`] in enumeration order. `None` means the
/// tree is left alone.
///
/// Only a lone first segment is clean: a single wrapping directory, or a
/// single root-level entry. Anything loose beside another top-level name
/// shows up as a second first segment and scatters the layout. Entries
/// already under a top-level `extracted` keep their position.
pub fn move_plan(entries: &[PathBuf]) -> Option<Vec<PathBuf>> {
    let mut first_segments = BTreeSet::new();
    for entry in entries {
        if let Some(Component::Normal(head)) = entry.components().next() {
            first_segments.insert(head.to_os_string());
        }
    }

    if first_segments.len() <= 1 {
        return None;
    }

    let moves = entries
        .iter()
        .filter(|entry| !entry.starts_with(WRAPPER_DIR))
        .cloned()
        .collect();
    Some(moves)
}

/// Run the scattered-files heuristic on `root` and relocate loose entries
/// under the wrapper directory. A clean or empty tree is untouched, so the
/// pass is idempotent.
pub fn normalize_layout(root: &Path) -> Result<()> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        entries.push(rel.to_path_buf());
    }

    let Some(moves) = move_plan(&entries) else {
        return Ok(());
    };

    let wrapper = root.join(WRAPPER_DIR);
    fs::create_dir_all(&wrapper)?;

    for rel in moves {
        let from = root.join(&rel);
        // Ancestors move as a unit; their contents are already gone by the
        // time the walk reaches them.
        if fs::symlink_metadata(&from).is_err() {
            continue;
        }
        let to = wrapper.join(&rel);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&from, &to)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn empty_tree_is_clean() {
        assert_eq!(move_plan(&[]), None);
    }

    #[test]
    fn single_top_level_directory_is_clean() {
        let entries = paths(&["proj", "proj/src", "proj/src/main", "proj/README"]);
        assert_eq!(move_plan(&entries), None);
    }

    #[test]
    fn lone_top_level_file_is_left_unwrapped() {
        let entries = paths(&["a.txt"]);
        assert_eq!(move_plan(&entries), None);
    }

    #[test]
    fn loose_entries_are_scattered() {
        let entries = paths(&["a.txt", "b", "b/c.txt"]);
        let moves = move_plan(&entries).unwrap();
        assert_eq!(moves, paths(&["a.txt", "b", "b/c.txt"]));
    }

    #[test]
    fn two_top_level_directories_are_scattered() {
        let entries = paths(&["a", "a/x.txt", "b", "b/y.txt"]);
        assert!(move_plan(&entries).is_some());
    }

    #[test]
    fn existing_wrapper_entries_stay_in_place() {
        let entries = paths(&["a.txt", "extracted", "extracted/old.txt"]);
        let moves = move_plan(&entries).unwrap();
        assert_eq!(moves, paths(&["a.txt"]));
    }

    #[test]
    fn normalize_moves_scattered_entries_under_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "loose").unwrap();
        fs::create_dir(root.join("b")).unwrap();
        fs::write(root.join("b/c.txt"), "nested").unwrap();

        normalize_layout(root).unwrap();

        assert_eq!(fs::read_to_string(root.join("extracted/a.txt")).unwrap(), "loose");
        assert_eq!(
            fs::read_to_string(root.join("extracted/b/c.txt")).unwrap(),
            "nested"
        );
        assert!(!root.join("a.txt").exists());
        assert!(!root.join("b").exists());

        let top: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(top, vec![std::ffi::OsString::from("extracted")]);
    }

    #[test]
    fn normalize_leaves_single_top_level_directory_alone() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("proj/src")).unwrap();
        fs::write(root.join("proj/src/main"), "fn main").unwrap();
        fs::write(root.join("proj/README"), "docs").unwrap();

        normalize_layout(root).unwrap();

        assert!(root.join("proj/src/main").exists());
        assert!(root.join("proj/README").exists());
        assert!(!root.join("extracted").exists());
    }

    #[test]
    fn normalize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "loose").unwrap();
        fs::write(root.join("b.txt"), "also loose").unwrap();

        normalize_layout(root).unwrap();
        normalize_layout(root).unwrap();

        assert!(root.join("extracted/a.txt").exists());
        assert!(root.join("extracted/b.txt").exists());
        assert!(!root.join("extracted/extracted").exists());
    }
}
