//! Moving the files of a directory into per-group subdirectories.
//!
//! Only the immediate files of the directory are considered; subdirectories and their contents
//! are left alone.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ToolError, ToolResult};

/// Group directory used for files without an extension.
pub const NO_EXTENSION_GROUP: &str = "no_extension";

/// Grouping key used to pick a file's destination subdirectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupBy {
    /// Lower-cased file extension (`report.PDF` goes to `pdf/`).
    #[default]
    Extension,
    /// Year and month of the last modification, local time (`2024-03/`).
    ModifiedMonth,
}

/// Options for [`organize_directory`].
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    pub group_by: GroupBy,
    /// Log the planned moves without touching the filesystem.
    pub dry_run: bool,
}

/// One file relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub from: PathBuf,
    pub to: PathBuf,
    pub group: String,
}

/// What [`organize_directory`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    /// Moves performed (or, in a dry run, that would be performed).
    pub moved: Vec<PlannedMove>,
    /// Moves skipped because the destination already existed.
    pub skipped: Vec<PlannedMove>,
    pub dry_run: bool,
}

/// Compute the moves for every immediate file of `dir`, ordered by file name.
pub fn plan(dir: impl AsRef<Path>, group_by: GroupBy) -> ToolResult<Vec<PlannedMove>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ToolError::not_found(dir));
    }

    let mut moves = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => ToolError::Io(io),
            None => ToolError::Io(std::io::Error::other("directory walk failed")),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let group = group_key(entry.path(), group_by)?;
        let to = dir.join(&group).join(entry.file_name());
        moves.push(PlannedMove {
            from: entry.into_path(),
            to,
            group,
        });
    }
    Ok(moves)
}

fn group_key(path: &Path, group_by: GroupBy) -> ToolResult<String> {
    match group_by {
        GroupBy::Extension => Ok(path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| NO_EXTENSION_GROUP.to_string())),
        GroupBy::ModifiedMonth => {
            let modified: DateTime<Local> = fs::metadata(path)?.modified()?.into();
            Ok(modified.format("%Y-%m").to_string())
        }
    }
}

/// Move the immediate files of `dir` into subdirectories named by their group.
///
/// A missing `dir` fails with [`ToolError::NotFound`]. A file whose destination already exists
/// is skipped and reported, not overwritten.
pub fn organize_directory(
    dir: impl AsRef<Path>,
    options: &OrganizeOptions,
) -> ToolResult<OrganizeReport> {
    let dir = dir.as_ref();
    let mut report = OrganizeReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    for mv in plan(dir, options.group_by)? {
        if mv.to.exists() {
            warn!(
                "skipping {}: {} already exists",
                mv.from.display(),
                mv.to.display()
            );
            report.skipped.push(mv);
            continue;
        }

        if options.dry_run {
            info!("[dry-run] {} -> {}", mv.from.display(), mv.to.display());
        } else {
            fs::create_dir_all(dir.join(&mv.group))?;
            fs::rename(&mv.from, &mv.to)?;
            debug!("moved {} -> {}", mv.from.display(), mv.to.display());
        }
        report.moved.push(mv);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{organize_directory, plan, GroupBy, OrganizeOptions, NO_EXTENSION_GROUP};
    use crate::error::ErrorKind;

    fn populate(dir: &std::path::Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), name).unwrap();
        }
    }

    #[test]
    fn plan_groups_by_lowercased_extension() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["b.CSV", "a.txt", "README"]);
        fs::create_dir(dir.path().join("nested")).unwrap();

        let moves = plan(dir.path(), GroupBy::Extension).unwrap();
        let groups: Vec<&str> = moves.iter().map(|m| m.group.as_str()).collect();
        assert_eq!(groups, vec![NO_EXTENSION_GROUP, "txt", "csv"]);
        assert_eq!(moves[2].to, dir.path().join("csv").join("b.CSV"));
    }

    #[test]
    fn dry_run_leaves_files_in_place() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["a.txt"]);

        let opts = OrganizeOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = organize_directory(dir.path(), &opts).unwrap();
        assert_eq!(report.moved.len(), 1);
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("txt").exists());
    }

    #[test]
    fn moves_files_and_skips_existing_destinations() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["a.txt", "b.txt"]);
        fs::create_dir(dir.path().join("txt")).unwrap();
        fs::write(dir.path().join("txt").join("b.txt"), "old").unwrap();

        let report = organize_directory(dir.path(), &OrganizeOptions::default()).unwrap();
        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(dir.path().join("txt").join("a.txt").exists());
        assert!(dir.path().join("b.txt").exists());
        assert_eq!(fs::read_to_string(dir.path().join("txt").join("b.txt")).unwrap(), "old");
    }

    #[test]
    fn modified_month_groups_use_year_month() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["a.txt"]);
        let moves = plan(dir.path(), GroupBy::ModifiedMonth).unwrap();
        let group = &moves[0].group;
        assert_eq!(group.len(), 7);
        assert_eq!(&group[4..5], "-");
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = plan("/definitely/not/here", GroupBy::Extension).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
