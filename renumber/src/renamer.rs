use std::path::Path;

use crate::error::RenumberError;
use crate::filename::increment_filename;

/// Which directory entries count as images to renumber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// Exact filename suffix, including the dot (e.g. `.tif`).
    pub image_extension: String,
    /// Text the filename must contain (e.g. a well name such as `D1`).
    pub required_substring: String,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            image_extension: ".tif".to_string(),
            required_substring: "D1".to_string(),
        }
    }
}

impl FileFilter {
    fn matches_name(&self, name: &str) -> bool {
        !name.starts_with('.')
            && name.ends_with(&self.image_extension)
            && name.contains(&self.required_substring)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameProgress<'a> {
    Processing { filename: &'a str },
    Renamed { from: &'a str, to: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedFile {
    pub from: String,
    pub to: String,
}

/// Lists the files in `input_dir` that `filter` accepts, in the order they
/// must be renamed (descending, so the highest timepoint moves first).
pub fn collect_candidates(
    input_dir: &Path,
    filter: &FileFilter,
) -> Result<Vec<String>, RenumberError> {
    let read_dir_err = |source| RenumberError::ReadDir {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(input_dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::warn!(name = ?file_name, "skipping entry with non UTF-8 name");
            continue;
        };
        if !filter.matches_name(name) {
            tracing::debug!(name, "skipping entry that does not match the filter");
            continue;
        }
        // Follows symlinks; unreadable metadata counts as "not a file".
        let is_file = std::fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file());
        if !is_file {
            tracing::debug!(name, "skipping entry that is not a regular file");
            continue;
        }
        names.push(name.to_string());
    }

    names.sort_unstable();
    names.reverse();
    Ok(names)
}

/// Renumbers every matching image in `input_dir`, moving it into `output_dir`
/// under its incremented name.
///
/// Files are processed highest name first, so a renamed file never lands on a
/// file that still has to be processed, even when both directories are the
/// same. An existing file at the destination is overwritten.
///
/// The first error stops the batch. Files renamed before it stay renamed.
pub fn rename_files_in_directory<F>(
    input_dir: &Path,
    output_dir: &Path,
    filter: &FileFilter,
    mut on_progress: F,
) -> Result<Vec<RenamedFile>, RenumberError>
where
    F: FnMut(RenameProgress<'_>),
{
    let candidates = collect_candidates(input_dir, filter)?;
    let mut renamed = Vec::with_capacity(candidates.len());

    for filename in candidates {
        on_progress(RenameProgress::Processing {
            filename: &filename,
        });
        let new_filename = increment_filename(&filename)?;

        let from = input_dir.join(&filename);
        let to = output_dir.join(&new_filename);
        std::fs::rename(&from, &to)
            .map_err(|source| RenumberError::Rename { from, to, source })?;

        on_progress(RenameProgress::Renamed {
            from: &filename,
            to: &new_filename,
        });
        renamed.push(RenamedFile {
            from: filename,
            to: new_filename,
        });
    }

    Ok(renamed)
}
