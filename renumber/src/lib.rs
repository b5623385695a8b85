//! Shift the timepoint index embedded in microscopy image filenames.
//!
//! Filenames look like `A1_max_m1_t000_c001.tif`: the `_t<NNN>_` field is the
//! timepoint. [`increment_filename`] bumps that field by one, and
//! [`rename_files_in_directory`] applies it to every matching image in a
//! directory, highest index first, to free up the `t000` slot for a new frame.

mod error;
mod filename;
mod renamer;

pub use error::RenumberError;
pub use filename::Timepoint;
pub use filename::find_timepoint;
pub use filename::increment_filename;
pub use filename::split_extension;
pub use renamer::FileFilter;
pub use renamer::RenameProgress;
pub use renamer::RenamedFile;
pub use renamer::collect_candidates;
pub use renamer::rename_files_in_directory;
