use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenumberError {
    /// The base name has no `_t<NNN>_` timepoint field.
    #[error("no number found in filename `{filename}`")]
    InvalidFormat { filename: String },

    #[error("failed to list directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename {} to {}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
