mod config;

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use timepoint_renumber::FileFilter;
use timepoint_renumber::RenameProgress;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ConfigStore;
use crate::config::RenumberConfig;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Shift the timepoint index (`_t000_`) of microscopy images up by one"
)]
struct Cli {
    /// Directory holding the images to renumber. Falls back to `input_dir` in the config file.
    input_dir: Option<PathBuf>,

    /// Directory that receives the renamed files. Defaults to the input directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Filename suffix of the images to renumber, including the dot.
    #[arg(long = "extension", env = "RENUMBER_IMAGE_EXTENSION")]
    image_extension: Option<String>,

    /// Text a filename must contain to be renumbered.
    #[arg(long = "contains", env = "RENUMBER_REQUIRED_SUBSTRING")]
    required_substring: Option<String>,

    /// Path to the config file (default: `~/.timepoint-renumber/config.toml`).
    #[arg(long, env = "RENUMBER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunSettings {
    input_dir: PathBuf,
    output_dir: PathBuf,
    filter: FileFilter,
}

/// Command-line values win over the config file, which wins over the defaults.
fn resolve_settings(cli: Cli, config: RenumberConfig) -> anyhow::Result<RunSettings> {
    let Some(input_dir) = cli.input_dir.or(config.input_dir) else {
        anyhow::bail!(
            "no input directory given: pass INPUT_DIR or set `input_dir` in the config file"
        );
    };
    let output_dir = cli
        .output_dir
        .or(config.output_dir)
        .unwrap_or_else(|| input_dir.clone());

    let defaults = FileFilter::default();
    let filter = FileFilter {
        image_extension: cli
            .image_extension
            .or(config.image_extension)
            .unwrap_or(defaults.image_extension),
        required_substring: cli
            .required_substring
            .or(config.required_substring)
            .unwrap_or(defaults.required_substring),
    };

    Ok(RunSettings {
        input_dir,
        output_dir,
        filter,
    })
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RenumberConfig> {
    let store = match path {
        Some(path) => ConfigStore::new(path.to_path_buf()),
        None => match ConfigStore::new_default() {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!("failed to locate config file: {err}");
                return Ok(RenumberConfig::default());
            }
        },
    };
    tracing::debug!(path = %store.path().display(), "loading config");
    store
        .load()
        .with_context(|| format!("load config from {}", store.path().display()))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn header_line(settings: &RunSettings) -> String {
    format!(
        "Renumbering `*{}` files containing `{}` in {} (output: {})",
        settings.filter.image_extension,
        settings.filter.required_substring,
        settings.input_dir.display(),
        settings.output_dir.display(),
    )
}

fn progress_line(event: RenameProgress<'_>) -> String {
    match event {
        RenameProgress::Processing { filename } => format!("Processing {filename}"),
        RenameProgress::Renamed { from, to } => format!("Renamed {from} -> {to}"),
    }
}

fn summary_line(renamed: usize) -> String {
    format!("Renamed {renamed} file(s)")
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let settings = resolve_settings(cli, config)?;
    tracing::debug!(?settings, "resolved settings");

    println!("{}", header_line(&settings));

    let renamed = timepoint_renumber::rename_files_in_directory(
        &settings.input_dir,
        &settings.output_dir,
        &settings.filter,
        |event| println!("{}", progress_line(event)),
    )
    .with_context(|| format!("renumber files in {}", settings.input_dir.display()))?;

    println!("{}", summary_line(renamed.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("renumber-timepoints").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("parse args")
    }

    #[test]
    fn flags_parse_into_cli() {
        let cli = parse(&[
            "/data/in",
            "--output-dir",
            "/data/out",
            "--extension",
            ".tiff",
            "--contains",
            "B2",
            "--config",
            "/etc/renumber.toml",
        ]);

        assert_eq!(cli.input_dir, Some(PathBuf::from("/data/in")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/data/out")));
        assert_eq!(cli.image_extension.as_deref(), Some(".tiff"));
        assert_eq!(cli.required_substring.as_deref(), Some("B2"));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/renumber.toml")));
    }

    #[test]
    fn rejects_extra_positional_args() {
        assert!(Cli::try_parse_from(["renumber-timepoints", "a", "b"]).is_err());
    }

    #[test]
    fn output_dir_defaults_to_input_dir() {
        let settings = resolve_settings(
            parse(&["/data/in", "--extension", ".tif", "--contains", "D1"]),
            RenumberConfig::default(),
        )
        .expect("resolve");

        assert_eq!(
            settings,
            RunSettings {
                input_dir: PathBuf::from("/data/in"),
                output_dir: PathBuf::from("/data/in"),
                filter: FileFilter::default(),
            }
        );
    }

    #[test]
    fn cli_values_override_config() {
        let config = RenumberConfig {
            input_dir: Some(PathBuf::from("/config/in")),
            output_dir: Some(PathBuf::from("/config/out")),
            image_extension: Some(".png".to_string()),
            required_substring: Some("X9".to_string()),
        };
        let settings = resolve_settings(
            parse(&[
                "/cli/in",
                "--output-dir",
                "/cli/out",
                "--extension",
                ".tif",
                "--contains",
                "D1",
            ]),
            config,
        )
        .expect("resolve");

        assert_eq!(settings.input_dir, PathBuf::from("/cli/in"));
        assert_eq!(settings.output_dir, PathBuf::from("/cli/out"));
        assert_eq!(settings.filter, FileFilter::default());
    }

    #[test]
    fn config_fills_in_missing_cli_values() {
        let cli = Cli {
            input_dir: None,
            output_dir: None,
            image_extension: None,
            required_substring: None,
            config: None,
        };
        let config = RenumberConfig {
            input_dir: Some(PathBuf::from("/config/in")),
            output_dir: None,
            image_extension: Some(".png".to_string()),
            required_substring: None,
        };

        let settings = resolve_settings(cli, config).expect("resolve");

        assert_eq!(settings.input_dir, PathBuf::from("/config/in"));
        assert_eq!(settings.output_dir, PathBuf::from("/config/in"));
        assert_eq!(settings.filter.image_extension, ".png");
        assert_eq!(settings.filter.required_substring, "D1");
    }

    #[test]
    fn missing_input_dir_is_an_error() {
        let cli = Cli {
            input_dir: None,
            output_dir: Some(PathBuf::from("/out")),
            image_extension: None,
            required_substring: None,
            config: None,
        };
        assert!(resolve_settings(cli, RenumberConfig::default()).is_err());
    }

    #[test]
    fn stdout_lines_describe_each_step() {
        let settings = RunSettings {
            input_dir: PathBuf::from("/data/in"),
            output_dir: PathBuf::from("/data/out"),
            filter: FileFilter::default(),
        };

        assert_eq!(
            header_line(&settings),
            format!(
                "Renumbering `*.tif` files containing `D1` in {} (output: {})",
                Path::new("/data/in").display(),
                Path::new("/data/out").display(),
            )
        );
        assert_eq!(
            progress_line(RenameProgress::Processing {
                filename: "A1D1_t000_c001.tif",
            }),
            "Processing A1D1_t000_c001.tif"
        );
        assert_eq!(
            progress_line(RenameProgress::Renamed {
                from: "A1D1_t000_c001.tif",
                to: "A1D1_t001_c001.tif",
            }),
            "Renamed A1D1_t000_c001.tif -> A1D1_t001_c001.tif"
        );
        assert_eq!(summary_line(2), "Renamed 2 file(s)");
        assert_eq!(summary_line(0), "Renamed 0 file(s)");
    }

    #[test]
    fn load_config_reads_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("renumber.toml");
        std::fs::write(&path, "required_substring = \"C3\"\n").expect("write config");

        let config = load_config(Some(path.as_path())).expect("load");
        assert_eq!(config.required_substring.as_deref(), Some("C3"));
    }
}
