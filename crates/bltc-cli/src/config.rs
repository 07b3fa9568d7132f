//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the options derived from
//! it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`BLTC__COMPILER__PROGRAM=...`)
//! 3. The file given with `--config`; without it, `.bltc.toml` in the
//!    working directory, then the user config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use bltc_adapters::transform::{DEFAULT_COMPILER, DEFAULT_DEBUG_ARGS};
use bltc_core::domain::DEFAULT_OUTPUT_EXTENSION;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = ".bltc.toml";

/// Prefix of environment overrides; nesting uses `__`.
const ENV_PREFIX: &str = "BLTC";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The external template compiler.
    pub compiler: CompilerConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Input search settings.
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Appended to `args` with `--debug`.
    pub debug_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension given to default destinations.
    pub extension: String,
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Searched after any `-D` directories.
    pub input_dirs: Vec<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMPILER.into(),
            args: Vec::new(),
            debug_args: DEFAULT_DEBUG_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_OUTPUT_EXTENSION.into(),
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let mut builder = Config::builder().add_source(defaults);
        builder = match config_file {
            Some(path) => builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            ),
            None => builder
                .add_source(
                    File::from(Self::config_path())
                        .format(FileFormat::Toml)
                        .required(false),
                )
                .add_source(
                    File::from(Path::new(LOCAL_CONFIG))
                        .format(FileFormat::Toml)
                        .required(false),
                ),
        };
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("compiler.args")
                .with_list_parse_key("compiler.debug_args")
                .with_list_parse_key("search.input_dirs"),
        );

        let config = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Self>()
            .context("Invalid configuration")?;

        if config.compiler.program.trim().is_empty() {
            anyhow::bail!("compiler.program must not be empty");
        }
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.bltc.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "bltc", "bltc")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
    }

    /// The configuration rendered as TOML, for `--print-config`.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_extension_is_lua() {
        assert_eq!(AppConfig::default().output.extension, "lua");
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[compiler]\nprogram = \"luac-blt\"\nargs = [\"-O\"]\n\n[output]\nextension = \"txt\""
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.compiler.program, "luac-blt");
        assert_eq!(cfg.compiler.args, ["-O"]);
        assert_eq!(cfg.output.extension, "txt");
        // Untouched keys keep their defaults.
        assert_eq!(cfg.compiler.debug_args, ["--debug"]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/bltc.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn toml_round_trips_through_loader() {
        let rendered = AppConfig::default().to_toml().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(rendered.as_bytes()).unwrap();

        let cfg = AppConfig::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
