//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quickzip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Treat EXT as an archive extension for this run (can be repeated)
    #[arg(
        id = "custom_extension",
        long = "extension",
        short = 'e',
        value_name = "EXT",
        global = true
    )]
    pub custom_extensions: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a zip archive from files and directories
    Zip(ZipArgs),
    /// Extract a zip archive
    Unzip(UnzipArgs),
    /// Inspect recognized archive extensions
    #[command(subcommand)]
    Ext(ExtCommand),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Operation name used in error reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Zip(_) => "zip",
            Self::Unzip(_) => "unzip",
            Self::Ext(ExtCommand::Check { .. }) => "ext-check",
            Self::Ext(ExtCommand::List) => "ext-list",
            Self::Completion { .. } => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct ZipArgs {
    /// Output archive path (with --quick, the first source instead)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required_unless_present = "quick")]
    pub sources: Vec<PathBuf>,

    /// Write to <QUICKZIP_HOME>/<NAME>.zip instead of OUTPUT
    #[arg(long, value_name = "NAME")]
    pub quick: Option<String>,

    /// Encrypt every entry with this password
    #[arg(short, long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Compression level (0 = store, 1-9 = deflate)
    #[arg(short = 'l', long, default_value = "6", value_parser = clap::value_parser!(u8).range(0..=9))]
    pub level: u8,

    /// Use legacy ZipCrypto instead of AES-256
    #[arg(long, requires = "password")]
    pub legacy_encryption: bool,

    /// Leave out files whose archive name ends with SUFFIX (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "SUFFIX")]
    pub exclude: Vec<String>,

    /// Do not store Unix permissions
    #[arg(long)]
    pub no_permissions: bool,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

impl ZipArgs {
    /// Returns every source, including OUTPUT when `--quick` is used.
    pub fn all_sources(&self) -> Vec<PathBuf> {
        if self.quick.is_some() {
            std::iter::once(self.output.clone())
                .chain(self.sources.iter().cloned())
                .collect()
        } else {
            self.sources.clone()
        }
    }
}

#[derive(clap::Args)]
pub struct UnzipArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: <QUICKZIP_HOME>/<archive name>)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Password for encrypted entries
    #[arg(short, long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Overwrite existing files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Do not restore Unix permissions
    #[arg(long)]
    pub no_permissions: bool,
}

#[derive(Subcommand)]
pub enum ExtCommand {
    /// Check whether extensions are recognized as archives
    Check {
        /// Extensions to check, with or without a leading dot
        #[arg(value_name = "EXT", required = true)]
        extensions: Vec<String>,
    },
    /// List built-in and custom extensions
    List,
}
