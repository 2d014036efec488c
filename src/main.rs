use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use plugin_catalog::check::UrlChecker;
use plugin_catalog::commands;
use plugin_catalog::config::CatalogConfig;
use plugin_catalog::logging::{self, LogFormat, LogOptions};
use plugin_catalog::remote::{DefaultLister, GitCliLister, SmartHttpLister};

#[derive(Parser)]
#[command(name = "plugin-catalog")]
#[command(version, about = "Maintenance tools for a plugin manifest catalog")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/plugin-catalog/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    log_format: LogFormatArg,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Update manifests to their newest upstream version
    Autoupdate {
        /// Manifest file, or directory of manifests
        target: PathBuf,

        /// Resolve versions without rewriting files
        #[arg(long)]
        dry_run: bool,
    },
    /// Check that `url` and `iconUrl` of each manifest resolve
    CheckUrls {
        /// Manifest file, or directory of manifests
        target: PathBuf,
    },
    /// Write every manifest of a directory into one YAML index
    GenerateIndex {
        manifest_dir: PathBuf,
        output: PathBuf,
    },
    /// Render a markdown plugin table from a YAML index
    GenerateTable { index: PathBuf, output: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&LogOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        format: cli.log_format.into(),
        file: cli.log_file.clone(),
    })?;
    let config = CatalogConfig::load(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Autoupdate { target, dry_run } => {
            let lister = DefaultLister::new(
                SmartHttpLister::new(&config.http),
                GitCliLister::default(),
            );
            runtime.block_on(commands::autoupdate::run(&target, &lister, dry_run))
        }
        Command::CheckUrls { target } => {
            let checker = UrlChecker::new(&config.http);
            runtime.block_on(commands::check_urls::run(&target, &checker))
        }
        Command::GenerateIndex {
            manifest_dir,
            output,
        } => commands::generate::run_index(&manifest_dir, &output),
        Command::GenerateTable { index, output } => {
            commands::generate::run_table(&index, &output, &config.table.default_icon_url)
        }
    }
}
