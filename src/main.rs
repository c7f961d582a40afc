//! xcompile - cross-compile native source trees for every Android ABI
//!
//! Command line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xcompile::commands::{BuildCommand, ListArchCommand, SettingsOverrides};
use xcompile::core::ToolchainLayout;
use xcompile::{APP_NAME, VERSION};

/// Environment variable holding the log filter
const LOG_ENV: &str = "XCOMPILE_LOG";

#[derive(Parser)]
#[command(name = "xcompile", version, about = "Cross-compile native source trees for Android")]
struct Cli {
    /// Settings file (defaults to $XCOMPILE_CONFIG or the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the architectures of a target.
    ListArch {
        /// Target platform, e.g. android.
        target: String,
    },
    /// Build a source tree for every architecture of a target.
    Build {
        /// Target platform, e.g. android.
        target: String,
        /// Install root; each architecture installs to <output>/<arch>.
        output: PathBuf,
        /// Source tree to build.
        #[arg(default_value = ".")]
        source_path: PathBuf,
        /// Comma-separated architectures (default: all of the target's).
        #[arg(long = "arch")]
        arch: Option<String>,
        /// Build type (autotools | openssl); detected when omitted.
        #[arg(long = "build-type")]
        build_type: Option<String>,
        /// NDK root (overrides $NDK and the settings file).
        #[arg(long)]
        ndk: Option<PathBuf>,
        /// Android API level compilers are pinned to.
        #[arg(long)]
        api: Option<u32>,
        /// NDK toolchain layout (prebuilt | standalone).
        #[arg(long)]
        toolchain: Option<ToolchainLayout>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    debug!("{} v{}", APP_NAME, VERSION);

    match cli.command {
        Command::ListArch { target } => {
            let settings = SettingsOverrides {
                config: cli.config,
                ..Default::default()
            }
            .resolve()?;
            let archs = ListArchCommand { target }.execute(settings)?;
            println!("{}", archs);
        }
        Command::Build {
            target,
            output,
            source_path,
            arch,
            build_type,
            ndk,
            api,
            toolchain,
        } => {
            let settings = SettingsOverrides {
                config: cli.config,
                ndk,
                api_level: api,
                toolchain,
            }
            .resolve()?;
            BuildCommand {
                target,
                output,
                source: source_path,
                architectures: arch,
                build_type,
            }
            .execute(settings)
            .await?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `$XCOMPILE_LOG`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
