use anyhow::Result;
use brewlet::{commands, error::InstallError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// brewlet - install a prebuilt binary described by a formula
///
/// Picks the artifact for this machine's OS and architecture, checks its
/// SHA-256, installs it atomically and runs its smoke test.
///
/// Examples:
///   brewlet -f dppm.json install     # Install into ~/.local/bin
///   brewlet -f dppm.json resolve     # Show what would be downloaded
#[derive(Parser, Debug)]
#[command(author, version = env!("BREWLET_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Formula file describing the binary (also via BREWLET_FORMULA)
    #[arg(
        long = "formula",
        short = 'f',
        env = "BREWLET_FORMULA",
        value_name = "PATH",
        global = true
    )]
    pub formula: Option<PathBuf>,

    /// Directory to install into (overrides defaults; also via BREWLET_BIN_DIR)
    #[arg(
        long = "bin-dir",
        short = 'b',
        env = "BREWLET_BIN_DIR",
        value_name = "DIR",
        global = true
    )]
    pub bin_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Download, verify and install the binary
    Install(InstallArgs),

    /// Show the artifact selected for this machine without downloading it
    Resolve,

    /// Run the post-install checks against the installed binary
    Verify,

    /// Remove the installed binary
    Uninstall,

    /// Show formula details and caveats
    Info,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Do not print the formula caveats after installing
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

async fn run(cli: Cli) -> Result<()> {
    let runtime = brewlet::runtime::RealRuntime;
    let formula = cli.formula.ok_or_else(|| {
        InstallError::Config("no formula given, use --formula or BREWLET_FORMULA".to_string())
    })?;

    match cli.command {
        Commands::Install(args) => {
            commands::install(runtime, &formula, cli.bin_dir, args.quiet).await?
        }
        Commands::Resolve => commands::resolve(runtime, &formula, cli.bin_dir)?,
        Commands::Verify => commands::verify(runtime, &formula, cli.bin_dir)?,
        Commands::Uninstall => commands::uninstall(runtime, &formula, cli.bin_dir)?,
        Commands::Info => commands::info(runtime, &formula)?,
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = InstallError::find(&e).map(|e| e.exit_code()).unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_install_parsing() {
        let cli = Cli::try_parse_from(["brewlet", "-f", "dppm.json", "install"]).unwrap();
        match cli.command {
            Commands::Install(args) => assert!(!args.quiet),
            _ => panic!("Expected Install command"),
        }
        assert_eq!(cli.formula, Some(PathBuf::from("dppm.json")));
    }

    #[test]
    fn test_cli_install_quiet() {
        let cli = Cli::try_parse_from(["brewlet", "install", "--quiet", "-f", "x.json"]).unwrap();
        match cli.command {
            Commands::Install(args) => assert!(args.quiet),
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_global_bin_dir_parsing() {
        let cli = Cli::try_parse_from([
            "brewlet",
            "--bin-dir",
            "/opt/bin",
            "-f",
            "dppm.json",
            "uninstall",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Uninstall));
        assert_eq!(cli.bin_dir, Some(PathBuf::from("/opt/bin")));
    }

    #[test]
    fn test_cli_bin_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["brewlet", "resolve", "-b", "/tmp/bin"]).unwrap();
        assert!(matches!(cli.command, Commands::Resolve));
        assert_eq!(cli.bin_dir, Some(PathBuf::from("/tmp/bin")));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["brewlet", "-f", "dppm.json"]);
        assert!(result.is_err());
    }
}
