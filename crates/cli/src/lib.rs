mod check;
mod dump;
mod view;

pub use check::{CheckReport, check_file};
pub use dump::{syntax_tree, token_rows};

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use xtc_core::{AdapterKind, ServerConfig};

#[derive(Parser)]
#[command(
    name = "xtc",
    version,
    about = "Language intelligence for XTC source files",
    long_about = "Parses XTC source with an error-tolerant grammar and serves editor features \
                  (diagnostics, outline, navigation, semantic highlighting) over the Language \
                  Server Protocol, or inspects single files from the command line."
)]
pub struct Cli {
    /// Also write logs to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Language Server Protocol (LSP) server on stdin/stdout
    Lsp {
        /// Backend answering requests; falls back to simpler ones if it cannot start
        #[arg(long, env = "XTC_LSP_ADAPTER", default_value = "tree")]
        adapter: AdapterKind,
    },
    /// Report diagnostics and the outline of a file. Exits non-zero on errors
    Check {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[arg(long, env = "XTC_LSP_ADAPTER", default_value = "tree")]
        adapter: AdapterKind,
    },
    /// Print the semantic tokens of a file, decoded to absolute positions
    Tokens {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Print the syntax tree of a file as an S-expression
    Tree {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Lsp { .. } => "lsp",
        _ => "cli",
    };
    let _guard = xtc_core::logging::init_logging(component, cli.verbose);

    match cli.command {
        Commands::Lsp { adapter } => {
            let config = ServerConfig {
                adapter,
                log_to_stderr: cli.verbose,
                ..ServerConfig::default()
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(xtc_lsp::run_server(config, xtc_core::select_adapter))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { path, adapter } => {
            let report = check_file(&path, adapter)?;
            print!("{}", report.render());
            Ok(if report.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Tokens { path } => {
            let content = read(&path)?;
            let rows = token_rows(&content)?;
            println!("{}", view::table(rows));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tree { path } => {
            let content = read(&path)?;
            println!("{}", syntax_tree(&content)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

pub(crate) fn read(path: &std::path::Path) -> anyhow::Result<String> {
    use anyhow::Context;
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}
