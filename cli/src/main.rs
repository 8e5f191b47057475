//! Docflow CLI - manage blob containers and run the processing workflow
//!
//! # Commands
//!
//! ```bash
//! docflow list                         # Files of every container
//! docflow upload scan.pdf -c bronze    # Upload one file
//! docflow delete bronze/scan.pdf       # Delete after confirmation
//! docflow run bronze/a.pdf bronze/b.pdf  # Start the workflow and poll it
//! docflow status <statusQueryGetUri>   # One status fetch
//! docflow watch <statusQueryGetUri>    # Poll an already started job
//! ```
//!
//! The API base URL comes from `--api-url`, `DOCFLOW_API_URL` or `.env`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use docflow_cli::commands::{
    cmd_delete, cmd_list, cmd_run, cmd_status, cmd_upload, cmd_watch, parse_blob_path,
};
use docflow_cli::{logging, ClientSettings, CliResult, HttpApi, TokioPause, DEFAULT_API_URL};
use docflow_core::{CancellationToken, Container, WorkflowSettings, REQUIRED_CONTAINER};

#[derive(Parser)]
#[command(name = "docflow")]
#[command(
    about = "Manage blob containers and run the document-processing workflow",
    long_about = None
)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "DOCFLOW_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files per container
    List {
        /// Only this container
        #[arg(short, long, value_parser = parse_container)]
        container: Option<Container>,
    },

    /// Upload a local file
    Upload {
        /// Local file
        file: PathBuf,

        /// Target container
        #[arg(short, long, default_value = "bronze", value_parser = parse_container)]
        container: Container,

        /// Blob name (default: the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Largest file accepted, in bytes
        #[arg(long, default_value = "52428800")]
        max_size: u64,
    },

    /// Delete blobs given as <container>/<name>
    Delete {
        #[arg(required = true, value_parser = parse_path_arg)]
        blobs: Vec<(Container, String)>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the workflow on blobs given as <container>/<name> and poll it
    Run {
        #[arg(required = true, value_parser = parse_path_arg)]
        blobs: Vec<(Container, String)>,

        /// Container the workflow accepts
        #[arg(long, default_value_t = REQUIRED_CONTAINER, value_parser = parse_container)]
        required: Container,

        /// Seconds between status checks
        #[arg(long, default_value = "5")]
        poll_interval: u64,

        /// Terminate the remote job when interrupted with Ctrl-C
        #[arg(long)]
        terminate_on_interrupt: bool,
    },

    /// Fetch the status of a job once
    Status {
        /// statusQueryGetUri returned when the job was started
        uri: String,
    },

    /// Poll a job until it finishes
    Watch {
        /// statusQueryGetUri returned when the job was started
        uri: String,

        /// Seconds between status checks
        #[arg(long, default_value = "5")]
        poll_interval: u64,
    },
}

fn parse_container(s: &str) -> Result<Container, String> {
    s.parse()
}

fn parse_path_arg(s: &str) -> Result<(Container, String), String> {
    parse_blob_path(s).map_err(|e| e.to_string())
}

/// Ask on stderr, read the answer from stdin.
fn confirm_on_stdin(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// Token cancelled on the first Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, stopping");
            child.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::initialize(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    log::debug!("Using API at {}", cli.api_url);
    let api = HttpApi::new(ClientSettings {
        base_url: cli.api_url,
        timeout: Duration::from_secs(cli.timeout),
    })?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::List { container } => cmd_list(&api, container, &mut out).await,

        Commands::Upload {
            file,
            container,
            name,
            max_size,
        } => cmd_upload(&api, &file, container, name, max_size, &mut out).await,

        Commands::Delete { blobs, yes } => {
            cmd_delete(&api, &blobs, |prompt| yes || confirm_on_stdin(prompt), &mut out).await
        }

        Commands::Run {
            blobs,
            required,
            poll_interval,
            terminate_on_interrupt,
        } => {
            let settings = WorkflowSettings {
                required,
                poll_interval: Duration::from_secs(poll_interval),
            };
            let cancel = interrupt_token();
            cmd_run(
                &api,
                &TokioPause,
                &blobs,
                &settings,
                &cancel,
                terminate_on_interrupt,
                &mut out,
            )
            .await
        }

        Commands::Status { uri } => cmd_status(&api, &uri, &mut out).await,

        Commands::Watch { uri, poll_interval } => {
            let settings = WorkflowSettings {
                poll_interval: Duration::from_secs(poll_interval),
                ..Default::default()
            };
            let cancel = interrupt_token();
            cmd_watch(&api, &TokioPause, &uri, &settings, &cancel, &mut out).await
        }
    }
}
