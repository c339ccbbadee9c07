use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ghquick::App;
use ghquick::Config;
use ghquick::commands::ship::ShipRequest;
use ghquick::exec::CancelHandle;
use ghquick::exec::RealExecutor;
use ghquick::exec::cancel_pair;
use ghquick::logging;
use tracing::warn;

#[derive(Parser)]
#[command(name = "ghquick")]
#[command(about = "Quick commit and push: initialize, stage, commit and push in one command", long_about = None)]
pub struct Cli {
    /// Repository working directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub dir: PathBuf,
    /// Enable debug logging (also shows every git command line)
    #[arg(short, long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct Identity {
    /// GitHub account, used for the remote URL and as committer name
    #[arg(long, env = "GITHUB_USERNAME")]
    pub account: Option<String>,
    /// Committer name (defaults to the account)
    #[arg(long)]
    pub committer_name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up the repository, then stage, commit and push everything
    Ship {
        /// Commit message
        #[arg(short, long)]
        message: String,
        /// Repository name for the remote URL (defaults to the directory name)
        #[arg(short, long)]
        repo: Option<String>,
        /// Remote to push to (defaults to origin)
        #[arg(long, default_value = "")]
        remote: String,
        /// Branch to push (defaults to main)
        #[arg(short, long, default_value = "")]
        branch: String,
        /// Show the pending diff and stop
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        identity: Identity,
    },
    /// Initialize the repository and configure identity and remote
    Setup {
        /// Repository name for the remote URL (defaults to the directory name)
        #[arg(short, long)]
        repo: Option<String>,
        #[command(flatten)]
        identity: Identity,
    },
    /// Show pending changes (staged, else unstaged)
    Diff,
}

/// Cancel in-flight git commands on Ctrl-C.
fn cancel_on_interrupt(handle: CancelHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            handle.cancel();
        }
    });
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (account, committer_name) = match &cli.command {
        Commands::Ship { identity, .. } | Commands::Setup { identity, .. } => (
            identity.account.clone(),
            identity.committer_name.clone(),
        ),
        Commands::Diff => (None, None),
    };
    let config = Config::load(&cli.dir, cli.debug, account, committer_name)?;
    let app = App::new(config, RealExecutor::new());

    let (handle, cancel) = cancel_pair();
    cancel_on_interrupt(handle);

    let mut stdout = std::io::stdout();
    match cli.command {
        Commands::Ship {
            message,
            repo,
            remote,
            branch,
            dry_run,
            identity: _,
        } => {
            let request = ShipRequest {
                message,
                repo,
                remote,
                branch,
                dry_run,
            };
            app.cmd_ship(&request, &cancel, &mut stdout).await
        }
        Commands::Setup { repo, identity: _ } => {
            app.cmd_setup(repo.as_deref(), &cancel, &mut stdout).await
        }
        Commands::Diff => app.cmd_diff(&cancel, &mut stdout).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.debug) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
