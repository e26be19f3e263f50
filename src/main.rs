use clap::{Args, Parser, Subcommand};
use prthreads::commands::{self, ListRequest, ReplyRequest};
use prthreads::config;
use prthreads::github::client::GhCli;
use prthreads::github::errors::format_error_chain;
use prthreads::logging;
use std::process::ExitCode;

/// List, reply to, and resolve GitHub pull request review threads via `gh`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List review threads of a pull request.
    List(ListArgs),
    /// Reply to a review comment.
    Reply(ReplyArgs),
    /// Mark a review thread as resolved.
    Resolve(ThreadArgs),
    /// Mark a review thread as unresolved.
    Unresolve(ThreadArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Pull request number. Defaults to the pull request of the current branch.
    #[arg(value_name = "PR")]
    pulls: Vec<String>,

    /// Repository as OWNER/REPO or HOST/OWNER/REPO. Defaults to `gh repo view`.
    #[arg(short = 'R', long, value_name = "OWNER/REPO")]
    repo: Option<String>,

    /// Print the raw GraphQL-shaped JSON payload.
    #[arg(long)]
    json: bool,

    /// Only show resolved threads.
    #[arg(long)]
    resolved: bool,

    /// Only show unresolved threads.
    #[arg(long)]
    unresolved: bool,
}

#[derive(Debug, Args)]
struct ReplyArgs {
    /// Numeric database id of the comment to reply to (shown as `#ID` by `list`).
    comment_id: u64,

    /// Reply text.
    #[arg(short, long)]
    body: String,

    /// Repository as OWNER/REPO or HOST/OWNER/REPO. Defaults to `gh repo view`.
    #[arg(short = 'R', long, value_name = "OWNER/REPO")]
    repo: Option<String>,
}

#[derive(Debug, Args)]
struct ThreadArgs {
    /// Review thread node id (shown in brackets by `list`).
    thread_id: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors share the exit status of every other failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => error.exit(),
        Err(error) => {
            let _ = error.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", format_error_chain(&*error));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = config::load()?;
    logging::init(&config.log_level, cli.verbose);

    let gh = GhCli::new(config.agent)?;

    let output = match cli.command {
        Command::List(args) => {
            let request = ListRequest {
                pulls: args.pulls,
                repo: args.repo,
                resolved: args.resolved,
                unresolved: args.unresolved,
                json: args.json,
            };
            commands::run_list(&gh, &gh, &request).await?
        }
        Command::Reply(args) => {
            let request = ReplyRequest {
                comment_id: args.comment_id,
                body: args.body,
                repo: args.repo,
            };
            commands::run_reply(&gh, &gh, &request).await?
        }
        Command::Resolve(args) => commands::run_set_resolved(&gh, &args.thread_id, true).await?,
        Command::Unresolve(args) => {
            commands::run_set_resolved(&gh, &args.thread_id, false).await?
        }
    };

    Ok(output)
}
