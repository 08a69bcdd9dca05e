//! Crewline — role dispatch & delivery CLI.
//!
//! ## Commands
//!
//! - `run`: orchestrated mode — keyword detection with delegated fallback
//! - `all`: execute every role against the request
//! - `agent`: force a single named role
//! - `send`: send a formatted email directly, bypassing dispatch

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use crewline_core::{
    format_email, infer_display_name, init_tracing, to_plain_text, DispatchError, Pipeline, Role,
    RunKey, RunMode, RunResult, NOT_SELECTED,
};
use crewline_llm::OpenAiClient;
use crewline_mail::SmtpMailer;

#[derive(Parser)]
#[command(name = "crewline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Route a request to specialist roles and deliver the result", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Orchestrated run: detect roles, fall back to the delegated decider
    Run {
        /// Maximum number of roles the delegated decider may pick (1-5)
        #[arg(long, default_value_t = 5)]
        max_roles: usize,

        /// The request text
        #[arg(required = true)]
        request: Vec<String>,
    },

    /// Run every role against the request
    All {
        /// The request text
        #[arg(required = true)]
        request: Vec<String>,
    },

    /// Force a single role
    Agent {
        /// Role name (Researcher, Writer, Summarizer, Reviewer, Emailer)
        #[arg(short, long)]
        role: String,

        /// The request text
        #[arg(required = true)]
        request: Vec<String>,
    },

    /// Send a formatted email directly
    Send {
        /// Recipient address (repeatable)
        #[arg(long = "to", required = true)]
        to: Vec<String>,

        /// Subject line
        #[arg(long)]
        subject: String,

        /// The body text
        #[arg(required = true)]
        body: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let mailer = SmtpMailer::from_env();
    let sender = mailer.config().sender();
    let pipeline = Pipeline::new(Arc::new(OpenAiClient::from_env()))
        .with_mail(Arc::new(SmtpMailer::from_env()), sender.clone());

    match cli.command {
        Commands::Run { max_roles, request } => {
            let request = request.join(" ");
            let result = pipeline
                .run(&request, RunMode::Orchestrated { max_roles })
                .await?;
            render_orchestrated(&result);
        }
        Commands::All { request } => {
            let request = request.join(" ");
            let result = pipeline.run(&request, RunMode::All).await?;
            render(&result);
        }
        Commands::Agent { role, request } => {
            let role = match Role::from_str(&role) {
                Ok(role) => role,
                Err(e @ DispatchError::UnknownRole { .. }) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            };
            let request = request.join(" ");
            let result = pipeline.run(&request, RunMode::Forced(role)).await?;
            render(&result);
        }
        Commands::Send { to, subject, body } => {
            let draft = format_email(
                &subject,
                "Dear Recipient,",
                &[(String::new(), body.join(" "))],
                "Best regards,",
                &[infer_display_name(&sender), sender.clone()],
            );
            use crewline_core::MailTransport;
            match mailer.send(&draft.subject, &draft.body, &to).await {
                Ok(confirmation) => println!("{confirmation}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Print every produced entry in canonical order.
fn render(result: &RunResult) {
    println!("\n=== Final Outputs ===");
    for (key, text) in result {
        println!("{key}: {}", to_plain_text(text));
    }
}

/// Print the full key set, marking roles the run skipped.
fn render_orchestrated(result: &RunResult) {
    println!("\n=== Final Outputs ===");
    let all_keys = Role::ALL
        .into_iter()
        .map(RunKey::Role)
        .chain([RunKey::EmailDelivery]);
    for key in all_keys {
        match result.get(&key) {
            Some(text) => println!("{key}: {}", to_plain_text(text)),
            None => println!("{key}: {NOT_SELECTED}"),
        }
    }
}
