use std::{io, process::ExitCode, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    content::StaticContentProvider, load_client_config, theme::Theme, HttpQuestionnaireApi,
    QuestionnaireController, RetreatPolicy,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod session;

use render::{print_content, stdout_supports_color, ContentFilters, ContentKind, Styler};
use session::run_session;

#[derive(Parser, Debug)]
#[command(name = "neurocare", about = "NeuroCare questionnaire and resources")]
struct Cli {
    /// Color theme: light or dark.
    #[arg(long, global = true)]
    theme: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer the screening questionnaire and submit it.
    Questionnaire {
        #[arg(long)]
        server_url: Option<String>,
        /// Request timeout in seconds; must be at least 1.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: Option<u64>,
        /// Drop the answer of a question when going back from it.
        #[arg(long)]
        discard_on_back: bool,
    },
    /// Browse the bundled resources, community, and specialists.
    Content {
        #[arg(value_enum)]
        kind: ContentKind,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let styler = Styler::new(
        Theme::from_preference(cli.theme.as_deref()),
        stdout_supports_color(),
    );
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Questionnaire {
            server_url,
            timeout_secs,
            discard_on_back,
        } => {
            let mut config = load_client_config();
            if let Some(url) = server_url {
                config.api_base_url = url;
            }
            if let Some(secs) = timeout_secs {
                config.request_timeout = Duration::from_secs(secs);
            }
            info!(api = %config.api_base_url, "starting questionnaire");

            let api = HttpQuestionnaireApi::new(&config)?;
            let policy = if discard_on_back {
                RetreatPolicy::DiscardAbandoned
            } else {
                RetreatPolicy::KeepAnswers
            };
            let mut controller = QuestionnaireController::new(policy);
            let outcome = run_session(
                &mut controller,
                &api,
                &styler,
                io::stdin().lock(),
                &mut stdout,
            )
            .await?;
            if outcome.is_failure() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Content {
            kind,
            category,
            location,
            search,
        } => {
            let filters = ContentFilters {
                category,
                location,
                search,
            };
            print_content(
                &StaticContentProvider::default(),
                kind,
                &filters,
                &styler,
                &mut stdout,
            )
            .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
