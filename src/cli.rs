use crate::classify::LlmClassifier;
use crate::config::{self, Config};
use crate::event::Event;
use crate::pipeline::{Pipeline, PipelineEvent};
use crate::trust::SafeBrowsingChecker;
use crate::tui::App;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

/// Terminal search tool that flags shopping results and checks whether they are safe
#[derive(Debug, Parser)]
#[command(
    name = "shopsafe",
    version,
    about,
    after_help = "The config file lives at $SHOPSAFE_CONFIG or <config dir>/shopsafe/config.toml."
)]
pub struct Cli {
    /// Without a subcommand the interactive search window opens
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Classify the results for a query and print them
    Search {
        /// Query words, joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

/// Entry point used by the binary
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let (config, created) = config::load_or_create_config()?;
    if created {
        println!("Created default config at: {}", config::config_path()?.display());
        println!("Please edit this file to add your API credentials.");
        return Ok(());
    }
    config.validate().context("Invalid configuration")?;

    let _log_guard = crate::logging::init(&config)?;
    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Some(Command::Search { query }) => run_headless(&pipeline, &query.join(" ")).await,
        None => run_tui(pipeline).await,
    }
}

/// Wire the configured collaborators into a pipeline
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let source = crate::search::provider_from_config(&config.search)
        .context("Failed to create search provider")?;
    let completion = crate::llm::client_from_config(&config.classifier)
        .context("Failed to create classifier client")?;
    let checker =
        SafeBrowsingChecker::new(&config.trust).context("Failed to create trust checker")?;

    Ok(Pipeline::new(
        source,
        Arc::new(LlmClassifier::new(completion)),
        Arc::new(checker),
        config.log_store_path(),
    )
    .with_result_count(config.result_count))
}

async fn run_headless(pipeline: &Pipeline, query: &str) -> Result<()> {
    pipeline
        .run(query, |event| match event {
            PipelineEvent::Record { record, .. } => {
                println!(
                    "{:<11} {:<8} {}",
                    record.category.as_str(),
                    match record.trusted.as_str() {
                        "" => "-",
                        s => s,
                    },
                    record.url
                );
            }
            PipelineEvent::Degraded { url, reason } => {
                eprintln!("warning: {url}: {reason}");
            }
            PipelineEvent::Finished(log) => {
                eprintln!(
                    "{} results, {} shopping, {} untrusted",
                    log.results.len(),
                    log.shopping_count(),
                    log.untrusted_count()
                );
            }
            _ => {}
        })
        .await?;

    Ok(())
}

type Term = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_tui(pipeline: Pipeline) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, App::new(pipeline)).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut Term, mut app: App) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;

        let event = tokio::select! {
            _ = tick.tick() => Some(Event::Tick),
            maybe = events.next() => match maybe {
                Some(Ok(raw)) => Event::from_terminal(raw),
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => Some(Event::Quit),
            },
        };

        if let Some(event) = event {
            app.handle_event(event)?;
        }
        app.poll_pipeline();
    }

    Ok(())
}
