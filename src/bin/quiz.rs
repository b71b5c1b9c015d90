// src/bin/quiz.rs

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use quizdesk::client::{
    ClientConfig, DEFAULT_REMOTE_BASE, Participant, QuizSession, Resolver, render,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

/// Terminal client for the quiz server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Remote server tried first.
    #[arg(long, env = "QUIZ_REMOTE_BASE", default_value = DEFAULT_REMOTE_BASE)]
    remote: String,

    /// Origin the client was served from, tried second.
    #[arg(long, env = "QUIZ_ORIGIN")]
    origin: Option<String>,

    /// Extra candidate base, tried before the local defaults. Repeatable.
    #[arg(long = "base")]
    bases: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "QUIZ_PROBE_TIMEOUT_SECS", default_value_t = 5)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Take the quiz interactively.
    Take {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Show stored submissions, newest first.
    Scores {
        #[arg(long, env = "SCORES_KEY", hide_env_values = true)]
        key: String,
        /// Page size; 0 lists everything.
        #[arg(long, default_value_t = 0)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            remote_base: self.remote.clone(),
            origin: self.origin.clone(),
            extra_bases: self.bases.clone(),
            probe_timeout: Duration::from_secs(self.timeout.max(1)),
            ..ClientConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut resolver =
        Resolver::new(&cli.client_config()).context("could not build HTTP client")?;

    match cli.command {
        Command::Take { name, email } => take(&mut resolver, name, email).await,
        Command::Scores { key, limit, offset } => {
            let scores = resolver
                .scores(&key, limit, offset)
                .await
                .context("could not load scores")?;
            print!("{}", render::scores_table(&scores));
            Ok(())
        }
    }
}

async fn take(resolver: &mut Resolver, name: Option<String>, email: Option<String>) -> Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let name = match name {
        Some(name) => name,
        None => prompt(&mut input, "Name (optional): ").await?,
    };
    let email = match email {
        Some(email) => email,
        None => prompt(&mut input, "Email (optional): ").await?,
    };

    let mut session = QuizSession::new();
    session
        .start(Participant { name, email }, resolver)
        .await
        .context("could not load questions")?;

    for position in 0..session.questions().len() {
        loop {
            let q = &session.questions()[position];
            print!("\n{}", render::question(position, q, session.selections()[position]));
            let options = q.options.len();

            let line = prompt(&mut input, "Your answer (number, empty to skip): ").await?;
            if line.is_empty() {
                break;
            }
            match line.parse::<usize>() {
                Ok(n) if n >= 1 && session.select(position, n - 1) => break,
                _ => println!("Please enter a number between 1 and {}.", options),
            }
        }
    }

    println!(
        "\nAnswered {} of {} questions.",
        session.answered(),
        session.questions().len()
    );

    loop {
        match session.submit(resolver).await {
            Ok(record) => {
                print!("\n{}", render::result(record));
                return Ok(());
            }
            Err(e) => {
                eprintln!("Submission failed: {}", e);
                let again = prompt(&mut input, "Try again? [y/N]: ").await?;
                if !again.eq_ignore_ascii_case("y") {
                    bail!("answers were not submitted");
                }
            }
        }
    }
}

async fn prompt(input: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", label);
    std::io::stdout().flush()?;

    match input.next_line().await? {
        Some(line) => Ok(line.trim().to_string()),
        None => bail!("input closed"),
    }
}
