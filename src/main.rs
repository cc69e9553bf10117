use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use quizmaster_client::api::{HttpQuizApi, QuizApi};
use quizmaster_client::catalog::quiz_table;
use quizmaster_client::config::{ClientConfig, load_config_from};
use quizmaster_client::history::history_table;
use quizmaster_client::models::{AttemptId, Credentials, QuizId, Registration};
use quizmaster_client::statistics::{leaderboard_table, subject_table, summary_table};
use quizmaster_client::telemetry::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "quizmaster", version, about = "Terminal client for timed quizzes")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiz service URL, overrides the config file and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Session token, overrides the config file and environment
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the quizzes you can take
    Quizzes,

    /// Take a timed quiz
    Take {
        #[arg(long)]
        quiz: i64,
    },

    /// Review a finished attempt
    Review {
        #[arg(long)]
        attempt: i64,
    },

    /// List your past attempts
    History,

    /// Show your scores, accuracy and the leaderboard
    Stats,

    /// Log in and print a session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        qualification: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config_from(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }

    let _guard = init_tracing(&config);
    info!(?config, "starting");

    let api = connect(&config)?;

    match cli.command {
        Commands::Quizzes => {
            let quizzes = api.list_quizzes().await.context("failed to load quizzes")?;
            if quizzes.is_empty() {
                println!("No quizzes available.");
            } else {
                println!("{}", quiz_table(&quizzes));
            }
            Ok(())
        }
        Commands::Take { quiz } => quizmaster_client::take_quiz(api, QuizId::new(quiz))
            .await
            .context("quiz session failed"),
        Commands::Review { attempt } => {
            quizmaster_client::review_attempt(api, AttemptId::new(attempt))
                .await
                .context("review failed")
        }
        Commands::History => {
            let attempts = api
                .list_attempts()
                .await
                .context("failed to load attempt history")?;
            if attempts.is_empty() {
                println!("No attempts yet.");
            } else {
                println!("{}", history_table(&attempts));
            }
            Ok(())
        }
        Commands::Stats => {
            let statistics = api
                .user_statistics()
                .await
                .context("failed to load statistics")?;
            if let Some(name) = &statistics.user_name {
                println!("Statistics for {name}");
            }
            println!("{}", summary_table(&statistics));
            if let Some(subjects) = subject_table(&statistics) {
                println!("{subjects}");
            }
            if !statistics.stats.leaderboard.is_empty() {
                println!("{}", leaderboard_table(&statistics));
            }
            Ok(())
        }
        Commands::Login { email, password } => {
            let login = api
                .login(&Credentials { email, password })
                .await
                .map_err(|e| anyhow!("login failed: {}", e.message()))?;
            println!("Logged in as {} ({})", login.email, login.role);
            println!("export QUIZMASTER_TOKEN={}", login.token);
            Ok(())
        }
        Commands::Register {
            email,
            password,
            full_name,
            qualification,
            date_of_birth,
        } => {
            let registration = Registration {
                email,
                password,
                full_name,
                qualification,
                date_of_birth,
            };
            if let Err(reason) = registration.validate() {
                anyhow::bail!("{reason}");
            }
            api.register(&registration)
                .await
                .map_err(|e| anyhow!("registration failed: {}", e.message()))?;
            println!("Account created. Log in with `quizmaster login`.");
            Ok(())
        }
    }
}

fn connect(config: &ClientConfig) -> Result<Arc<dyn QuizApi>> {
    let api = HttpQuizApi::new(config.session()).context("failed to build HTTP client")?;
    Ok(Arc::new(api))
}
