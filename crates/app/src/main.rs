//! Terminal driver for the quiz engine.

use std::process;

use backend::Backend;
use clap::Parser;
use quiz_core::Session;
use services::{Clock, PayloadSource, QuizConfig, QuizServices, SubmitError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod demo;

use commands::{Command, HELP, render};

const DEFAULT_LOG_FILTER: &str = "app=info,services=info,backend=info";

#[derive(Parser)]
#[command(name = "app", version, about = "Answer a personality quiz in the terminal")]
struct Cli {
    /// Base URL of the quiz backend (overrides QUIZ_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// User id sent with every request (overrides QUIZ_USER_ID)
    #[arg(long)]
    user_id: Option<String>,

    /// Keep answers local until the final submission
    #[arg(long)]
    no_send_responses: bool,

    /// Use the built-in demo questions instead of a backend
    #[arg(long)]
    demo: bool,
}

impl Cli {
    fn apply(&self, config: &mut QuizConfig) {
        if let Some(url) = &self.backend_url {
            config.backend_url = Some(url.clone());
        }
        if let Some(user) = &self.user_id {
            config.user_id.clone_from(user);
        }
        if self.no_send_responses {
            config.send_each_response = false;
        }
    }
}

fn build_services(cli: &Cli, config: &QuizConfig) -> Result<QuizServices, Box<dyn std::error::Error>> {
    let clock = Clock::default();
    if cli.demo || config.backend_url.is_none() {
        info!("using the built-in demo questions");
        let backend = Backend::in_memory(demo::demo_backend()?);
        return Ok(QuizServices::new(config, backend, clock)?);
    }
    Ok(QuizServices::connect(config, clock)?)
}

/// Submit a completed session, reporting the outcome to the user.
async fn submit(services: &QuizServices, session: &mut Session) -> bool {
    match services
        .submissions()
        .submit(session, PayloadSource::Derived)
        .await
    {
        Ok(receipt) => {
            println!("Submitted: {}", receipt.message);
            true
        }
        Err(SubmitError::AlreadySubmitted) => true,
        Err(e) => {
            println!("{e}\nType r to retry.");
            false
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = QuizConfig::from_env();
    cli.apply(&mut config);

    let services = build_services(&cli, &config)?;
    let quiz = services.quiz_loop();
    let mut session = quiz.start_session(services.user_id().clone()).await?;

    if session.is_complete() {
        println!("This quiz has no questions.");
        submit(&services, &mut session).await;
        return Ok(());
    }

    println!("{HELP}");
    println!("{}", render(&session));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        let outcome = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Retry if session.is_complete() => {
                if submit(&services, &mut session).await {
                    break;
                }
                continue;
            }
            Command::Next => quiz.next(&mut session).await.map(|_| ()),
            Command::Previous => quiz.previous(&mut session).await.map(|_| ()),
            Command::Submit => quiz.submit_now(&mut session).await.map(|_| ()),
            other => {
                let Some(question) = session.current_question() else {
                    println!("The quiz is complete. Type r to retry the submission or q to quit.");
                    continue;
                };
                match other.to_input(question) {
                    Ok(Some(input)) => quiz.input(&mut session, input),
                    Ok(None) => {
                        println!("Nothing to retry yet.");
                        continue;
                    }
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                }
            }
        };

        if let Err(e) = outcome {
            println!("{e}");
            continue;
        }

        if session.is_complete() {
            let progress = quiz.progress(&session);
            println!("All done: {} of {} answered.", progress.answered, progress.total);
            if submit(&services, &mut session).await {
                break;
            }
        } else {
            println!("{}", render(&session));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "quiz run failed");
        eprintln!("{err}");
        process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment() {
        let cli = Cli::parse_from(["app", "--user-id", "ada", "--no-send-responses"]);
        let mut config = QuizConfig::from_lookup(|key| match key {
            "QUIZ_USER_ID" => Some("env-user".into()),
            "QUIZ_BACKEND_URL" => Some("http://quiz.test".into()),
            _ => None,
        });
        cli.apply(&mut config);
        assert_eq!(config.user_id, "ada");
        assert!(!config.send_each_response);
        assert_eq!(config.backend_url.as_deref(), Some("http://quiz.test"));
    }
}
