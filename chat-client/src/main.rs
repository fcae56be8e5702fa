//! tutor_chat - interactive terminal client for the AI tutor.

use anyhow::Context;
use chat_client::{ChatController, ChatTurn, HttpTransport, SessionState, GRADES, SUBJECTS};
use shared::Sender;
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:5000";

const HELP: &str = "\
Commands:
  /subject <name>  switch subject
  /grade <name>    switch grade level
  /subjects        list subjects
  /grades          list grade levels
  /clear           clear the conversation
  /help            show this help
  /quit            exit
Anything else is sent to the tutor.";

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn print_turn(turn: &ChatTurn) {
    let author = match turn.sender {
        Sender::User => "You",
        Sender::Ai => "AI Tutor",
    };
    println!("\n{} • {}", author, turn.time_label());
    println!("{}", turn.text);
}

fn print_list(title: &str, options: &[&str], current: &str) {
    println!("{}:", title);
    for option in options {
        let marker = if *option == current { "*" } else { " " };
        println!(" {} {}", marker, option);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let api_url = env_or("TUTOR_API_URL", DEFAULT_API_URL);
    let transport = HttpTransport::new(&api_url).context("Invalid TUTOR_API_URL")?;
    let state = SessionState::with_selection(
        &env_or("TUTOR_SUBJECT", SUBJECTS[0]),
        &env_or("TUTOR_GRADE", GRADES[0]),
    )
    .context("Invalid TUTOR_SUBJECT or TUTOR_GRADE")?;
    let controller = ChatController::with_state(transport, state);

    debug!(api_url = %api_url, "Starting chat client");
    println!("AI Tutor ({})", api_url);
    println!(
        "Subject: {} | Grade: {}",
        controller.snapshot().subject(),
        controller.snapshot().grade()
    );
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", HELP),
            "/clear" => {
                controller.clear_chat();
                println!("Conversation cleared.");
            }
            "/subjects" => print_list("Subjects", &SUBJECTS, controller.snapshot().subject()),
            "/grades" => print_list("Grades", &GRADES, controller.snapshot().grade()),
            "/subject" => match controller.change_subject(arg) {
                Ok(()) => println!("Subject: {}", controller.snapshot().subject()),
                Err(e) => println!("{} (try /subjects)", e),
            },
            "/grade" => match controller.change_grade(arg) {
                Ok(()) => println!("Grade: {}", controller.snapshot().grade()),
                Err(e) => println!("{} (try /grades)", e),
            },
            _ => {
                let before = controller.turns().len();
                controller.set_draft(line);
                println!("Thinking...");
                controller.send_message(line).await;
                for turn in controller.turns().iter().skip(before) {
                    print_turn(turn);
                }
                println!();
            }
        }
    }

    Ok(())
}
