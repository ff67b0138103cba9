//! Chatguard - guardrail chatbot over an OpenAI-compatible provider.
//!
//! Long-running terminal chat loop: reads a message per line, runs one
//! guarded chat turn, prints the answer. History persists across turns for
//! the lifetime of the process.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use chatguard::{ChatGuard, GuardConfig, LogViolation, Message, ToolRegistry, ViolationLog};

/// Chatguard - guardrail chatbot
#[derive(Parser, Debug)]
#[command(name = "chatguard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the plain-text guardrails document
    #[arg(long, env = "CHATGUARD_GUARDRAILS", default_value = "guardrails.txt")]
    guardrails: String,

    /// Path to the append-only violation log
    #[arg(long, env = "CHATGUARD_VIOLATIONS", default_value = "violations.txt")]
    violations: String,

    /// Model name (overrides CHATGUARD_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum tool-resolution loop iterations per turn
    #[arg(long, default_value_t = chatguard::guard::DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chatguard=debug")
    } else {
        EnvFilter::new("chatguard=warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = GuardConfig::from_env()?
        .guardrails_path(&args.guardrails)
        .violations_path(&args.violations)
        .max_steps(args.max_steps);
    if let Some(model) = args.model {
        config = config.model(model);
    }

    let guardrails = config.load_guardrails()?;
    let tools = ToolRegistry::new().with(LogViolation::new(ViolationLog::new(
        &config.violations_path,
    )));

    let guard = ChatGuard::new(Arc::new(config.client()), guardrails, tools)
        .with_max_steps(config.max_steps);

    println!("Chatguard ({}) - type 'exit' or Ctrl+C to quit", config.model);
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut history: Vec<Message> = Vec::new();

    loop {
        print!("> ");
        stdout.flush().ok();

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" {
            break;
        }

        match guard.chat(input, &history).await {
            Ok(answer) => {
                println!("{answer}");
                println!();
                history.push(Message::user(input));
                history.push(Message::assistant(&answer));
            }
            Err(e) => {
                eprintln!("error: {e}");
            }
        }
    }

    Ok(())
}
