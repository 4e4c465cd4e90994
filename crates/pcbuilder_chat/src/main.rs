//! PCBuilderAI Chat - Interactive chat CLI
//!
//! Conversation state lives here: each turn sends the full history through the
//! graph and keeps the returned state for the next turn.

use clap::Parser;
use pcbuilder::{Configuration, Graph, Message, MessagesState, ModelConfig};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pcbuilder_chat")]
#[command(about = "Interactive chat CLI for PCBuilderAI")]
struct Args {
    /// Model to use (defaults to PCBUILDER_MODEL, then gpt-4.1-nano)
    #[arg(short, long)]
    model: Option<String>,

    /// Backend LLM URL (defaults to OpenAI, or OPENAI_BASE_URL)
    #[arg(short = 'u', long)]
    backend_url: Option<String>,

    /// Backend API key (optional, uses OPENAI_API_KEY env var if not provided)
    #[arg(short = 'k', long)]
    backend_key: Option<String>,

    /// Temperature for sampling
    #[arg(short, long, default_value = "0.7")]
    temperature: f32,

    /// Experience level: beginner, intermediate or pro
    #[arg(short, long, default_value = "intermediate")]
    experience: String,

    /// Send a single message and exit
    #[arg(short = 'M', long)]
    message: Option<String>,

    /// Verbose mode (log model calls)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let model_config = model_config(&args);
    let model = model_config.model.clone();
    let graph = match Graph::openai(model_config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to create model client: {}", e);
            std::process::exit(1);
        }
    };
    let config = Configuration::new().with_experience(&args.experience);

    // Single message mode
    if let Some(message) = args.message.as_deref() {
        let state = MessagesState::new(vec![Message::user(message)]);
        match graph.invoke(&state, &config).await {
            Ok(state) => println!("{}", state.last_reply().unwrap_or_default()),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      PCBuilderAI Chat                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Model:      {}", model);
    println!("Experience: {}", config.experience());
    println!();
    println!("Type your message and press Enter. Use Ctrl+C or Ctrl+D to exit.");
    println!();

    let mut state = MessagesState::default();

    let mut rl = match DefaultEditor::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to initialize readline: {}", e);
            std::process::exit(1);
        }
    };

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(input);

                // Only adopt the new state once the turn succeeds
                let mut turn = state.clone();
                turn.messages.push(Message::user(input));

                match graph.invoke(&turn, &config).await {
                    Ok(next) => {
                        println!("PCBuilderAI: {}", next.last_reply().unwrap_or_default());
                        println!();
                        state = next;
                    }
                    Err(e) => {
                        eprintln!("\nError: {}", e);
                        println!();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("\nInterrupted. Goodbye!");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }
}

fn model_config(args: &Args) -> ModelConfig {
    let mut config = ModelConfig::from_env().with_temperature(args.temperature);
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(url) = &args.backend_url {
        config = config.with_base_url(url);
    }
    if let Some(key) = &args.backend_key {
        config = config.with_api_key(key);
    }
    config
}
