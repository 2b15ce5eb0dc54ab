//! A simple program demonstrates how to use `quill` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use quill::SessionBuilder;
use quill_groq_model::{GroqConfigBuilder, GroqProvider};
use quill_research::{TavilyConfigBuilder, TavilyProvider};
use tokio::io::{self, AsyncBufReadExt};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("GROQ_API_KEY") else {
        eprintln!("GROQ_API_KEY environment variable is not set");
        return;
    };

    let mut config = GroqConfigBuilder::with_api_key(api_key);
    if let Ok(model) = env::var("MODEL_NAME") {
        config = config.with_model(model);
    }
    if let Ok(temperature) = env::var("TEMPERATURE") {
        let Ok(temperature) = temperature.parse() else {
            eprintln!("TEMPERATURE is not a valid number");
            return;
        };
        config = config.with_temperature(temperature);
    }
    if let Ok(max_tokens) = env::var("MAX_OUTPUT_TOKENS") {
        let Ok(max_tokens) = max_tokens.parse() else {
            eprintln!("MAX_OUTPUT_TOKENS is not a valid number");
            return;
        };
        config = config.with_max_tokens(max_tokens);
    }
    let model_provider = GroqProvider::new(config.build());

    let mut builder = SessionBuilder::with_model_provider(model_provider);
    match env::var("TAVILY_API_KEY") {
        Ok(api_key) => {
            let research_config =
                TavilyConfigBuilder::with_api_key(api_key).build();
            builder = builder
                .with_research_provider(TavilyProvider::new(research_config));
        }
        Err(_) => {
            warn!("TAVILY_API_KEY is not set, research lookups are disabled");
        }
    }
    let mut session = builder.build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim().to_owned();
        if line.is_empty() {
            continue;
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let reply_or_err = session.send_message(&line).await;
        progress_bar.finish_and_clear();

        match reply_or_err {
            Ok(reply) => {
                println!(
                    "{}🪶 {}",
                    BAR_CHAR.bright_cyan(),
                    reply.bright_white()
                );
            }
            Err(err) => {
                error!("turn failed: {err}");
                println!(
                    "{}⚠️  The model request failed, please try again.",
                    BAR_CHAR.bright_yellow()
                );
                continue;
            }
        }

        // The pipeline has already said goodbye at this point.
        if line == "QUIT" {
            break;
        }
        println!();
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
