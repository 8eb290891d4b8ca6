// src/cli/chat.rs — Interactive marketing assistant REPL

use crate::generate::{ChatSession, Generator};
use crate::infra::config::Config;
use crate::provider::Role;

/// Run the interactive chat REPL.
pub async fn run_chat(generator: &Generator, config: &Config) -> anyhow::Result<()> {
    eprintln!(
        "copybloom v{} | {} | refine: {}\n",
        env!("CARGO_PKG_VERSION"),
        generator.model(),
        if generator.refine_enabled() { "on" } else { "off" },
    );
    eprintln!("Ask about campaigns, copy, or content ideas. /help for commands.\n");

    let mut session = ChatSession::new(config.chat.history_limit);
    let mut message_count = 0u32;

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.starts_with('/') {
            handle_slash_command(trimmed, &mut session, message_count);
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        match session.send(generator, trimmed).await {
            Ok(reply) => {
                println!("{}\n", reply);
                message_count += 1;
            }
            Err(e) => {
                eprintln!("[error] {}", e);
            }
        }
    }

    eprintln!("\nSession total: {} message(s)", message_count);
    Ok(())
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

fn handle_slash_command(input: &str, session: &mut ChatSession, message_count: u32) {
    match input {
        "/clear" => {
            session.clear();
            eprintln!("  History cleared.");
        }

        "/history" => {
            if session.history().is_empty() {
                eprintln!("  No messages in this session yet.");
            } else {
                for message in session.history() {
                    let who = match message.role {
                        Role::User => "you",
                        Role::Assistant => "assistant",
                    };
                    let truncated = if message.content.len() > 70 {
                        let mut end = 67;
                        while end > 0 && !message.content.is_char_boundary(end) {
                            end -= 1;
                        }
                        format!("{}...", &message.content[..end])
                    } else {
                        message.content.clone()
                    };
                    eprintln!("  [{}] {}", who, truncated);
                }
                eprintln!("  Total this session: {} message(s)", message_count);
            }
        }

        "/help" => {
            eprintln!("Slash commands:");
            eprintln!("  /history           Show conversation history");
            eprintln!("  /clear             Clear conversation history");
            eprintln!("  /help              Show this help");
            eprintln!("  /quit, quit, exit  End session");
        }

        _ => {
            eprintln!("Unknown command: {}. Type /help for commands.", input);
        }
    }
}
