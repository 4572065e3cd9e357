//! Interactive chat mode.
//!
//! A line-oriented loop over the chat runtime: plain text submits a
//! message, slash commands drive session switching, attachments, rename and
//! delete. The session directory poller runs for exactly as long as this
//! loop does.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parley_chat::ChatRuntime;
use parley_chat::events::ChatEvent;
use parley_core::api::ApiClient;
use parley_core::config::Config;
use parley_core::types::Role;
use tokio::io::AsyncBufReadExt;

enum LineOutcome {
    Continue,
    Quit,
}

pub async fn run(config: &Config) -> Result<()> {
    let client = Arc::new(ApiClient::new(&config.backend)?);
    let (mut runtime, mut events) =
        ChatRuntime::new(client, config.attachments.max_attachment_bytes);

    // The poller lives for the duration of this view.
    runtime.start_directory(Duration::from_secs(config.directory.poll_interval_secs.max(1)));
    tracing::info!(backend = %config.backend.base_url, "starting chat mode");

    println!("parley - {}", config.backend.base_url);
    println!("Type a message to chat, /help for commands, /quit to exit.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut printed = 0usize;

    loop {
        tokio::select! {
            maybe_line = lines.next_line() => {
                let Some(line) = maybe_line.context("read stdin")? else {
                    break;
                };
                match handle_line(&mut runtime, line.trim()) {
                    LineOutcome::Quit => break,
                    LineOutcome::Continue => {}
                }
                // The optimistic echo was just typed by the user; no need
                // to print it back.
                printed = runtime.state.conversation.messages.len();
                show_notices(&mut runtime);
            }
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                printed = apply_event(&mut runtime, event, printed);
                show_notices(&mut runtime);
            }
        }
    }

    runtime.stop_directory();
    println!("Goodbye!");
    Ok(())
}

/// Dispatches an inbox event and prints whatever became visible.
fn apply_event(runtime: &mut ChatRuntime, event: ChatEvent, printed: usize) -> usize {
    let switched_to = match &event {
        ChatEvent::HistoryLoaded { session_id, .. } => Some(session_id.clone()),
        _ => None,
    };
    let staged_before = runtime.state.staging.len();

    runtime.dispatch(event);

    let conversation = &runtime.state.conversation;

    // A switch that actually applied replaces the transcript wholesale.
    if let Some(session_id) = switched_to
        && conversation.session_id.as_deref() == Some(session_id.as_str())
    {
        println!("--- switched to session {session_id} ---");
        for message in &conversation.messages {
            print_message(message.role, &message.content);
        }
        return conversation.messages.len();
    }

    let staged_now = runtime.state.staging.len();
    if staged_now > staged_before {
        println!("Staged {} attachment(s).", staged_now - staged_before);
    }

    for message in &conversation.messages[printed.min(conversation.messages.len())..] {
        print_message(message.role, &message.content);
    }
    conversation.messages.len()
}

fn print_message(role: Role, content: &str) {
    match role {
        Role::User => println!("you> {content}"),
        Role::Assistant => println!("assistant> {content}"),
    }
}

fn show_notices(runtime: &mut ChatRuntime) {
    for notice in runtime.state.take_notices() {
        eprintln!("{notice}");
    }
}

fn handle_line(runtime: &mut ChatRuntime, line: &str) -> LineOutcome {
    if !line.starts_with('/') {
        // The reducer rejects empty submissions with nothing staged.
        runtime.dispatch(ChatEvent::Submit {
            text: line.to_string(),
        });
        return LineOutcome::Continue;
    }

    let mut parts = line.splitn(2, ' ');
    let command = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    match command {
        "/help" => print_help(),
        "/quit" | "/exit" => return LineOutcome::Quit,
        "/new" => {
            runtime.dispatch(ChatEvent::NewChat);
            println!("Started a new chat.");
        }
        "/sessions" => print_sessions(runtime),
        "/switch" => match resolve_session(runtime, rest) {
            Some(session_id) => runtime.dispatch(ChatEvent::SwitchSession { session_id }),
            None => println!("Usage: /switch <number|session-id>"),
        },
        "/attach" => {
            if rest.is_empty() {
                println!("Usage: /attach <path> [path...]");
            } else {
                let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
                runtime.dispatch(ChatEvent::AttachFiles { paths });
            }
        }
        "/attachments" => print_attachments(runtime),
        "/detach" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => runtime.dispatch(ChatEvent::RemoveAttachment { index: n - 1 }),
            _ => println!("Usage: /detach <number>"),
        },
        "/rename" => {
            let mut args = rest.splitn(2, ' ');
            let target = args.next().unwrap_or("");
            let title = args.next().unwrap_or("").trim();
            match (resolve_session(runtime, target), title.is_empty()) {
                (Some(session_id), false) => {
                    runtime.dispatch(ChatEvent::BeginRename { session_id });
                    runtime.dispatch(ChatEvent::EditDraft {
                        text: title.to_string(),
                    });
                    runtime.dispatch(ChatEvent::SaveRename);
                }
                _ => println!("Usage: /rename <number|session-id> <title>"),
            }
        }
        "/delete" => match resolve_session(runtime, rest) {
            Some(session_id) => {
                println!(
                    "Really delete session {session_id}? Type /yes to confirm or /no to cancel."
                );
                runtime.dispatch(ChatEvent::RequestDelete { session_id });
            }
            None => println!("Usage: /delete <number|session-id>"),
        },
        "/yes" => {
            if runtime.state.pending_delete.is_some() {
                runtime.dispatch(ChatEvent::ConfirmDelete);
            } else {
                println!("Nothing to confirm.");
            }
        }
        "/no" => {
            if runtime.state.pending_delete.is_some() {
                runtime.dispatch(ChatEvent::DeclineDelete);
                println!("Kept the session.");
            } else {
                println!("Nothing to cancel.");
            }
        }
        _ => println!("Unknown command {command}. Try /help."),
    }

    LineOutcome::Continue
}

/// Resolves a 1-based list number or raw session id against the directory.
fn resolve_session(runtime: &ChatRuntime, arg: &str) -> Option<String> {
    if arg.is_empty() {
        return None;
    }
    if let Ok(n) = arg.parse::<usize>() {
        if n >= 1 {
            return runtime
                .state
                .directory
                .get(n - 1)
                .map(|session| session.session_id.clone());
        }
        return None;
    }
    Some(arg.to_string())
}

fn print_sessions(runtime: &ChatRuntime) {
    let sessions = runtime.state.directory.sessions();
    if sessions.is_empty() {
        println!("No sessions yet.");
        return;
    }
    let current = runtime.state.conversation.session_id.as_deref();
    for (i, session) in sessions.iter().enumerate() {
        let marker = if current == Some(session.session_id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:>2}. {}  {}  {}",
            i + 1,
            session.session_id,
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.display_title(),
        );
    }
}

fn print_attachments(runtime: &ChatRuntime) {
    let staged = runtime.state.staging.staged();
    if staged.is_empty() {
        println!("No attachments staged.");
        return;
    }
    for (i, attachment) in staged.iter().enumerate() {
        println!(
            "{:>2}. {} ({})",
            i + 1,
            attachment.filename,
            attachment.content_type
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /sessions                    list sessions");
    println!("  /switch <number|id>          open a session");
    println!("  /new                         start a fresh chat");
    println!("  /attach <path> [path...]     stage files for the next message");
    println!("  /attachments                 list staged attachments");
    println!("  /detach <number>             remove a staged attachment");
    println!("  /rename <number|id> <title>  rename a session");
    println!("  /delete <number|id>          delete a session (asks to confirm)");
    println!("  /quit                        exit");
}
