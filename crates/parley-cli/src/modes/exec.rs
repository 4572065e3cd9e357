//! One-shot execution: send a single prompt and print the reply.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use parley_chat::ChatRuntime;
use parley_chat::events::ChatEvent;
use parley_core::api::ApiClient;
use parley_core::config::Config;
use parley_core::types::Role;

pub async fn run(
    config: &Config,
    prompt: &str,
    session: Option<&str>,
    attach: &[String],
) -> Result<()> {
    let client = Arc::new(ApiClient::new(&config.backend)?);
    let (mut runtime, mut events) =
        ChatRuntime::new(client, config.attachments.max_attachment_bytes);

    if let Some(id) = session {
        runtime.state.conversation.session_id = Some(id.to_string());
    }

    if !attach.is_empty() {
        let paths: Vec<PathBuf> = attach.iter().map(PathBuf::from).collect();
        let expected = paths.len();
        runtime.dispatch(ChatEvent::AttachFiles { paths });

        let event = events.recv().await.context("attachment encoding stalled")?;
        runtime.dispatch(event);
        if runtime.state.staging.len() != expected {
            let notices = runtime.state.take_notices().join("; ");
            bail!("could not stage attachments: {notices}");
        }
    }

    runtime.dispatch(ChatEvent::Submit {
        text: prompt.to_string(),
    });
    if !runtime.state.conversation.busy {
        bail!("nothing to send (empty prompt and no attachments)");
    }

    while runtime.state.conversation.busy {
        let Some(event) = events.recv().await else {
            break;
        };
        runtime.dispatch(event);
    }

    for notice in runtime.state.take_notices() {
        eprintln!("{notice}");
    }

    let reply = runtime
        .state
        .conversation
        .messages
        .iter()
        .rev()
        .find(|message| message.role == Role::Assistant)
        .context("no reply received")?;
    println!("{}", reply.content);

    if let Some(id) = &runtime.state.conversation.session_id {
        eprintln!("Session: {id}");
    }

    Ok(())
}
