//! Conversation-state core for the parley client.
//!
//! All state mutation goes through a single pure reducer
//! ([`update::update`]): user intents and async results arrive as
//! [`events::ChatEvent`]s, the reducer mutates [`state::AppState`] and
//! returns [`effects::Effect`]s, and the [`runtime::ChatRuntime`] executes
//! those effects by spawning handlers whose results come back through an
//! inbox channel. The session directory is kept fresh by an explicitly
//! cancellable poll task ([`directory::DirectoryPoller`]).

pub mod directory;
pub mod edit;
pub mod effects;
pub mod events;
pub mod handlers;
pub mod runtime;
pub mod staging;
pub mod state;
pub mod update;

pub use runtime::ChatRuntime;
