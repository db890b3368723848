//! # github-notify
//!
//! Turns GitHub webhook deliveries into chat notifications.
//!
//! ```text
//! (event type, JSON) -> NormalizedEvent -> policy::decide -> GithubEvent -> Renderer
//! ```
//!
//! Two renderers share the policy table and the text helpers:
//!
//! - [`IrcRenderer`]: one mIRC colour-coded line (one per page for wiki edits)
//! - [`DiscordRenderer`]: a webhook body with embeds
//!
//! Anything that is not a notification comes back as a [`ConvertError`]:
//! ignored by design, not implemented, or a malformed payload.

pub mod discord;
pub mod error;
pub mod irc;
pub mod policy;
pub mod push;
pub mod render;
pub mod severity;
pub mod text;

pub use discord::{DiscordMessage, DiscordRenderer, Embed, EmbedAuthor, EmbedField, EmbedFooter};
pub use error::ConvertError;
pub use irc::IrcRenderer;
pub use policy::{ActionDecision, decide};
pub use render::{PreparedEvent, Renderer, convert};
pub use severity::Severity;
