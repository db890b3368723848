//! Typed GitHub webhook payloads
//!
//! Raw payloads go through [`NormalizedEvent::new`] first, which fills in the
//! derived fields, then [`GithubEvent::from_normalized`] decodes the record
//! matching the `X-GitHub-Event` header.

pub mod common;
pub mod error;
pub mod events;
pub mod normalize;

pub use common::*;
pub use error::{PayloadError, Result};
pub use events::*;
pub use normalize::{NormalizedEvent, is_valid_event_type, ref_name};
