//! Rendering pipeline: normalize, decide, decode, render.

use github_types::{GithubEvent, NormalizedEvent};
use serde_json::Value;

use crate::error::ConvertError;
use crate::policy::decide;

/// Turns an accepted event into target-specific output.
///
/// `action` is the effective action chosen by the policy table (`None` for
/// events without one). Implementations assume the policy already accepted
/// the event; go through [`convert`] or [`PreparedEvent`] rather than calling
/// `render` on raw input.
pub trait Renderer {
    type Output;

    fn render(&self, event: &GithubEvent, action: Option<&str>)
    -> Result<Self::Output, ConvertError>;
}

/// An event the policy table accepted, decoded and ready for any renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedEvent {
    pub event: GithubEvent,
    pub action: Option<String>,
}

impl PreparedEvent {
    pub fn new(normalized: NormalizedEvent) -> Result<Self, ConvertError> {
        let action = decide(&normalized)?.into_result()?;
        let event = GithubEvent::from_normalized(normalized)?;
        Ok(Self { event, action })
    }

    pub fn render<R: Renderer>(&self, renderer: &R) -> Result<R::Output, ConvertError> {
        renderer.render(&self.event, self.action.as_deref())
    }
}

/// Full conversion of one webhook delivery.
pub fn convert<R: Renderer>(
    renderer: &R,
    event_type: &str,
    payload: Value,
) -> Result<R::Output, ConvertError> {
    let normalized = NormalizedEvent::new(event_type, payload)?;
    PreparedEvent::new(normalized)?.render(renderer)
}

pub(crate) fn require_action<'a>(
    event: &GithubEvent,
    action: Option<&'a str>,
) -> Result<&'a str, ConvertError> {
    action.ok_or_else(|| ConvertError::missing_field(event.event_type(), "action"))
}
