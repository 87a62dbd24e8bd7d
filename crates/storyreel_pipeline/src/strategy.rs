//! Payload construction strategies.

use storyreel_core::{ContinuityContext, GenerationRequest, GenerationSettings, WorkItem};
use storyreel_interface::PayloadStrategy;

const CINEMATIC_STYLE: &str =
    "Cinematic shot, smooth natural motion, consistent character appearance, film lighting.";

/// Default scene strategy: numbered scene prompt, style line, and a
/// continuity note when the previous scene succeeded.
///
/// A blank description stays blank so validation rejects the item.
///
/// # Examples
///
/// ```
/// use storyreel_core::{ContinuityContext, GenerationSettings, WorkItem};
/// use storyreel_interface::PayloadStrategy;
/// use storyreel_pipeline::CinematicPayload;
///
/// let item = WorkItem::scene(1, "A fox wakes in the snow", "https://x/1.png");
/// let request = CinematicPayload.build(&item, &ContinuityContext::empty(), &GenerationSettings::default());
/// assert!(request.prompt.starts_with("Scene 1: A fox wakes in the snow"));
/// assert!(!request.prompt.contains("continuity"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CinematicPayload;

impl PayloadStrategy for CinematicPayload {
    fn build(
        &self,
        item: &WorkItem,
        context: &ContinuityContext,
        settings: &GenerationSettings,
    ) -> GenerationRequest {
        let description = item.prompt.trim();
        let prompt = if description.is_empty() {
            String::new()
        } else {
            let mut prompt = format!(
                "{}: {}\n{}",
                item.sequence_key.label(),
                description,
                CINEMATIC_STYLE
            );
            if let Some(link) = context.link() {
                prompt.push_str(&format!(
                    "\nMaintain visual continuity with {}: same characters, setting and color palette as the previous shot.",
                    link.previous_sequence_key.label()
                ));
            }
            prompt
        };

        GenerationRequest::from_settings(settings, prompt, item.keyframes.clone())
    }
}

/// Uses the item prompt verbatim and ignores continuity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPayload;

impl PayloadStrategy for PassthroughPayload {
    fn build(
        &self,
        item: &WorkItem,
        _context: &ContinuityContext,
        settings: &GenerationSettings,
    ) -> GenerationRequest {
        GenerationRequest::from_settings(settings, item.prompt.clone(), item.keyframes.clone())
    }
}
