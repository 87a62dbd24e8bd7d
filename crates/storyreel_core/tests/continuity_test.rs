use chrono::Utc;
use storyreel_core::{
    ContinuityContext, GenerationRequest, GenerationSettings, Keyframes, ResultRecord,
    SequenceKey, SourceRef,
};

fn record(scene: u32) -> ResultRecord {
    let request = GenerationRequest::from_settings(
        &GenerationSettings::default(),
        format!("Scene {}: enhanced", scene),
        Keyframes::start(SourceRef::image(format!("https://cdn.example.com/{}.png", scene))),
    );
    ResultRecord {
        sequence_key: SequenceKey::Single(scene),
        original_prompt: format!("scene {}", scene),
        request,
        job_id: format!("job-{}", scene),
        artifact_ref: format!("https://cdn.example.com/{}.mp4", scene),
        continuity_link: None,
        completed_at: Utc::now(),
    }
}

#[test]
fn advance_references_latest_record() {
    let first = ContinuityContext::empty().advance(&record(1));
    let second = first.advance(&record(2));

    let link = second.link().unwrap();
    assert_eq!(link.previous_sequence_key, SequenceKey::Single(2));
    assert_eq!(link.previous_result_ref, "https://cdn.example.com/2.mp4");
    assert_eq!(link.previous_enhanced_payload, "Scene 2: enhanced");
    assert_eq!(link.previous_job_id, "job-2");
}

#[test]
fn advance_leaves_original_untouched() {
    let first = ContinuityContext::empty().advance(&record(1));
    let _second = first.advance(&record(2));
    assert_eq!(first.previous_sequence_key(), Some(SequenceKey::Single(1)));
}

#[test]
fn reset_drops_link() {
    let context = ContinuityContext::empty().advance(&record(4));
    assert!(!context.is_empty());
    let reset = context.reset();
    assert!(reset.is_empty());
    assert_eq!(reset.previous_sequence_key(), None);
}
