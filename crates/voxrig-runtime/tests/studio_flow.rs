use std::sync::Arc;
use std::time::Duration;

use voxrig_edit::EditTool;
use voxrig_io::{ModelLibrary, StudioConfig};
use voxrig_model::{AnimationType, BodyPart, GenerationStatus, Model, ModelCategory, Voxel};
use voxrig_runtime::{
    ConceptImage, ConceptRequest, FrameOutput, GenerationError, GenerationOutcome,
    GenerationRequest, GenerationService, GenerationWorker, Studio, assemble_model,
};

const ROBOT: &str = r##"```json
{
  "name": "Robot",
  "suggestedAnimation": "walk",
  "elements": [
    {"type": "box", "x": 0, "y": 4, "z": 0, "width": 2, "height": 2, "depth": 2, "color": "#ff0000", "part": "head"},
    {"type": "box", "x": 0, "y": 0, "z": 0, "width": 2, "height": 4, "depth": 1, "color": "#00ff00", "part": "torso"},
    {"type": "voxel", "x": 2, "y": 3, "z": 0, "color": "#0000ff", "part": "right_arm"}
  ]
}
```"##;

struct Canned {
    text: &'static str,
    concept: Option<ConceptImage>,
}

impl GenerationService for Canned {
    fn generate_model(&self, _req: &GenerationRequest) -> Result<String, GenerationError> {
        Ok(self.text.to_string())
    }

    fn generate_concept(&self, _req: &ConceptRequest) -> Result<ConceptImage, GenerationError> {
        self.concept.clone().ok_or(GenerationError::MissingImage)
    }
}

fn worker(text: &'static str) -> GenerationWorker {
    GenerationWorker::spawn(Arc::new(Canned {
        text,
        concept: Some(ConceptImage {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        }),
    }))
}

fn studio() -> Studio {
    Studio::new(&StudioConfig::default())
}

/// Wait for the worker to finish and hand every result to the studio.
fn settle(studio: &mut Studio, worker: &GenerationWorker) -> usize {
    let mut applied = 0;
    if let Some((id, out)) = worker.wait(Duration::from_secs(10)) {
        applied += studio.deliver(id, out) as usize;
    }
    applied + studio.pump(worker)
}

fn robot_model(category: ModelCategory) -> Model {
    let req = GenerationRequest {
        prompt: "robot".to_string(),
        category,
        image: None,
        options: Default::default(),
    };
    let resp = voxrig_decode::parse_response(ROBOT).unwrap();
    assemble_model(resp, &req, 1)
}

#[test]
fn generation_installs_model_with_suggested_animation() {
    let w = worker(ROBOT);
    let mut s = studio();
    s.set_prompt("a robot");
    s.set_category(ModelCategory::Character);
    let id = s.request_model(&w);
    assert_eq!(s.status(), GenerationStatus::Generating);
    assert_eq!(s.pending_request(), Some(id));

    assert_eq!(settle(&mut s, &w), 1);
    assert_eq!(s.status(), GenerationStatus::Success);
    let m = s.model().unwrap();
    assert_eq!(m.name, "Robot");
    assert_eq!(m.voxel_count(), 8 + 8 + 1);
    assert_eq!(m.animation, AnimationType::Walk);
    assert_eq!(m.category, ModelCategory::Character);
    assert!(s.pending_request().is_none());
}

#[test]
fn stale_result_after_reset_is_dropped() {
    let mut s = studio();
    let id = {
        let w = worker(ROBOT);
        let id = s.request_model(&w);
        s.reset();
        // The worker still finishes the job; its result has nowhere to land.
        if let Some((rid, out)) = w.wait(Duration::from_secs(10)) {
            assert_eq!(rid, id);
            assert!(!s.deliver(rid, out));
        }
        id
    };
    assert!(s.model().is_none());
    assert!(s.pending_request().is_none());
    assert_eq!(s.status(), GenerationStatus::Idle);
    assert!(!s.deliver(id, GenerationOutcome::Model(Ok(robot_model(ModelCategory::Character)))));
    assert!(s.model().is_none());
}

#[test]
fn newer_request_supersedes_older() {
    let w = worker(ROBOT);
    let mut s = studio();
    let first = s.request_model(&w);
    let second = s.request_model(&w);
    assert!(second > first);
    assert!(!s.deliver(first, GenerationOutcome::Model(Ok(robot_model(ModelCategory::Object)))));
    assert!(s.model().is_none());
    assert!(s.deliver(second, GenerationOutcome::Model(Ok(robot_model(ModelCategory::Animal)))));
    assert_eq!(s.model().unwrap().category, ModelCategory::Animal);
    // Whatever the worker produced for both ids is now stale.
    while let Some((id, out)) = w.wait(Duration::from_millis(500)) {
        assert!(!s.deliver(id, out));
    }
}

#[test]
fn parse_failure_keeps_prior_model() {
    let mut s = studio();
    s.load(robot_model(ModelCategory::Character));
    let w = worker("{\"name\": \"Truncated\", \"elements\": [");
    s.request_model(&w);
    settle(&mut s, &w);
    assert_eq!(s.status(), GenerationStatus::Error);
    assert_eq!(
        s.error(),
        Some("Model is too complex. Please try 'Simple' detail or a shorter prompt.")
    );
    assert_eq!(s.model().unwrap().name, "Robot");
}

#[test]
fn concept_flow() {
    let w = worker(ROBOT);
    let mut s = studio();
    assert!(s.request_concept(&w).is_none());
    s.set_prompt("a knight");
    s.request_concept(&w).unwrap();
    assert_eq!(s.status(), GenerationStatus::Thinking);
    settle(&mut s, &w);
    assert_eq!(s.status(), GenerationStatus::Idle);
    assert_eq!(s.concept_image().unwrap().mime_type, "image/png");

    let failing = GenerationWorker::spawn(Arc::new(Canned { text: ROBOT, concept: None }));
    s.request_concept(&failing).unwrap();
    settle(&mut s, &failing);
    assert_eq!(s.status(), GenerationStatus::Error);
    assert_eq!(s.error(), Some("Concept generation failed."));
    assert!(s.concept_image().is_some());
}

#[test]
fn animation_and_mode_interlocks() {
    let mut s = studio();
    assert!(!s.set_animation(AnimationType::Walk));
    s.load(robot_model(ModelCategory::Character));

    s.set_edit_mode(true);
    assert_eq!(s.model().unwrap().animation, AnimationType::None);
    assert!(s.set_animation(AnimationType::Run));
    assert!(!s.is_edit_mode());

    s.set_ragdoll(true);
    assert!(s.is_ragdoll());
    assert_eq!(s.model().unwrap().animation, AnimationType::None);
    assert!(s.set_animation(AnimationType::Jump));
    assert!(!s.is_ragdoll());

    // Objects do not walk.
    assert!(!s.set_animation(AnimationType::Spin));
    s.load(robot_model(ModelCategory::Object));
    assert!(!s.set_animation(AnimationType::Walk));
    assert!(s.set_animation(AnimationType::Spin));
}

#[test]
fn load_adopts_category_and_keeps_stored_animation() {
    let mut s = studio();
    let mut m = robot_model(ModelCategory::Animal);
    m.animation = AnimationType::Idle;
    s.set_ragdoll(true);
    s.load(m);
    assert_eq!(s.category(), ModelCategory::Animal);
    assert_eq!(s.status(), GenerationStatus::Success);
    assert!(!s.is_ragdoll());
    assert_eq!(s.model().unwrap().animation, AnimationType::Idle);
}

#[test]
fn edits_rebuild_the_rig() {
    let mut s = studio();
    s.load(robot_model(ModelCategory::Character));
    assert_eq!(s.rig().unwrap().voxel_count(), 17);

    // Outside edit mode clicks do nothing.
    assert!(s.click_voxel(0).is_none());

    s.set_edit_mode(true);
    s.set_brush("#123456");
    let rec = s.click_voxel(0).unwrap();
    assert_eq!(rec.index, 0);
    assert_eq!(s.model().unwrap().voxels.get(0).unwrap().color, "#123456");

    s.set_tool(EditTool::Erase);
    let last = s.model().unwrap().voxel_count() - 1;
    s.click_voxel(last).unwrap();
    let rig = s.rig().unwrap();
    assert_eq!(rig.voxel_count(), 16);
    assert!(!rig.has_part(BodyPart::RightArm));
}

#[test]
fn frame_outputs_follow_mode() {
    let mut s = studio();
    assert_eq!(s.frame(0.0), FrameOutput::Empty);

    s.load(robot_model(ModelCategory::Character));
    s.set_stiffness(1.0);
    match s.frame(0.5) {
        FrameOutput::Posed(frame) => assert!(frame.part(BodyPart::Head).is_some()),
        other => panic!("expected pose, got {other:?}"),
    }

    s.set_ragdoll(true);
    match s.frame(0.5) {
        FrameOutput::Ragdoll(bodies, params) => {
            assert_eq!(bodies.len(), 17);
            assert!((params.linear_damping - 0.6).abs() < 1e-6);
            assert_eq!(params.gravity_scale, 2.0);
        }
        other => panic!("expected ragdoll, got {other:?}"),
    }
}

#[test]
fn edit_mode_freezes_pose() {
    let mut m = robot_model(ModelCategory::Character);
    m.voxels = vec![
        Voxel::new(0, 0, 0, "#fff", BodyPart::LeftLeg),
        Voxel::new(1, 0, 0, "#fff", BodyPart::RightLeg),
    ]
    .into();
    m.animation = AnimationType::Walk;

    let mut s = studio();
    // Edit mode first: loading keeps the stored walk selection.
    s.set_edit_mode(true);
    s.load(m.clone());
    assert!(s.is_edit_mode());
    assert_eq!(s.model().unwrap().animation, AnimationType::Walk);
    let FrameOutput::Posed(frozen) = s.frame(0.3) else {
        panic!("expected pose");
    };
    assert!(frozen.part(BodyPart::LeftLeg).unwrap().rotation.is_identity());
    assert_eq!(frozen.root.position, s.rig().unwrap().center_offset());

    // Same model and time outside edit mode actually walks.
    let mut free = studio();
    free.load(m);
    let FrameOutput::Posed(moving) = free.frame(0.3) else {
        panic!("expected pose");
    };
    assert!(!moving.part(BodyPart::LeftLeg).unwrap().rotation.is_identity());
}

#[test]
fn save_writes_current_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut lib = ModelLibrary::open(dir.path().join("lib.json"));
    let mut s = studio();
    assert!(!s.save(&mut lib).unwrap());
    s.load(robot_model(ModelCategory::Character));
    assert!(s.save(&mut lib).unwrap());
    assert_eq!(lib.len(), 1);
    assert_eq!(lib.list()[0].name, "Robot");
}

#[test]
fn stiffness_is_clamped() {
    let mut s = studio();
    s.set_stiffness(2.5);
    assert_eq!(s.stiffness(), 1.0);
    s.set_stiffness(-1.0);
    assert_eq!(s.stiffness(), 0.0);
}

#[test]
fn ragdoll_bodies_are_reused_until_buffer_or_stiffness_changes() {
    let mut s = studio();
    s.load(robot_model(ModelCategory::Character));
    s.set_stiffness(1.0);
    s.set_ragdoll(true);

    let bodies_at = |s: &mut Studio, t: f64| match s.frame(t) {
        FrameOutput::Ragdoll(bodies, params) => (bodies, params),
        other => panic!("expected ragdoll, got {other:?}"),
    };

    let (first, _) = bodies_at(&mut s, 0.1);
    let (second, _) = bodies_at(&mut s, 0.2);
    assert!(Arc::ptr_eq(&first, &second));

    s.set_stiffness(0.0);
    let (softer, params) = bodies_at(&mut s, 0.3);
    assert!(!Arc::ptr_eq(&first, &softer));
    assert!((params.linear_damping - 0.1).abs() < 1e-6);
    assert!((softer[0].linear_damping - 0.1).abs() < 1e-6);

    s.set_edit_mode(true);
    s.set_tool(EditTool::Erase);
    s.click_voxel(0).unwrap();
    let (erased, _) = bodies_at(&mut s, 0.4);
    assert_eq!(erased.len(), first.len() - 1);
}
