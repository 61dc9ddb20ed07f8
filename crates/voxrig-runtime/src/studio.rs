use std::sync::Arc;

use voxrig_edit::{EditRecord, EditTool, Editor};
use voxrig_io::{LibraryError, ModelLibrary, StudioConfig};
use voxrig_model::{AnimationType, GenerationStatus, Model, ModelCategory};
use voxrig_physics::{RagdollBodyDesc, RagdollParams, RagdollSettings, build_bodies};
use voxrig_pose::{PoseFrame, PoseInput, evaluate};
use voxrig_rig::Rig;

use crate::service::{
    ConceptImage, ConceptRequest, DEFAULT_PROMPT, GenerationError, GenerationOptions,
    GenerationRequest,
};
use crate::worker::{GenerationJob, GenerationOutcome, GenerationWorker};

/// What the renderer should draw this frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutput {
    Empty,
    Posed(PoseFrame),
    /// Bodies are shared with the studio's cache; they change only when the
    /// buffer or the stiffness does.
    Ragdoll(Arc<Vec<RagdollBodyDesc>>, RagdollParams),
}

/// Cached rig, keyed by which model it was built for and the buffer revision.
struct RigCache {
    epoch: u64,
    rev: u64,
    rig: Rig,
}

/// Ragdoll descriptors, keyed like [`RigCache`] plus the stiffness they were
/// derived from.
struct RagdollCache {
    epoch: u64,
    rev: u64,
    stiffness: f32,
    params: RagdollParams,
    bodies: Arc<Vec<RagdollBodyDesc>>,
}

/// One user session: the current model, the mode flags, and the single
/// outstanding generation request.
pub struct Studio {
    prompt: String,
    category: ModelCategory,
    options: GenerationOptions,
    status: GenerationStatus,
    error: Option<String>,
    model: Option<Model>,
    /// Bumped whenever `model` is replaced wholesale.
    epoch: u64,
    concept: Option<ConceptImage>,
    editor: Editor,
    ragdoll: bool,
    stiffness: f32,
    settings: RagdollSettings,
    next_request: u64,
    pending: Option<u64>,
    rig: Option<RigCache>,
    bodies: Option<RagdollCache>,
}

impl Studio {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            prompt: String::new(),
            category: ModelCategory::default(),
            options: GenerationOptions {
                style: config.style.clone(),
                complexity: config.complexity.clone(),
            },
            status: GenerationStatus::Idle,
            error: None,
            model: None,
            epoch: 0,
            concept: None,
            editor: Editor::new(config.brush_color.clone()),
            ragdoll: false,
            stiffness: config.default_stiffness.clamp(0.0, 1.0),
            settings: RagdollSettings {
                base_gravity: config.base_gravity,
                voxel_size: config.voxel_size,
                voxel_mass: config.voxel_mass,
            },
            next_request: 0,
            pending: None,
            rig: None,
            bodies: None,
        }
    }

    // --- Accessors ---

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn concept_image(&self) -> Option<&ConceptImage> {
        self.concept.as_ref()
    }

    pub fn category(&self) -> ModelCategory {
        self.category
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn pending_request(&self) -> Option<u64> {
        self.pending
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editor.is_active()
    }

    pub fn is_ragdoll(&self) -> bool {
        self.ragdoll
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    // --- Inputs ---

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Category for the next generation. The current model keeps its own.
    pub fn set_category(&mut self, category: ModelCategory) {
        self.category = category;
    }

    pub fn set_options(&mut self, options: GenerationOptions) {
        self.options = options;
    }

    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.stiffness = stiffness.clamp(0.0, 1.0);
    }

    pub fn set_tool(&mut self, tool: EditTool) {
        self.editor.set_tool(tool);
    }

    pub fn set_brush(&mut self, color: impl Into<String>) {
        self.editor.set_brush(color);
    }

    pub fn set_concept_image(&mut self, image: Option<ConceptImage>) {
        self.concept = image;
    }

    /// Select an animation for the current model. Any animation other than
    /// `none` leaves edit and ragdoll modes. Returns false when there is no
    /// model or the animation is not offered for its category.
    pub fn set_animation(&mut self, animation: AnimationType) -> bool {
        let Some(model) = self.model.as_mut() else {
            return false;
        };
        if animation != AnimationType::None
            && !AnimationType::available_for(model.category).contains(&animation)
        {
            log::debug!(
                target: "studio",
                "animation {} not offered for {}",
                animation,
                model.category
            );
            return false;
        }
        model.animation = animation;
        if animation != AnimationType::None {
            self.editor.set_active(false);
            self.ragdoll = false;
        }
        true
    }

    /// Entering edit mode stops any animation.
    pub fn set_edit_mode(&mut self, on: bool) {
        self.editor.set_active(on);
        if on {
            self.set_animation(AnimationType::None);
        }
    }

    /// Entering ragdoll mode stops any animation and leaves edit mode.
    pub fn set_ragdoll(&mut self, on: bool) {
        if on {
            self.set_animation(AnimationType::None);
            self.editor.set_active(false);
        }
        if self.ragdoll != on {
            log::info!(
                target: "studio",
                "ragdoll {} stiffness={:.2}",
                if on { "on" } else { "off" },
                self.stiffness
            );
        }
        self.ragdoll = on;
    }

    // --- Generation ---

    fn allocate_request(&mut self) -> u64 {
        self.next_request += 1;
        self.pending = Some(self.next_request);
        self.next_request
    }

    /// Queue a concept-image request. Blank prompts are ignored.
    pub fn request_concept(&mut self, worker: &GenerationWorker) -> Option<u64> {
        if self.prompt.trim().is_empty() {
            return None;
        }
        let id = self.allocate_request();
        self.status = GenerationStatus::Thinking;
        self.error = None;
        let job = GenerationJob::Concept(ConceptRequest {
            prompt: self.prompt.clone(),
            category: self.category,
            options: self.options.clone(),
        });
        log::info!(target: "studio", "[req {}] ConceptRequested category={}", id, self.category);
        worker.submit(id, job);
        Some(id)
    }

    /// Queue a model request. Supersedes any outstanding request.
    pub fn request_model(&mut self, worker: &GenerationWorker) -> u64 {
        let id = self.allocate_request();
        self.status = GenerationStatus::Generating;
        self.error = None;
        self.editor.set_active(false);
        self.ragdoll = false;
        let prompt = if self.prompt.trim().is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            self.prompt.clone()
        };
        let job = GenerationJob::Model(GenerationRequest {
            prompt,
            category: self.category,
            image: self.concept.clone(),
            options: self.options.clone(),
        });
        log::info!(
            target: "studio",
            "[req {}] ModelRequested category={} image={}",
            id,
            self.category,
            self.concept.is_some()
        );
        worker.submit(id, job);
        id
    }

    /// Apply every finished result that is still wanted. Returns how many
    /// were applied.
    pub fn pump(&mut self, worker: &GenerationWorker) -> usize {
        let mut applied = 0;
        for (id, outcome) in worker.drain() {
            if self.deliver(id, outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one result. Results for anything but the pending request are
    /// dropped.
    pub fn deliver(&mut self, id: u64, outcome: GenerationOutcome) -> bool {
        if self.pending != Some(id) {
            log::debug!(target: "studio", "[req {}] dropped stale result (pending={:?})", id, self.pending);
            return false;
        }
        self.pending = None;
        match outcome {
            GenerationOutcome::Model(Ok(model)) => {
                log::info!(
                    target: "studio",
                    "[req {}] ModelReady name={:?} voxels={} animation={}",
                    id,
                    model.name,
                    model.voxel_count(),
                    model.animation
                );
                self.install(model);
                self.status = GenerationStatus::Success;
            }
            GenerationOutcome::Model(Err(e)) => self.fail(id, &e, e.user_message()),
            GenerationOutcome::Concept(Ok(image)) => {
                log::info!(target: "studio", "[req {}] ConceptReady bytes={}", id, image.data.len());
                self.concept = Some(image);
                self.status = GenerationStatus::Idle;
            }
            GenerationOutcome::Concept(Err(e)) => self.fail(id, &e, e.concept_message()),
        }
        true
    }

    fn fail(&mut self, id: u64, err: &GenerationError, message: &str) {
        log::warn!(target: "studio", "[req {}] GenerationFailed {}", id, err);
        self.error = Some(message.to_string());
        self.status = GenerationStatus::Error;
    }

    fn install(&mut self, model: Model) {
        self.model = Some(model);
        self.epoch += 1;
        self.rig = None;
        self.bodies = None;
    }

    /// Drop the current model and any outstanding request.
    pub fn reset(&mut self) {
        self.model = None;
        self.epoch += 1;
        self.rig = None;
        self.bodies = None;
        self.concept = None;
        self.ragdoll = false;
        self.editor.set_active(false);
        self.pending = None;
        self.status = GenerationStatus::Idle;
        self.error = None;
        log::info!(target: "studio", "reset");
    }

    /// Install a saved model as-is. Its stored animation selection is kept.
    pub fn load(&mut self, model: Model) {
        log::info!(target: "studio", "loaded '{}' id={}", model.name, model.id);
        self.category = model.category;
        self.install(model);
        self.pending = None;
        self.status = GenerationStatus::Success;
        self.ragdoll = false;
    }

    /// Save the current model. Returns false when there is nothing to save.
    pub fn save(&self, library: &mut ModelLibrary) -> Result<bool, LibraryError> {
        match &self.model {
            Some(m) => library.save(m).map(|_| true),
            None => Ok(false),
        }
    }

    // --- Editing ---

    /// Apply the selected tool to the voxel at `index`.
    pub fn click_voxel(&mut self, index: usize) -> Option<EditRecord> {
        if self.status.is_pending() {
            log::debug!(target: "studio", "edit ignored while a request is pending");
            return None;
        }
        self.editor
            .apply(self.model.as_mut().map(|m| &mut m.voxels), index)
    }

    // --- Frame ---

    fn refresh_rig(&mut self) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let rev = model.voxels.revision();
        let stale = match &self.rig {
            Some(c) => c.epoch != self.epoch || c.rev != rev,
            None => true,
        };
        if stale {
            self.rig = Some(RigCache {
                epoch: self.epoch,
                rev,
                rig: Rig::from_buffer(&model.voxels),
            });
        }
        true
    }

    /// The rig for the current buffer, rebuilt only when the buffer changed.
    pub fn rig(&mut self) -> Option<&Rig> {
        if !self.refresh_rig() {
            return None;
        }
        self.rig.as_ref().map(|c| &c.rig)
    }

    /// Produce this frame's output at elapsed time `t` seconds.
    pub fn frame(&mut self, t: f64) -> FrameOutput {
        if !self.refresh_rig() {
            return FrameOutput::Empty;
        }
        let (Some(model), Some(cache)) = (self.model.as_ref(), self.rig.as_ref()) else {
            return FrameOutput::Empty;
        };
        if self.ragdoll {
            let rev = model.voxels.revision();
            let fresh = matches!(
                &self.bodies,
                Some(c) if c.epoch == self.epoch && c.rev == rev && c.stiffness == self.stiffness
            );
            if !fresh {
                let params = RagdollParams::from_stiffness(self.stiffness, &self.settings);
                let bodies = build_bodies(
                    &model.voxels,
                    cache.rig.center_offset(),
                    &params,
                    &self.settings,
                );
                self.bodies = Some(RagdollCache {
                    epoch: self.epoch,
                    rev,
                    stiffness: self.stiffness,
                    params,
                    bodies: Arc::new(bodies),
                });
            }
            return match &self.bodies {
                Some(c) => FrameOutput::Ragdoll(Arc::clone(&c.bodies), c.params),
                None => FrameOutput::Empty,
            };
        }
        let input = PoseInput {
            animation: model.animation,
            category: model.category,
            time: t,
            stiffness: self.stiffness,
            suppressed: self.editor.is_active(),
        };
        FrameOutput::Posed(evaluate(&cache.rig, &input))
    }
}
