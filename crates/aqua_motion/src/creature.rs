use aqua_animation::Pose;
use aqua_assets::{AssetRef, LoadedAsset};
use aqua_core::{RandomSource, Result};
use aqua_scene::{BoundingBox, RenderTransform, SceneGraph, Viewport};

use crate::blender::AnimationBlender;
use crate::controller::{MotionController, StepReport};
use crate::normalization::{Footprint, normalize};
use crate::params::{BoundaryPolicy, CreatureConfig, CreatureParams, LanePreset};

/// Everything a creature gains when its asset arrives.
pub struct CreatureBody {
    pub scene: SceneGraph,
    pub bounds: BoundingBox,
    pub footprint: Footprint,
    pub blender: AnimationBlender,
    pub pose: Option<Pose>,
}

/// What a reconfiguration changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reconfigured {
    /// The asset reference changed; a new load is required.
    pub source_changed: bool,
    pub animation_changed: bool,
}

/// One swimming creature.
///
/// Starts empty; [`populate`](Self::populate) attaches a loaded asset and the
/// next [`tick`](Self::tick) places it. The generation counter is bumped by
/// every change that invalidates an outstanding load.
pub struct Creature {
    id: u64,
    generation: u32,
    config: CreatureConfig,
    lane: Option<LanePreset>,
    policy: BoundaryPolicy,
    params: CreatureParams,
    controller: MotionController,
    body: Option<CreatureBody>,
}

impl Creature {
    pub fn new(
        id: u64,
        config: CreatureConfig,
        lane: Option<LanePreset>,
        policy: BoundaryPolicy,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        let params = config.resolve(lane.as_ref(), policy)?;
        let controller = MotionController::new(params.motion, params.wave, rng);
        Ok(Self {
            id,
            generation: 0,
            config,
            lane,
            policy,
            params,
            controller,
            body: None,
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn source(&self) -> Option<&AssetRef> {
        self.config.source.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &CreatureConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &CreatureParams {
        &self.params
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MotionController {
        &mut self.controller
    }

    #[must_use]
    pub fn body(&self) -> Option<&CreatureBody> {
        self.body.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.body.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.body.is_some() && self.controller.is_placed()
    }

    #[must_use]
    pub fn has_active_clip(&self) -> bool {
        self.body.as_ref().is_some_and(|b| b.blender.has_active_clip())
    }

    /// Attaches a loaded asset. The creature is placed on the next tick.
    pub fn populate(&mut self, asset: LoadedAsset, viewport: Viewport) {
        let LoadedAsset { scene, bounds, clips } = asset;
        let footprint = normalize(&bounds, viewport.height, &self.params.size);
        let blender = AnimationBlender::from_asset(&clips, &scene, &self.params.animation);
        log::debug!(
            "creature {} populated: scale {:.4}, half width {:.3}, {} clip(s)",
            self.id,
            footprint.base_scale,
            footprint.half_width,
            clips.len()
        );

        self.release_body();
        self.controller.reset();
        self.body = Some(CreatureBody {
            scene,
            bounds,
            footprint,
            blender,
            pose: None,
        });
    }

    /// Applies a new configuration. A changed source bumps the generation and
    /// drops the current body, starting a fresh unplaced cycle.
    pub fn reconfigure(&mut self, config: CreatureConfig, viewport: Viewport) -> Result<Reconfigured> {
        let params = config.resolve(self.lane.as_ref(), self.policy)?;
        let outcome = Reconfigured {
            source_changed: config.source != self.config.source,
            animation_changed: params.animation != self.params.animation,
        };

        self.controller.set_params(params.motion, params.wave);
        let size_changed = params.size != self.params.size;
        self.params = params;
        self.config = config;

        if outcome.source_changed {
            self.generation = self.generation.wrapping_add(1);
            self.release_body();
            self.controller.reset();
            log::debug!(
                "creature {} source changed, generation {}",
                self.id,
                self.generation
            );
            return Ok(outcome);
        }

        if let Some(body) = self.body.as_mut() {
            if size_changed {
                body.footprint = normalize(&body.bounds, viewport.height, &self.params.size);
            }
            if outcome.animation_changed {
                body.blender.reconfigure(&self.params.animation, &body.scene);
            }
        }
        Ok(outcome)
    }

    /// Re-normalizes after a viewport change. Placement is kept; bounds follow
    /// on the next tick.
    pub fn on_viewport_changed(&mut self, viewport: Viewport) {
        if let Some(body) = self.body.as_mut() {
            body.footprint = normalize(&body.bounds, viewport.height, &self.params.size);
        }
    }

    /// One frame. Unpopulated creatures do nothing. The first tick after
    /// population only places the creature.
    pub fn tick(&mut self, viewport: Viewport, delta: f32) -> Option<StepReport> {
        let body = self.body.as_mut()?;

        if !self.controller.is_placed() {
            self.controller.place(viewport, &body.footprint);
            return None;
        }

        let report = self.controller.step(viewport, &body.footprint, delta)?;

        body.blender.advance(delta);
        body.pose = body.blender.pose();
        if let Some(pose) = &body.pose {
            body.scene.apply_pose(pose);
        }
        if let Some(transform) = self.controller.render_transform(&body.footprint) {
            body.scene.update_world_matrices(&transform.world_matrix());
        }
        Some(report)
    }

    /// What the renderer draws this frame. `None` until placed.
    #[must_use]
    pub fn render_transform(&self) -> Option<RenderTransform> {
        let body = self.body.as_ref()?;
        self.controller.render_transform(&body.footprint)
    }

    #[must_use]
    pub fn pose(&self) -> Option<&Pose> {
        self.body.as_ref()?.pose.as_ref()
    }

    /// Stops animation and releases the body. Called before removal.
    pub fn teardown(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.release_body();
        self.controller.reset();
    }

    fn release_body(&mut self) {
        if let Some(mut body) = self.body.take() {
            body.blender.teardown();
        }
    }
}
