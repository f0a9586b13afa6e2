//! The creature arena.
//!
//! [`Aquarium`] owns every [`Creature`] in a slot map keyed by
//! [`CreatureKey`]. Loads leave with a [`LoadTicket`] carrying the creature's
//! generation at request time; when a result comes back the ticket is
//! compared against the live creature and the result is dropped if the
//! creature was reconfigured or removed in the meantime. No load is ever
//! cancelled.

use aqua_assets::{AssetLoader, AssetRef, AssetServer, LoadCompletion};
use aqua_core::{AquaError, CreatureRng, RandomSource, Result, creature_seed};
use aqua_motion::{BoundaryPolicy, Creature, CreatureConfig, LaneAllocator};
use aqua_scene::{Viewport, ViewportModel};
use slotmap::{SlotMap, new_key_type};

use crate::config::AquariumConfig;
use crate::frame::{CreatureFrame, FrameOutput};

new_key_type! {
    pub struct CreatureKey;
}

/// Identifies the request a load result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub key: CreatureKey,
    pub generation: u32,
}

/// Where load requests go.
///
/// [`AssetServer`] is the production implementation; without a dispatcher
/// requests queue up in the aquarium for the caller to service.
pub trait LoadDispatch {
    fn request(&self, ticket: LoadTicket, source: AssetRef);
    fn drain(&self) -> Vec<LoadCompletion<LoadTicket>>;
}

impl<L: AssetLoader> LoadDispatch for AssetServer<L, LoadTicket> {
    fn request(&self, ticket: LoadTicket, source: AssetRef) {
        AssetServer::request(self, ticket, source);
    }

    fn drain(&self) -> Vec<LoadCompletion<LoadTicket>> {
        AssetServer::drain(self)
    }
}

/// What happened to one load result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// The creature changed since the request.
    Stale,
    /// The creature no longer exists.
    Removed,
    /// The loader reported an error; the creature stays unplaced.
    Failed,
}

pub struct Aquarium {
    creatures: SlotMap<CreatureKey, Creature>,
    viewport: ViewportModel,
    lanes: LaneAllocator,
    policy: BoundaryPolicy,
    seed: u64,
    next_id: u64,
    dispatcher: Option<Box<dyn LoadDispatch>>,
    queued: Vec<(LoadTicket, AssetRef)>,
    time: f32,
    frame_count: u64,
}

impl Aquarium {
    /// Creates an aquarium whose load requests queue up for
    /// [`take_requests`](Self::take_requests).
    pub fn new(config: &AquariumConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Creates an aquarium that sends load requests to `dispatcher`.
    pub fn with_dispatcher(config: &AquariumConfig, dispatcher: impl LoadDispatch + 'static) -> Result<Self> {
        Self::build(config, Some(Box::new(dispatcher)))
    }

    fn build(config: &AquariumConfig, dispatcher: Option<Box<dyn LoadDispatch>>) -> Result<Self> {
        config.validate()?;
        let vc = config.viewport;
        let mut aquarium = Self {
            creatures: SlotMap::with_key(),
            viewport: ViewportModel::new(vc.pixel_width, vc.pixel_height, vc.world_height),
            lanes: LaneAllocator::new(config.lanes.clone()),
            policy: config.motion.boundary_policy,
            seed: config.seed,
            next_id: 0,
            dispatcher,
            queued: Vec::new(),
            time: 0.0,
            frame_count: 0,
        };
        for creature in &config.creatures {
            aquarium.spawn(creature.clone())?;
        }
        Ok(aquarium)
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    #[inline]
    #[must_use]
    pub fn lanes(&self) -> &LaneAllocator {
        &self.lanes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: CreatureKey) -> Option<&Creature> {
        self.creatures.get(key)
    }

    pub fn get_mut(&mut self, key: CreatureKey) -> Option<&mut Creature> {
        self.creatures.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CreatureKey, &Creature)> {
        self.creatures.iter()
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Adds a creature with a random source seeded from its id.
    pub fn spawn(&mut self, config: CreatureConfig) -> Result<CreatureKey> {
        let id = self.next_id;
        let rng = CreatureRng::seeded(creature_seed(self.seed, id));
        self.spawn_with_rng(config, Box::new(rng))
    }

    /// Adds a creature drawing from `rng`. Its lane follows spawn order.
    pub fn spawn_with_rng(&mut self, config: CreatureConfig, rng: Box<dyn RandomSource>) -> Result<CreatureKey> {
        let id = self.next_id;
        let lane = self.lanes.assign(id as usize, self.creatures.len() + 1).copied();
        let creature = Creature::new(id, config, lane, self.policy, rng)?;
        self.next_id += 1;

        let key = self.creatures.insert(creature);
        log::debug!("spawned creature {id}");
        self.request_load(key);
        Ok(key)
    }

    /// Applies a new configuration. A changed source starts a fresh load;
    /// any result for the old source is dropped when it arrives.
    pub fn reconfigure(&mut self, key: CreatureKey, config: CreatureConfig) -> Result<()> {
        let viewport = self.viewport.current();
        let creature = self
            .creatures
            .get_mut(key)
            .ok_or_else(|| AquaError::UnknownCreature(format!("{key:?}")))?;
        let outcome = creature.reconfigure(config, viewport)?;
        if outcome.source_changed {
            self.request_load(key);
        }
        Ok(())
    }

    /// Tears a creature down and drops it. Returns `false` for an unknown key.
    pub fn remove(&mut self, key: CreatureKey) -> bool {
        match self.creatures.remove(key) {
            Some(mut creature) => {
                creature.teardown();
                log::debug!("removed creature {}", creature.id());
                true
            }
            None => false,
        }
    }

    /// Removes every creature.
    pub fn clear(&mut self) {
        for (_, creature) in &mut self.creatures {
            creature.teardown();
        }
        self.creatures.clear();
    }

    fn request_load(&mut self, key: CreatureKey) {
        let Some(creature) = self.creatures.get(key) else {
            return;
        };
        let Some(source) = creature.source().cloned() else {
            log::debug!("creature {} has no source, staying unplaced", creature.id());
            return;
        };
        let ticket = LoadTicket {
            key,
            generation: creature.generation(),
        };
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.request(ticket, source),
            None => self.queued.push((ticket, source)),
        }
    }

    /// Requests issued without a dispatcher, oldest first.
    pub fn take_requests(&mut self) -> Vec<(LoadTicket, AssetRef)> {
        std::mem::take(&mut self.queued)
    }

    /// Applies one load result if its ticket still matches.
    pub fn complete_load(&mut self, completion: LoadCompletion<LoadTicket>) -> LoadOutcome {
        let LoadCompletion { ticket, source, result } = completion;
        let viewport = self.viewport.current();

        let Some(creature) = self.creatures.get_mut(ticket.key) else {
            log::debug!("load of '{source}' finished after its creature was removed");
            return LoadOutcome::Removed;
        };
        if creature.generation() != ticket.generation {
            log::debug!(
                "discarding stale load of '{source}' (generation {} != {})",
                ticket.generation,
                creature.generation()
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(asset) => {
                creature.populate(asset, viewport);
                LoadOutcome::Applied
            }
            Err(err) => {
                log::warn!("creature {} stays unplaced: {err}", creature.id());
                LoadOutcome::Failed
            }
        }
    }

    /// Applies every result the dispatcher has received. Returns how many
    /// were applied.
    pub fn poll_loads(&mut self) -> usize {
        let Some(dispatcher) = &self.dispatcher else {
            return 0;
        };
        let completions = dispatcher.drain();
        completions
            .into_iter()
            .map(|c| self.complete_load(c))
            .filter(|outcome| *outcome == LoadOutcome::Applied)
            .count()
    }

    /// Resizes the drawing buffer. World height stays fixed.
    pub fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        let before = self.viewport.revision();
        self.viewport.resize(pixel_width, pixel_height);
        if self.viewport.revision() != before {
            self.notify_viewport();
        }
    }

    /// Replaces the viewport outright, re-normalizing populated creatures.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let before = self.viewport.revision();
        self.viewport.set(viewport);
        if self.viewport.revision() != before {
            self.notify_viewport();
        }
    }

    fn notify_viewport(&mut self) {
        let viewport = self.viewport.current();
        log::debug!("viewport is now {:.2} x {:.2}", viewport.width, viewport.height);
        for (_, creature) in &mut self.creatures {
            creature.on_viewport_changed(viewport);
        }
    }

    /// One frame: applies arrived loads, then ticks every creature.
    pub fn tick(&mut self, delta: f32) -> FrameOutput {
        self.poll_loads();

        let delta = aqua_core::math::sanitize_delta(delta);
        self.time += delta;
        self.frame_count += 1;

        let viewport = self.viewport.current();
        let mut creatures = Vec::with_capacity(self.creatures.len());
        for (key, creature) in &mut self.creatures {
            creature.tick(viewport, delta);
            if let Some(transform) = creature.render_transform() {
                creatures.push(CreatureFrame {
                    key,
                    id: creature.id(),
                    transform,
                    pose: creature.pose().cloned(),
                    clip: creature
                        .body()
                        .and_then(|b| b.blender.active_clip_name())
                        .map(str::to_string),
                });
            }
        }

        FrameOutput {
            frame: self.frame_count,
            time: self.time,
            viewport,
            live: self.creatures.len(),
            placed: creatures.len(),
            creatures,
        }
    }
}

impl Drop for Aquarium {
    fn drop(&mut self) {
        self.clear();
    }
}
