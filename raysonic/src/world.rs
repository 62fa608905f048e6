use crate::config::{ListenerConfig, MixerBindings, RaySonicWorldDesc, SourceConfig};
use crate::error::{RaySonicError, Result};
use crate::events::{RaySonicEvent, SkipReason};
use crate::mapping::{ControlValues, ParameterMapper};
use crate::math::{Pose, Vec3};
use crate::mixer::MixerSink;
use crate::sampling::{AcousticSampler, DirectionSampler, RayRecord};
use crate::scene::RayTracer;
use crate::scheduler::UpdateScheduler;
use crossbeam_channel::{Receiver, Sender};
use std::collections::BTreeMap;

/// Lightweight, type-safe handle for listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}

/// Lightweight, type-safe handle for audio sources.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(u64);

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

/// Main world object: the registry of listeners, sources and the pairs
/// between them, plus the collaborators every sampling pass needs.
///
/// # Architecture
///
/// The embedding engine owns the update loop. Each frame it pushes poses
/// with [`set_listener_pose`](Self::set_listener_pose) and
/// [`set_source_pose`](Self::set_source_pose), then calls
/// [`update`](Self::update) with the frame delta. Every listener and every
/// tracked listener/source pair has its own [`UpdateScheduler`]; when one
/// fires, its rays are cast through the installed [`RayTracer`], mapped to
/// [`ControlValues`] and written to the installed [`MixerSink`].
///
/// `update` never fails. A pass that cannot run (missing pose, tracer or
/// mixer) is skipped, the previous control values stay in place, and a
/// [`RaySonicEvent`] says why.
pub struct RaySonicWorld {
    desc: RaySonicWorldDesc,
    listeners: BTreeMap<ListenerId, RaySonicAudioListener>,
    sources: BTreeMap<SourceId, RaySonicAudioSource>,
    next_id: u64,
    sampler: AcousticSampler,
    ray_tracer: Option<Box<dyn RayTracer>>,
    mixer: Option<Box<dyn MixerSink + Send>>,
    event_sender: Sender<RaySonicEvent>,
    event_receiver: Receiver<RaySonicEvent>,
}

impl RaySonicWorld {
    pub fn new(desc: RaySonicWorldDesc) -> Result<Self> {
        let directions = match desc.seed {
            Some(seed) => DirectionSampler::new(seed),
            None => DirectionSampler::from_entropy(),
        };
        let (event_sender, event_receiver) = crossbeam_channel::unbounded();

        log::info!(
            "RaySonic world created (seed: {:?}, events: {})",
            desc.seed,
            desc.emit_events
        );

        Ok(Self {
            desc,
            listeners: BTreeMap::new(),
            sources: BTreeMap::new(),
            next_id: 0,
            sampler: AcousticSampler::new(directions),
            ray_tracer: None,
            mixer: None,
            event_sender,
            event_receiver,
        })
    }

    pub fn desc(&self) -> &RaySonicWorldDesc {
        &self.desc
    }

    /// Installs the ray tracer used by every sampling pass.
    pub fn set_ray_tracer(&mut self, tracer: impl RayTracer + 'static) {
        self.ray_tracer = Some(Box::new(tracer));
    }

    pub fn clear_ray_tracer(&mut self) -> Option<Box<dyn RayTracer>> {
        self.ray_tracer.take()
    }

    pub fn has_ray_tracer(&self) -> bool {
        self.ray_tracer.is_some()
    }

    /// Installs the mixer that receives control values.
    pub fn set_mixer(&mut self, mixer: impl MixerSink + Send + 'static) {
        self.mixer = Some(Box::new(mixer));
    }

    pub fn clear_mixer(&mut self) -> Option<Box<dyn MixerSink + Send>> {
        self.mixer.take()
    }

    pub fn has_mixer(&self) -> bool {
        self.mixer.is_some()
    }

    /// Installs a callback invoked with every cast ray (debug drawing).
    pub fn set_ray_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&RayRecord) + Send + 'static,
    {
        self.sampler.set_observer(observer);
    }

    pub fn clear_ray_observer(&mut self) {
        self.sampler.clear_observer();
    }

    /// Total number of rays cast by this world.
    pub fn rays_cast(&self) -> u64 {
        self.sampler.rays_cast()
    }

    /// Registers a listener. It stays unavailable until it gets a pose.
    ///
    /// Degenerate configurations are accepted with a warning and a
    /// [`RaySonicEvent::DegenerateConfiguration`]; sampling falls back to safe
    /// values for them.
    ///
    /// # Arguments
    ///
    /// * `config` - Ray budgets, intervals and mixer bindings for the listener
    ///
    /// # Returns
    ///
    /// The id used to pose, track sources for and query the listener
    pub fn add_listener(&mut self, config: ListenerConfig) -> ListenerId {
        let id = ListenerId(self.allocate_id());
        if let Err(e) = config.validate() {
            self.report_degenerate(Some(id), None, "registered", &e);
        }
        self.listeners.insert(id, RaySonicAudioListener::new(config));
        log::debug!("Added {}", id);
        id
    }

    /// Removes a listener along with its tracked pairs.
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<RaySonicAudioListener> {
        let removed = self.listeners.remove(&id);
        if removed.is_some() {
            log::debug!("Removed {}", id);
        }
        removed
    }

    /// Registers a source. It stays unavailable until it gets a pose.
    ///
    /// # Arguments
    ///
    /// * `config` - Acoustic properties and mixer bindings for the source
    ///
    /// # Returns
    ///
    /// The id used to pose the source and to track it from listeners
    pub fn add_source(&mut self, config: SourceConfig) -> SourceId {
        let id = SourceId(self.allocate_id());
        if let Err(e) = config.validate() {
            self.report_degenerate(None, Some(id), "registered", &e);
        }
        self.sources.insert(id, RaySonicAudioSource::new(config));
        log::debug!("Added {}", id);
        id
    }

    /// Removes a source from the world.
    ///
    /// Listeners that still track it skip the pair with
    /// [`SkipReason::SourceRemoved`] until it is untracked.
    pub fn remove_source(&mut self, id: SourceId) -> Option<RaySonicAudioSource> {
        let removed = self.sources.remove(&id);
        if removed.is_some() {
            log::debug!("Removed {}", id);
        }
        removed
    }

    pub fn listener(&self, id: ListenerId) -> Option<&RaySonicAudioListener> {
        self.listeners.get(&id)
    }

    pub fn source(&self, id: SourceId) -> Option<&RaySonicAudioSource> {
        self.sources.get(&id)
    }

    pub fn listener_ids(&self) -> Vec<ListenerId> {
        self.listeners.keys().copied().collect()
    }

    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.keys().copied().collect()
    }

    /// Sets the listener pose and makes the listener available.
    ///
    /// # Arguments
    ///
    /// * `id` - The listener to move
    /// * `pose` - New position and orientation; every component must be finite
    ///
    /// # Returns
    ///
    /// `InvalidPose` for a non-finite pose, `ListenerNotFound` for an unknown id
    pub fn set_listener_pose(&mut self, id: ListenerId, pose: Pose) -> Result<()> {
        check_pose(&pose)?;
        let listener = self.listener_mut(id)?;
        listener.pose = Some(pose);
        listener.last_known_position = Some(pose.position);
        Ok(())
    }

    /// Marks the listener unavailable. Its last known position is kept.
    pub fn clear_listener_pose(&mut self, id: ListenerId) -> Result<()> {
        self.listener_mut(id)?.pose = None;
        Ok(())
    }

    /// Sets the source pose and makes the source available.
    ///
    /// # Arguments
    ///
    /// * `id` - The source to move
    /// * `pose` - New position and orientation; every component must be finite
    ///
    /// # Returns
    ///
    /// `InvalidPose` for a non-finite pose, `SourceNotFound` for an unknown id
    pub fn set_source_pose(&mut self, id: SourceId, pose: Pose) -> Result<()> {
        check_pose(&pose)?;
        let source = self.source_mut(id)?;
        source.pose = Some(pose);
        source.last_known_position = Some(pose.position);
        Ok(())
    }

    /// Marks the source unavailable. Its last known position is kept.
    pub fn clear_source_pose(&mut self, id: SourceId) -> Result<()> {
        self.source_mut(id)?.pose = None;
        Ok(())
    }

    /// Replaces a listener's configuration, keeping accumulated timer state.
    ///
    /// Refused when the new bindings share a mixer name with a tracked
    /// source; the previous configuration then stays in place.
    pub fn update_listener_config(&mut self, id: ListenerId, config: ListenerConfig) -> Result<()> {
        let listener = self
            .listeners
            .get(&id)
            .ok_or(RaySonicError::ListenerNotFound(id))?;
        for pair in &listener.tracked {
            if let Some(source) = self.sources.get(&pair.source_id) {
                check_bindings(id, &config.bindings, pair.source_id, &source.config.bindings)?;
            }
        }
        if let Err(e) = config.validate() {
            self.report_degenerate(Some(id), None, "reconfigured", &e);
        }
        let listener = self.listener_mut(id)?;
        listener.scheduler.set_interval(config.update_interval);
        for pair in &mut listener.tracked {
            pair.scheduler.set_interval(config.source_update_interval);
        }
        listener.config = config;
        Ok(())
    }

    /// Replaces a source's configuration.
    ///
    /// Refused when the new bindings share a mixer name with a listener that
    /// tracks this source.
    pub fn update_source_config(&mut self, id: SourceId, config: SourceConfig) -> Result<()> {
        if !self.sources.contains_key(&id) {
            return Err(RaySonicError::SourceNotFound(id));
        }
        for (&listener_id, listener) in &self.listeners {
            if listener.is_tracking(id) {
                check_bindings(listener_id, &listener.config.bindings, id, &config.bindings)?;
            }
        }
        if let Err(e) = config.validate() {
            self.report_degenerate(None, Some(id), "reconfigured", &e);
        }
        self.source_mut(id)?.config = config;
        Ok(())
    }

    /// Starts per-pair simulation of `source` for `listener`.
    ///
    /// Tracking an already tracked source is a no-op.
    ///
    /// # Arguments
    ///
    /// * `listener` - The listener whose mixer hears the source
    /// * `source` - The source to sample on the pair's own timer
    ///
    /// # Returns
    ///
    /// `ListenerNotFound` or `SourceNotFound` for unknown ids, and
    /// `Configuration` when the listener and source bindings share a mixer
    /// name, since the two passes would then overwrite each other's value.
    pub fn track_source(&mut self, listener: ListenerId, source: SourceId) -> Result<()> {
        let source_bindings = &self
            .sources
            .get(&source)
            .ok_or(RaySonicError::SourceNotFound(source))?
            .config
            .bindings;
        let entry = self
            .listeners
            .get(&listener)
            .ok_or(RaySonicError::ListenerNotFound(listener))?;
        if entry.is_tracking(source) {
            return Ok(());
        }
        if let Err(e) = check_bindings(listener, &entry.config.bindings, source, source_bindings) {
            log::warn!("Refusing to track: {}", e);
            return Err(e);
        }

        let entry = self.listener_mut(listener)?;
        let interval = entry.config.source_update_interval;
        entry.tracked.push(TrackedSource::new(source, interval));
        log::debug!("{} now tracks {}", listener, source);
        Ok(())
    }

    /// Stops tracking `source`. Returns whether it was tracked.
    pub fn untrack_source(&mut self, listener: ListenerId, source: SourceId) -> Result<bool> {
        let entry = self.listener_mut(listener)?;
        let before = entry.tracked.len();
        entry.tracked.retain(|p| p.source_id != source);
        Ok(entry.tracked.len() != before)
    }

    /// Makes the listener and all its pairs sample on the next update.
    pub fn request_resample(&mut self, id: ListenerId) -> Result<()> {
        let listener = self.listener_mut(id)?;
        listener.scheduler.trigger();
        for pair in &mut listener.tracked {
            pair.scheduler.trigger();
        }
        Ok(())
    }

    /// Last ambient control values computed for a listener.
    pub fn listener_controls(&self, id: ListenerId) -> Option<&ControlValues> {
        self.listeners.get(&id).map(|l| &l.controls)
    }

    /// Last control values computed for a listener/source pair.
    pub fn source_controls(
        &self,
        listener: ListenerId,
        source: SourceId,
    ) -> Option<&ControlValues> {
        self.listeners.get(&listener)?.source_controls(source)
    }

    /// Drains every event published since the last call.
    pub fn poll_events(&self) -> Vec<RaySonicEvent> {
        self.event_receiver.try_iter().collect()
    }

    /// Advances every scheduler by `dt` seconds and runs the passes that are
    /// due.
    ///
    /// Call once per frame. Ambient passes run before the pair passes of the
    /// same listener. Skipped passes keep their previous values and are
    /// reported as events, so this never fails.
    ///
    /// # Arguments
    ///
    /// * `dt` - Seconds since the previous call; negative or NaN counts as 0
    pub fn update(&mut self, dt: f32) {
        let Self {
            desc,
            listeners,
            sources,
            sampler,
            ray_tracer,
            mixer,
            event_sender,
            ..
        } = self;
        let events = desc.emit_events.then_some(&*event_sender);

        if let Some(tracer) = ray_tracer.as_deref_mut() {
            tracer.begin_frame();
        }

        for (&listener_id, listener) in listeners.iter_mut() {
            let RaySonicAudioListener {
                pose,
                config,
                scheduler,
                controls,
                tracked,
                ..
            } = listener;
            let position = pose.map(|p| p.position);
            let mapper = ParameterMapper::new(config.muffle_floor_hz);

            if scheduler.tick(dt) {
                let outcome = match (position, ray_tracer.as_deref(), mixer.as_deref_mut()) {
                    (None, _, _) => Err(SkipReason::ListenerUnavailable),
                    (_, None, _) => Err(SkipReason::NoRayTracer),
                    (_, _, None) => Err(SkipReason::NoMixer),
                    (Some(position), Some(tracer), Some(mixer)) => {
                        let estimate = sampler.ambient_estimate(tracer, position, config);
                        let values = mapper.ambient(&estimate);
                        let written = values.write_to(&config.bindings, mixer);
                        *controls = values;
                        Ok((estimate, written))
                    }
                };
                scheduler.finish();

                let event = match outcome {
                    Ok((estimate, parameters_written)) => RaySonicEvent::ListenerUpdated {
                        listener_id,
                        estimate,
                        parameters_written,
                    },
                    Err(reason) => {
                        log::warn!("Skipping ambient pass for {}: {:?}", listener_id, reason);
                        RaySonicEvent::ListenerSkipped {
                            listener_id,
                            reason,
                        }
                    }
                };
                publish(events, event);
            }

            for pair in tracked.iter_mut() {
                if !pair.scheduler.tick(dt) {
                    continue;
                }
                let source_id = pair.source_id;
                let source = sources.get(&source_id);

                let outcome = match (
                    position,
                    source,
                    ray_tracer.as_deref(),
                    mixer.as_deref_mut(),
                ) {
                    (None, _, _, _) => Err(SkipReason::ListenerUnavailable),
                    (_, None, _, _) => Err(SkipReason::SourceRemoved),
                    (_, Some(s), _, _) if s.pose.is_none() => Err(SkipReason::SourceUnavailable),
                    (_, _, None, _) => Err(SkipReason::NoRayTracer),
                    (_, _, _, None) => Err(SkipReason::NoMixer),
                    (Some(listener_position), Some(source), Some(tracer), Some(mixer)) => {
                        let source_position = source.position().unwrap_or(listener_position);
                        let acoustics = sampler.sample_source(
                            tracer,
                            listener_position,
                            source_position,
                            config,
                            &source.config,
                        );
                        let values = mapper.source(&acoustics, source.config.reverb_factor);
                        let written = values.write_to(&source.config.bindings, mixer);
                        pair.controls = values;
                        Ok((acoustics, written))
                    }
                };
                pair.scheduler.finish();

                let event = match outcome {
                    Ok((acoustics, parameters_written)) => RaySonicEvent::SourceUpdated {
                        listener_id,
                        source_id,
                        acoustics,
                        parameters_written,
                    },
                    Err(reason) => {
                        log::warn!(
                            "Skipping pass for {} / {}: {:?}",
                            listener_id,
                            source_id,
                            reason
                        );
                        RaySonicEvent::PairSkipped {
                            listener_id,
                            source_id,
                            reason,
                        }
                    }
                };
                publish(events, event);
            }
        }

        if let Some(tracer) = ray_tracer.as_deref_mut() {
            tracer.end_frame();
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn report_degenerate(
        &self,
        listener_id: Option<ListenerId>,
        source_id: Option<SourceId>,
        action: &str,
        error: &RaySonicError,
    ) {
        let subject = match (listener_id, source_id) {
            (Some(id), _) => id.to_string(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "world".to_string(),
        };
        log::warn!("{} {} with degenerate configuration: {}", subject, action, error);
        self.publish(RaySonicEvent::DegenerateConfiguration {
            listener_id,
            source_id,
            message: error.to_string(),
        });
    }

    fn publish(&self, event: RaySonicEvent) {
        publish(self.desc.emit_events.then_some(&self.event_sender), event);
    }

    fn listener_mut(&mut self, id: ListenerId) -> Result<&mut RaySonicAudioListener> {
        self.listeners
            .get_mut(&id)
            .ok_or(RaySonicError::ListenerNotFound(id))
    }

    fn source_mut(&mut self, id: SourceId) -> Result<&mut RaySonicAudioSource> {
        self.sources
            .get_mut(&id)
            .ok_or(RaySonicError::SourceNotFound(id))
    }
}

impl std::fmt::Debug for RaySonicWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaySonicWorld")
            .field("desc", &self.desc)
            .field("listeners", &self.listeners.len())
            .field("sources", &self.sources.len())
            .field("has_ray_tracer", &self.ray_tracer.is_some())
            .field("has_mixer", &self.mixer.is_some())
            .finish()
    }
}

fn publish(events: Option<&Sender<RaySonicEvent>>, event: RaySonicEvent) {
    if let Some(sender) = events {
        // The world owns the receiver, so the channel cannot be disconnected
        let _ = sender.send(event);
    }
}

fn check_bindings(
    listener_id: ListenerId,
    listener: &MixerBindings,
    source_id: SourceId,
    source: &MixerBindings,
) -> Result<()> {
    match listener.shared_name(source) {
        Some(name) => Err(RaySonicError::Configuration(format!(
            "{} and {} both bind mixer parameter \"{}\"",
            listener_id, source_id, name
        ))),
        None => Ok(()),
    }
}

fn check_pose(pose: &Pose) -> Result<()> {
    if pose.is_finite() {
        Ok(())
    } else {
        Err(RaySonicError::InvalidPose(format!(
            "pose must be finite, got {:?}",
            pose
        )))
    }
}

/// A source tracked by a listener, with the pair's own timer and last values.
#[derive(Debug, Clone)]
pub struct TrackedSource {
    source_id: SourceId,
    scheduler: UpdateScheduler,
    controls: ControlValues,
}

impl TrackedSource {
    fn new(source_id: SourceId, interval: f32) -> Self {
        Self {
            source_id,
            scheduler: UpdateScheduler::new(interval),
            controls: ControlValues::new(),
        }
    }

    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    pub fn controls(&self) -> &ControlValues {
        &self.controls
    }
}

/// Represents the listener (the "ears") in the 3D audio world.
///
/// Owns its ambient timer, its last ambient values and the pairs with the
/// sources it tracks. Sources are referenced by id only.
#[derive(Debug, Clone)]
pub struct RaySonicAudioListener {
    pub(crate) pose: Option<Pose>,
    pub(crate) last_known_position: Option<Vec3>,
    pub(crate) config: ListenerConfig,
    pub(crate) scheduler: UpdateScheduler,
    pub(crate) controls: ControlValues,
    pub(crate) tracked: Vec<TrackedSource>,
}

impl RaySonicAudioListener {
    fn new(config: ListenerConfig) -> Self {
        Self {
            pose: None,
            last_known_position: None,
            scheduler: UpdateScheduler::new(config.update_interval),
            config,
            controls: ControlValues::new(),
            tracked: Vec::new(),
        }
    }

    /// Current pose, `None` while the listener is unavailable.
    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn position(&self) -> Option<Vec3> {
        self.pose.map(|p| p.position)
    }

    pub fn is_available(&self) -> bool {
        self.pose.is_some()
    }

    /// Position from the most recent pose, kept after the listener becomes
    /// unavailable.
    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    pub fn controls(&self) -> &ControlValues {
        &self.controls
    }

    pub fn tracked_sources(&self) -> impl Iterator<Item = &TrackedSource> {
        self.tracked.iter()
    }

    pub fn is_tracking(&self, source: SourceId) -> bool {
        self.tracked.iter().any(|p| p.source_id == source)
    }

    pub fn source_controls(&self, source: SourceId) -> Option<&ControlValues> {
        self.tracked
            .iter()
            .find(|p| p.source_id == source)
            .map(|p| &p.controls)
    }
}

/// Represents an audio source in the 3D world.
#[derive(Debug, Clone)]
pub struct RaySonicAudioSource {
    pub(crate) pose: Option<Pose>,
    pub(crate) last_known_position: Option<Vec3>,
    pub(crate) config: SourceConfig,
}

impl RaySonicAudioSource {
    fn new(config: SourceConfig) -> Self {
        Self {
            pose: None,
            last_known_position: None,
            config,
        }
    }

    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn position(&self) -> Option<Vec3> {
        self.pose.map(|p| p.position)
    }

    pub fn is_available(&self) -> bool {
        self.pose.is_some()
    }

    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}
