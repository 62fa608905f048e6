//! # RaySonic
//!
//! Ray-sampled acoustic estimation for games and interactive scenes.
//!
//! RaySonic approximates how a space sounds by casting rays from listener and
//! source positions through your collision geometry. The hit statistics are
//! turned into bounded control values (reflection strength, reverb, muffling,
//! echo) and written to named float parameters of your mixer.
//!
//! ## Quick Start
//!
//! ```
//! use raysonic::*;
//!
//! // A 10 x 4 x 10 m room with 0.5 m thick walls
//! let scene = AabbScene::closed_room(
//!     Vec3::new(-5.0, 0.0, -5.0),
//!     Vec3::new(5.0, 4.0, 5.0),
//!     0.5,
//!     LayerMask::ALL,
//! );
//! let mixer = ParameterStore::new();
//!
//! let mut world = RaySonicWorld::new(RaySonicWorldDesc::new().seed(7))?;
//! world.set_ray_tracer(scene);
//! world.set_mixer(mixer.clone());
//!
//! let listener = world.add_listener(ListenerConfig::default());
//! world.set_listener_pose(listener, Pose::from_position(Vec3::new(0.0, 1.7, 0.0)))?;
//!
//! let radio = world.add_source(SourceConfig::named("Radio"));
//! world.set_source_pose(radio, Pose::from_position(Vec3::new(3.0, 1.0, 2.0)))?;
//! world.track_source(listener, radio)?;
//!
//! // Call once per frame with the frame delta
//! for _ in 0..30 {
//!     world.update(1.0 / 60.0);
//! }
//!
//! let reflection = mixer.get("ReflectionStrength").unwrap();
//! assert!((0.1..=1.0).contains(&reflection));
//! assert!(mixer.get("RadioMuffleCutoff").is_some());
//! # Ok::<(), RaySonicError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`RaySonicWorld`]**: registry of listeners, sources and tracked pairs; drives every pass
//! - **[`RayTracer`]**: trait your physics engine implements to answer ray queries
//! - **[`MixerSink`]**: trait your mixer implements to receive named parameters
//! - **[`AcousticSampler`]**: casts ray batches and aggregates them into estimates
//! - **[`ParameterMapper`]**: pure mapping from estimates to control values
//! - **[`UpdateScheduler`]**: fixed-interval throttle for resampling
//!
//! ## Passes
//!
//! Every listener runs an *ambient* pass on its own timer: uniform rays on
//! the sphere estimate how enclosed the listener is. Every tracked
//! listener/source pair runs a *source* pass on its own timer: a direct ray,
//! a volume cone toward the source, an echo ray and cone behind the source,
//! and a reverb sphere around it.
//!
//! A pass whose inputs are missing is skipped and the previous values stay
//! in place. Enable [`RaySonicWorldDesc::emit_events`] to be told why.

pub mod config;
pub mod error;
pub mod events;
pub mod mapping;
pub mod math;
pub mod mixer;
pub mod sampling;
pub mod scene;
pub mod scheduler;
pub mod world;

pub use config::{
    ConeConfig, ListenerConfig, MixerBindings, RaySonicWorldDesc, ReverbProbe, SourceConfig,
};
pub use error::RaySonicError;
pub use events::{RaySonicEvent, SkipReason};
pub use mapping::{ControlParameter, ControlValues, ParameterMapper};
pub use math::{Pose, Quat, Vec3};
pub use mixer::{MixerSink, ParameterStore};
pub use sampling::{AcousticEstimate, AcousticSampler, DirectionSampler, MissPolicy};
pub use scene::{AabbScene, LayerMask, RayHit, RayTracer};
pub use scheduler::UpdateScheduler;
pub use world::{
    ListenerId, RaySonicAudioListener, RaySonicAudioSource, RaySonicWorld, SourceId,
    TrackedSource,
};
