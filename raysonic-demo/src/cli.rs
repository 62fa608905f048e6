use anyhow::Result;
use raysonic::config::{ListenerConfig, RaySonicWorldDesc, SourceConfig};
use raysonic::events::RaySonicEvent;
use raysonic::math::{Pose, Vec3};
use raysonic::mixer::ParameterStore;
use raysonic::scene::{Aabb, AabbScene, LayerMask};
use raysonic::world::RaySonicWorld;

const FRAME: f32 = 1.0 / 60.0;
const WALL: f32 = 0.3;
const DOOR_HALF_WIDTH: f32 = 1.0;
const DOOR_HEIGHT: f32 = 2.2;
const ROOM_HEIGHT: f32 = 3.0;
const ROOM_HALF: f32 = 5.0;

/// A 10 x 3 x 10 m room with a doorway in its +X wall.
fn room_with_doorway() -> AabbScene {
    let mut scene = AabbScene::new();
    let (lo, hi) = (-ROOM_HALF - WALL, ROOM_HALF + WALL);
    let ceiling = ROOM_HEIGHT + WALL;
    let mut wall = |min: Vec3, max: Vec3| {
        scene.add_box(Aabb::new(min, max), LayerMask::ALL);
    };

    // Floor and ceiling
    wall(Vec3::new(lo, -WALL, lo), Vec3::new(hi, 0.0, hi));
    wall(Vec3::new(lo, ROOM_HEIGHT, lo), Vec3::new(hi, ceiling, hi));
    // Solid walls
    wall(Vec3::new(lo, 0.0, lo), Vec3::new(-ROOM_HALF, ROOM_HEIGHT, hi));
    wall(Vec3::new(lo, 0.0, lo), Vec3::new(hi, ROOM_HEIGHT, -ROOM_HALF));
    wall(Vec3::new(lo, 0.0, ROOM_HALF), Vec3::new(hi, ROOM_HEIGHT, hi));
    // +X wall, split around the doorway
    let x = (ROOM_HALF, hi);
    wall(
        Vec3::new(x.0, 0.0, lo),
        Vec3::new(x.1, ROOM_HEIGHT, -DOOR_HALF_WIDTH),
    );
    wall(
        Vec3::new(x.0, 0.0, DOOR_HALF_WIDTH),
        Vec3::new(x.1, ROOM_HEIGHT, hi),
    );
    wall(
        Vec3::new(x.0, DOOR_HEIGHT, -DOOR_HALF_WIDTH),
        Vec3::new(x.1, ROOM_HEIGHT, DOOR_HALF_WIDTH),
    );

    scene
}

/// Walks a listener from the middle of the room out through the doorway and
/// along the outside wall, logging what the mixer receives.
pub fn run_walkthrough(seed: Option<u64>) -> Result<()> {
    let mut desc = RaySonicWorldDesc::new().emit_events(true);
    if let Some(seed) = seed {
        desc = desc.seed(seed);
    }

    let mut world = RaySonicWorld::new(desc)?;
    let mixer = ParameterStore::new();
    world.set_ray_tracer(room_with_doorway());
    world.set_mixer(mixer.clone());

    let listener = world.add_listener(ListenerConfig::default());
    let radio = world.add_source(SourceConfig::named("Radio").reverb_factor(0.7));
    world.set_source_pose(radio, Pose::from_position(Vec3::new(-3.0, 1.0, 2.0)))?;
    world.track_source(listener, radio)?;
    log::info!("Radio placed inside the room, listener starts at its center");

    let path = [
        Vec3::new(0.0, 1.7, 0.0),
        Vec3::new(4.5, 1.7, 0.0),
        Vec3::new(7.0, 1.7, 0.0),
        Vec3::new(7.0, 1.7, 6.0),
    ];
    let speed = 1.5;

    let mut position = path[0];
    for target in &path[1..] {
        while position != *target {
            let remaining = *target - position;
            if remaining.length() <= speed * FRAME {
                position = *target;
            } else {
                position += remaining.normalize() * speed * FRAME;
            }

            let mut pose = Pose::from_position(position);
            pose.look_at(*target);
            world.set_listener_pose(listener, pose)?;
            world.update(FRAME);

            for event in world.poll_events() {
                report(&event, position, &mixer);
            }
        }
    }

    log::info!(
        "Walkthrough finished: {} rays cast, final mixer state {:?}",
        world.rays_cast(),
        mixer.snapshot()
    );
    Ok(())
}

fn report(event: &RaySonicEvent, position: Vec3, mixer: &ParameterStore) {
    match event {
        RaySonicEvent::ListenerUpdated { estimate, .. } => {
            log::info!(
                "[{:5.2} {:5.2} {:5.2}] ambient: {}/{} hits, avg {:5.2} m -> reflection {:.2}, reverb {:.2}",
                position.x,
                position.y,
                position.z,
                estimate.hit_count,
                estimate.ray_count,
                estimate.average_distance,
                mixer.get("ReflectionStrength").unwrap_or_default(),
                mixer.get("ReverbFactor").unwrap_or_default(),
            );
        }
        RaySonicEvent::SourceUpdated { acoustics, .. } => {
            log::info!(
                "[{:5.2} {:5.2} {:5.2}] radio: direct {}, lowpass {:7.1} Hz, muffle {:7.1} Hz, reverb {:.2}, echo {:.3}",
                position.x,
                position.y,
                position.z,
                if acoustics.direct_occluded { "blocked" } else { "clear" },
                mixer.get("RadioLowpassCutoff").unwrap_or_default(),
                mixer.get("RadioMuffleCutoff").unwrap_or_default(),
                mixer.get("RadioReverbFactor").unwrap_or_default(),
                mixer.get("RadioEchoVolume").unwrap_or_default(),
            );
        }
        other => log::warn!("{:?}", other),
    }
}
