//! World assembly and the demo scene.
//!
//! [`build_world`] inserts every resource the systems need, [`build_schedule`]
//! orders the systems for one frame, and [`spawn_demo`] fills the world with a
//! small walkable ground and one animated actor. The binary runs these
//! headless for a fixed number of frames.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::IVec3;
use log::info;

use crate::components::animation::{
    AnimationController, AnimationData, AnimationEvent, AnimationFrame,
};
use crate::components::curve::{Curve, CurveTarget, CurveType, Keyframe};
use crate::components::rotation::Rotation;
use crate::components::screendepth::ScreenDepth;
use crate::components::screenposition::ScreenPosition;
use crate::components::sprite::Sprite;
use crate::components::tileactor::TileActor;
use crate::events::animation::{AnimationCallbackEvent, AnimationDoneEvent};
use crate::events::curve::CurveFinishedEvent;
use crate::events::tile::{log_tile_blocked, log_tile_transitions};
use crate::resources::gameconfig::GameConfig;
use crate::resources::groundmap::{GroundMap, Tile, TileKind};
use crate::resources::screensize::ScreenSize;
use crate::resources::tiletransform::TransformError;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation_system;
use crate::systems::curve::curve_system;
use crate::systems::ground::{tile_movement_system, tile_screen_system};
use crate::systems::screen::apply_screen_resize;

/// Create a world with time, screen, transform and ground resources.
///
/// Fails when the configured tile projection cannot be inverted.
pub fn build_world(config: &GameConfig) -> Result<World, TransformError> {
    let transform = config.tile_transform()?;

    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
    world.insert_resource(ScreenSize {
        w: config.screen_width as i32,
        h: config.screen_height as i32,
    });
    world.insert_resource(transform);
    world.insert_resource(GroundMap::new(config.max_i, config.max_j, config.max_k));
    world.insert_resource(config.clone());

    world.spawn(Observer::new(log_tile_transitions));
    world.spawn(Observer::new(log_tile_blocked));
    world.flush();
    Ok(world)
}

/// Systems for one frame, in dependency order.
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(apply_screen_resize);
    update.add_systems(curve_system);
    update.add_systems(animation_system);
    update.add_systems(tile_movement_system.after(curve_system));
    update.add_systems(
        tile_screen_system
            .after(tile_movement_system)
            .after(apply_screen_resize),
    );
    update
}

/// Fill the ground with grass, drop a rock in the walking lane and spawn a
/// hero that walks back and forth along `i`.
pub fn spawn_demo(world: &mut World) -> Entity {
    {
        let mut ground = world.resource_mut::<GroundMap>();
        let size = ground.size();
        ground.fill_layer(0, &Tile::new(TileKind::Open, "grass"));
        let rock = IVec3::new(size.x as i32 / 2, 0, 0);
        ground.set_tile(rock, Tile::new(TileKind::Collidable, "rock"));
        info!("Demo ground {} with a rock at {}", size, rock);
    }

    let lane_end = world.resource::<GroundMap>().size().x.saturating_sub(1) as f32;
    let mut walk = Curve::new()
        .with_points(vec![Keyframe::new(0.0, 0.0), Keyframe::new(lane_end, lane_end * 0.5)])
        .with_curve_type(CurveType::Linear)
        .with_ping_pong(true)
        .with_repeat(3);
    walk.start(true);

    let clip = AnimationData::new(
        vec![
            AnimationFrame::new(
                0,
                vec![AnimationEvent::SpriteChange {
                    sprite: "hero_walk_0".into(),
                }],
            ),
            AnimationFrame::new(
                3,
                vec![
                    AnimationEvent::SpriteChange {
                        sprite: "hero_walk_1".into(),
                    },
                    AnimationEvent::Callback {
                        name: "footstep".into(),
                    },
                ],
            ),
        ],
        12.0,
    )
    .with_looped(true);

    let hero = world
        .spawn((
            TileActor::new(0.0, 0.0, 0.0),
            walk,
            CurveTarget::TileI,
            Sprite::new("hero_idle", 32.0, 48.0),
            Rotation::default(),
            AnimationController::with_clip(clip),
            ScreenPosition::default(),
            ScreenDepth::default(),
        ))
        .id();

    world.spawn(Observer::new(|trigger: On<CurveFinishedEvent>| {
        info!("{:?} finished walking at i={}", trigger.event().entity, trigger.event().value);
    }));
    world.spawn(Observer::new(|trigger: On<AnimationCallbackEvent>| {
        log::debug!("{:?} animation callback {}", trigger.event().entity, trigger.event().name);
    }));
    world.spawn(Observer::new(|trigger: On<AnimationDoneEvent>| {
        info!("{:?} animation done", trigger.event().entity);
    }));
    world.flush();

    hero
}
