//! Headless симуляция SLUGTRAIL
//!
//! Один слизень ползает по полосам moist / neutral / sunlit поверхностей
//! со случайным (seeded) input, через 20 секунд уходит из носителя к AI.

use bevy::prelude::*;
use rand::Rng;
use slugtrail_simulation::{
    create_headless_app, log_info, spawn_slug, ControlBindings, ControlMode, ControllerHandle,
    CrawlSpeed, DeterministicRng, HeadlessHost, Health, HostCall, InputScript, LeaveHostRequested,
    Moisture, SlugConfig, SurfacePatch, SurfaceTag,
};

const TICKS: usize = 3600;
const LEAVE_HOST_TICK: usize = 1200;

fn striped_terrain() -> Vec<SurfacePatch> {
    // Полосы по X шириной 4m: Water, Rock, SunlightZone, повторяются
    let tags = [
        SurfaceTag::Water,
        SurfaceTag::Other("Rock".to_string()),
        SurfaceTag::SunlightZone,
    ];

    (-6i32..6)
        .map(|stripe| {
            let min_x = stripe as f32 * 4.0;
            SurfacePatch::new(
                Vec2::new(min_x, -50.0),
                Vec2::new(min_x + 4.0, 50.0),
                0.0,
                tags[stripe.rem_euclid(3) as usize].clone(),
            )
        })
        .collect()
}

fn main() {
    let seed = 42;
    println!("Starting SLUGTRAIL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let (input_seed, start_x) = {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        (rng.rng.gen::<u64>(), rng.rng.gen_range(-4.0..4.0))
    };

    let host = HeadlessHost::new()
        .with_surfaces(striped_terrain())
        .with_input(InputScript::wander(input_seed, 90));
    host.install(app.world_mut());

    let slug = match spawn_slug(
        &mut app.world_mut().commands(),
        Vec3::new(start_x, 0.05, 0.0),
        SlugConfig::default(),
        ControlBindings::new(ControllerHandle(1), ControllerHandle(2)),
    ) {
        Ok(entity) => entity,
        Err(err) => {
            eprintln!("Failed to spawn slug: {}", err);
            return;
        }
    };
    app.world_mut().flush();

    for tick in 0..TICKS {
        if tick == LEAVE_HOST_TICK {
            app.world_mut().send_event(LeaveHostRequested { agent: slug });
        }

        app.update();

        if tick % 300 == 0 {
            let world = app.world();
            let Some(moisture) = world.get::<Moisture>(slug) else {
                println!("Tick {}: slug removed", tick);
                break;
            };
            let health = world.get::<Health>(slug).map(|h| h.current).unwrap_or(0.0);
            let speed = world.get::<CrawlSpeed>(slug).map(|s| s.current).unwrap_or(0.0);
            let mode = world.get::<ControlMode>(slug).copied().unwrap_or(ControlMode::Dead);
            let position = world
                .get::<Transform>(slug)
                .map(|t| t.translation)
                .unwrap_or(Vec3::ZERO);

            println!(
                "Tick {}: moisture {:.1}, health {:.1}, speed {:.3}, {:?} at ({:.2}, {:.2})",
                tick, moisture.current, health, speed, mode, position.x, position.z
            );
        }
    }

    let trails = host.count_calls(|call| matches!(call, HostCall::SpawnTrail { .. }));
    let deaths = host.count_calls(|call| matches!(call, HostCall::HostDied { .. }));
    log_info(&format!("Trail markers spawned: {}, host deaths: {}", trails, deaths));

    println!("Simulation complete!");
}
