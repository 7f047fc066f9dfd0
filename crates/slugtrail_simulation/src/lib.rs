//! SLUGTRAIL Simulation Core
//!
//! ECS-симуляция слизня на Bevy 0.16 (resource/state-update loop).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = влага, здоровье, скорость, след, lifecycle контроля
//! - Хост = физика, рендер, анимации, input, спавн/удаление объектов
//!   (узкие интерфейсы в `host`)
//!
//! Один тик = один прогон FixedUpdate:
//! EnvironmentSampler → MoistureModel → MovementController / TrailEmitter → LifecycleManager

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod components;
pub mod config;
pub mod environment;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod logger;
pub mod moisture;
pub mod movement;
pub mod presentation;
pub mod trail;

pub use components::*;
pub use config::SlugConfig;
pub use error::{Collaborator, ConfigError, SlugError};
pub use host::{
    AnimationParam, HeadlessHost, HostCall, InputScript, InputSource, LifecycleHooks,
    MotionActuator, Presentation, SurfacePatch, SurfaceQuery, TrailSpawner,
};
pub use lifecycle::{ControlHandedOff, LeaveHostRequested, PossessRequested, SlugDied};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter, LOGGER_LEVEL};
pub use trail::TrailDropped;

/// Шаг fixed timestep headless режима (60 Hz)
pub const HEADLESS_TICK: Duration = Duration::from_micros(16_667);

/// Главный plugin симуляции слизня
///
/// Порядок выполнения (FixedUpdate, `.chain()`):
/// 1. handle_possess_requests / handle_leave_host_requests — внешние запросы
/// 2. sample_terrain — что под слизнем
/// 3. update_moisture — moisture, speed, health
/// 4. read_player_input → apply_crawl_velocity — движение
/// 5. emit_trails — слизистый след
/// 6. sync_animation_params — параметры анимации хоста
/// 7. check_death → tick_leave_host_timers → despawn_after_timeout
pub struct SlugPlugin;

impl Plugin for SlugPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LeaveHostRequested>()
            .add_event::<PossessRequested>()
            .add_event::<SlugDied>()
            .add_event::<ControlHandedOff>()
            .add_event::<TrailDropped>();

        app.register_type::<Slug>()
            .register_type::<SlugConfig>()
            .register_type::<Moisture>()
            .register_type::<Health>()
            .register_type::<CrawlSpeed>()
            .register_type::<TerrainContact>()
            .register_type::<TrailEmitter>()
            .register_type::<ControlMode>();

        app.add_systems(
            FixedUpdate,
            (
                lifecycle::handle_possess_requests,
                lifecycle::handle_leave_host_requests,
                environment::sample_terrain,
                moisture::update_moisture,
                movement::read_player_input,
                movement::apply_crawl_velocity,
                trail::emit_trails,
                presentation::sync_animation_params,
                lifecycle::check_death,
                lifecycle::tick_leave_host_timers,
                lifecycle::despawn_after_timeout,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}

/// Headless интеграция velocity → Transform (когда физики хоста нет)
pub struct HeadlessMotionPlugin;

impl Plugin for HeadlessMotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            movement::integrate_crawl_velocity.after(movement::apply_crawl_velocity),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт headless Bevy App: MinimalPlugins + 60Hz FixedUpdate
///
/// Время двигается вручную (`HEADLESS_TICK` за `app.update()`),
/// поэтому прогон не зависит от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(HEADLESS_TICK))
        .insert_resource(TimeUpdateStrategy::ManualDuration(HEADLESS_TICK))
        .add_plugins((SlugPlugin, HeadlessMotionPlugin));

    app
}

/// Создаёт App для встраивания в движок с собственным тиком
///
/// Без MinimalPlugins: хост сам вызывает `step_simulation` раз в кадр.
pub fn create_embedded_app() -> App {
    let mut app = App::new();
    init_logger();
    app.init_resource::<Time>().add_plugins(SlugPlugin);

    app
}

/// Один тик симуляции на произвольный dt (fixed или variable rate)
///
/// First прогоняется ради event_update_system: события живут два тика,
/// потом очищаются (как в обычном `app.update()`).
pub fn step_simulation(app: &mut App, dt: Duration) {
    let world = app.world_mut();
    world.run_schedule(First);
    world.resource_mut::<Time>().advance_by(dt);
    world.run_schedule(FixedUpdate);
}

/// Snapshot компонентов для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
