//! Slug integration test
//!
//! Embedded App + HeadlessHost, тик двигается вручную через step_simulation.
//!
//! Проверяем:
//! - moisture/speed/health сценарии в полном schedule
//! - смерть ровно один раз, дальше апдейтов нет
//! - leave host → AIControlled через 1.0s, порядок вызовов хоста
//! - possession отменяет pending передачу
//! - след только при движении, стоимость списывается один раз на след
//! - отсутствие collaborator не роняет симуляцию

use std::time::Duration;

use bevy::prelude::*;
use slugtrail_simulation::*;

const PLAYER: ControllerHandle = ControllerHandle(10);
const AI: ControllerHandle = ControllerHandle(20);

fn ground(tag: SurfaceTag) -> Vec<SurfacePatch> {
    vec![SurfacePatch::new(
        Vec2::splat(-100.0),
        Vec2::splat(100.0),
        0.0,
        tag,
    )]
}

/// Helper: App + хост с одной поверхностью на весь мир
fn create_slug_app(tag: SurfaceTag, input: InputScript) -> (App, HeadlessHost) {
    let mut app = create_embedded_app();
    let host = HeadlessHost::new().with_surfaces(ground(tag)).with_input(input);
    host.install(app.world_mut());
    (app, host)
}

fn spawn(app: &mut App, config: SlugConfig, bindings: ControlBindings) -> Entity {
    let entity = spawn_slug(
        &mut app.world_mut().commands(),
        Vec3::new(0.0, 0.05, 0.0),
        config,
        bindings,
    )
    .expect("valid config");
    app.world_mut().flush();
    entity
}

fn spawn_default(app: &mut App) -> Entity {
    spawn(app, SlugConfig::default(), ControlBindings::new(PLAYER, AI))
}

fn step(app: &mut App, secs: f32) {
    step_simulation(app, Duration::from_secs_f32(secs));
}

fn step_n(app: &mut App, millis: u64, count: usize) {
    for _ in 0..count {
        step_simulation(app, Duration::from_millis(millis));
    }
}

fn mode(app: &App, slug: Entity) -> ControlMode {
    *app.world().get::<ControlMode>(slug).expect("slug exists")
}

fn control_calls(host: &HeadlessHost) -> Vec<HostCall> {
    host.calls()
        .into_iter()
        .filter(|call| matches!(call, HostCall::PlayerControl { .. } | HostCall::AiControl { .. }))
        .collect()
}

#[test]
fn test_spawn_starts_full() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let slug = spawn_default(&mut app);

    let world = app.world();
    assert_eq!(world.get::<Moisture>(slug).unwrap().current, 100.0);
    assert_eq!(world.get::<Health>(slug).unwrap().current, 100.0);
    assert_eq!(world.get::<CrawlSpeed>(slug).unwrap().current, 0.5);
    assert_eq!(mode(&app, slug), ControlMode::PlayerControlled);
}

#[test]
fn test_spawn_rejects_invalid_config() {
    let mut app = create_embedded_app();
    let config = SlugConfig {
        max_speed: -1.0,
        ..default()
    };

    let result = spawn_slug(
        &mut app.world_mut().commands(),
        Vec3::ZERO,
        config,
        ControlBindings::default(),
    );

    assert!(matches!(result, Err(SlugError::Config(_))));
}

#[test]
fn test_neutral_ground_one_second() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let slug = spawn_default(&mut app);

    step(&mut app, 1.0);

    let world = app.world();
    assert_eq!(*world.get::<TerrainContact>(slug).unwrap(), TerrainContact::NEUTRAL);
    assert_eq!(world.get::<Moisture>(slug).unwrap().current, 97.0);
    let speed = world.get::<CrawlSpeed>(slug).unwrap().current;
    assert!((speed - 0.485).abs() < 1e-6, "speed = {}", speed);
}

#[test]
fn test_sunlight_zone_one_second() {
    let (mut app, _host) = create_slug_app(SurfaceTag::SunlightZone, InputScript::Idle);
    let slug = spawn_default(&mut app);

    step(&mut app, 1.0);

    let world = app.world();
    assert!(world.get::<TerrainContact>(slug).unwrap().is_sunlit);
    assert_eq!(world.get::<Moisture>(slug).unwrap().current, 91.0);
}

#[test]
fn test_water_refills_moisture() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Water, InputScript::Idle);
    let slug = spawn_default(&mut app);
    app.world_mut().get_mut::<Moisture>(slug).unwrap().current = 20.0;

    step(&mut app, 2.0);

    assert_eq!(app.world().get::<Moisture>(slug).unwrap().current, 30.0);
}

#[test]
fn test_dry_slug_loses_health() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let slug = spawn_default(&mut app);
    app.world_mut().get_mut::<Moisture>(slug).unwrap().current = 0.0;

    step(&mut app, 2.0);

    assert_eq!(app.world().get::<Health>(slug).unwrap().current, 90.0);
    assert_eq!(app.world().get::<CrawlSpeed>(slug).unwrap().current, 0.0);
}

#[test]
fn test_death_fires_exactly_once() {
    let (mut app, host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let config = SlugConfig {
        corpse_linger: 60.0,
        ..default()
    };
    let slug = spawn(&mut app, config, ControlBindings::new(PLAYER, AI));
    {
        let world = app.world_mut();
        world.get_mut::<Moisture>(slug).unwrap().current = 0.0;
        world.get_mut::<Health>(slug).unwrap().current = 10.0;
    }

    // 5 hp/sec × 2 sec = ровно 10
    step(&mut app, 2.0);

    assert_eq!(app.world().get::<Health>(slug).unwrap().current, 0.0);
    assert_eq!(mode(&app, slug), ControlMode::Dead);
    assert!(app.world().get::<Dead>(slug).is_some());
    assert_eq!(app.world().resource::<Events<SlugDied>>().len(), 1);

    // Труп больше не обновляется
    step_n(&mut app, 100, 30);

    assert_eq!(app.world().get::<Moisture>(slug).unwrap().current, 0.0);
    assert_eq!(app.world().get::<Health>(slug).unwrap().current, 0.0);
    assert_eq!(mode(&app, slug), ControlMode::Dead);
    assert_eq!(
        host.count_calls(|call| matches!(call, HostCall::HostDied { agent } if *agent == slug)),
        1
    );
}

#[test]
fn test_corpse_is_removed() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let config = SlugConfig {
        corpse_linger: 0.5,
        ..default()
    };
    let slug = spawn(&mut app, config, ControlBindings::new(PLAYER, AI));
    app.world_mut().get_mut::<Health>(slug).unwrap().current = 0.0;

    step_n(&mut app, 100, 1);
    assert!(app.world().get_entity(slug).is_ok());

    step_n(&mut app, 100, 10);
    assert!(app.world().get_entity(slug).is_err());
}

#[test]
fn test_leave_host_hands_off_after_one_second() {
    let (mut app, host) = create_slug_app(SurfaceTag::Water, InputScript::Idle);
    let slug = spawn_default(&mut app);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });

    step_n(&mut app, 100, 9);
    assert_eq!(mode(&app, slug), ControlMode::ReturningToAI);
    assert!(control_calls(&host).is_empty());

    step_n(&mut app, 100, 1);
    assert_eq!(mode(&app, slug), ControlMode::AIControlled);
    assert!(app.world().get::<LeaveHostTimer>(slug).is_none());

    // Player off, потом AI on — ровно один раз
    step_n(&mut app, 100, 20);
    assert_eq!(
        control_calls(&host),
        vec![
            HostCall::PlayerControl {
                agent: slug,
                controller: PLAYER,
                enabled: false
            },
            HostCall::AiControl {
                agent: slug,
                controller: AI,
                enabled: true
            },
        ]
    );
    assert_eq!(
        host.count_calls(|call| matches!(call, HostCall::LeaveHostCue { .. })),
        1
    );
}

#[test]
fn test_possess_cancels_pending_handoff() {
    let (mut app, host) = create_slug_app(SurfaceTag::Water, InputScript::Idle);
    let slug = spawn_default(&mut app);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 5);
    assert_eq!(mode(&app, slug), ControlMode::ReturningToAI);

    app.world_mut().send_event(PossessRequested { agent: slug });
    step_n(&mut app, 100, 20);

    assert_eq!(mode(&app, slug), ControlMode::PlayerControlled);
    assert!(app.world().get::<LeaveHostTimer>(slug).is_none());
    assert!(control_calls(&host).is_empty());
}

#[test]
fn test_possess_from_ai_restores_player() {
    let (mut app, host) = create_slug_app(SurfaceTag::Water, InputScript::Idle);
    let slug = spawn_default(&mut app);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 10);
    assert_eq!(mode(&app, slug), ControlMode::AIControlled);
    host.clear_calls();

    app.world_mut().send_event(PossessRequested { agent: slug });
    step_n(&mut app, 100, 1);

    assert_eq!(mode(&app, slug), ControlMode::PlayerControlled);
    assert_eq!(
        control_calls(&host),
        vec![
            HostCall::AiControl {
                agent: slug,
                controller: AI,
                enabled: false
            },
            HostCall::PlayerControl {
                agent: slug,
                controller: PLAYER,
                enabled: true
            },
        ]
    );
}

#[test]
fn test_leave_host_on_dead_slug_is_noop() {
    let (mut app, host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let config = SlugConfig {
        corpse_linger: 60.0,
        ..default()
    };
    let slug = spawn(&mut app, config, ControlBindings::new(PLAYER, AI));
    app.world_mut().get_mut::<Health>(slug).unwrap().current = 0.0;
    step_n(&mut app, 100, 1);
    assert_eq!(mode(&app, slug), ControlMode::Dead);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 15);

    assert_eq!(mode(&app, slug), ControlMode::Dead);
    assert!(app.world().get::<LeaveHostTimer>(slug).is_none());
    assert_eq!(
        host.count_calls(|call| matches!(call, HostCall::LeaveHostCue { .. })),
        0
    );
    assert!(control_calls(&host).is_empty());
}

#[test]
fn test_death_cancels_pending_handoff() {
    let (mut app, host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let config = SlugConfig {
        corpse_linger: 60.0,
        ..default()
    };
    let slug = spawn(&mut app, config, ControlBindings::new(PLAYER, AI));

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 3);
    app.world_mut().get_mut::<Health>(slug).unwrap().current = 0.0;
    step_n(&mut app, 100, 20);

    assert_eq!(mode(&app, slug), ControlMode::Dead);
    assert!(app.world().get::<LeaveHostTimer>(slug).is_none());
    assert!(control_calls(&host).is_empty());
}

#[test]
fn test_missing_ai_controller_keeps_returning() {
    let (mut app, host) = create_slug_app(SurfaceTag::Water, InputScript::Idle);
    let bindings = ControlBindings {
        player_controller: Some(PLAYER),
        ai_controller: None,
    };
    let slug = spawn(&mut app, SlugConfig::default(), bindings);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 30);

    // Передача не состоялась, но симуляция живёт
    assert_eq!(mode(&app, slug), ControlMode::ReturningToAI);
    assert!(control_calls(&host).is_empty());
    assert_eq!(app.world().get::<Moisture>(slug).unwrap().current, 100.0);

    // Возврат игроку всё ещё возможен
    app.world_mut().send_event(PossessRequested { agent: slug });
    step_n(&mut app, 100, 1);
    assert_eq!(mode(&app, slug), ControlMode::PlayerControlled);
}

#[test]
fn test_trail_while_moving() {
    let (mut app, host) = create_slug_app(
        SurfaceTag::Other("Rock".into()),
        InputScript::Fixed(Vec2::new(0.0, 1.0)),
    );
    let slug = spawn_default(&mut app);

    // 1 секунда по 0.125 → следы на 0.5 и 1.0
    step_n(&mut app, 125, 8);

    let trails = host.count_calls(|call| {
        matches!(call, HostCall::SpawnTrail { lifetime, .. } if *lifetime == 5.0)
    });
    assert_eq!(trails, 2);

    let emitter = app.world().get::<TrailEmitter>(slug).unwrap();
    assert_eq!(emitter.emitted, 2);
    assert_eq!(emitter.last_emit_time, 1.0);

    // 100 - 3 × 1 - 2 × 0.1
    let moisture = app.world().get::<Moisture>(slug).unwrap().current;
    assert!((moisture - 96.8).abs() < 1e-3, "moisture = {}", moisture);
}

#[test]
fn test_no_trail_while_idle() {
    let (mut app, host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let slug = spawn_default(&mut app);

    step_n(&mut app, 125, 40);

    assert_eq!(
        host.count_calls(|call| matches!(call, HostCall::SpawnTrail { .. })),
        0
    );
    assert_eq!(app.world().get::<TrailEmitter>(slug).unwrap().emitted, 0);
    assert_eq!(app.world().get::<Moisture>(slug).unwrap().current, 85.0);
}

#[test]
fn test_dry_slug_cannot_move_or_trail() {
    let (mut app, host) = create_slug_app(
        SurfaceTag::Other("Rock".into()),
        InputScript::Fixed(Vec2::new(1.0, 0.0)),
    );
    let slug = spawn_default(&mut app);
    app.world_mut().get_mut::<Moisture>(slug).unwrap().current = 0.0;

    step_n(&mut app, 125, 8);

    assert_eq!(app.world().get::<CrawlVelocity>(slug).unwrap().linear, Vec3::ZERO);
    assert_eq!(
        host.count_calls(|call| matches!(call, HostCall::SpawnTrail { .. })),
        0
    );
}

#[test]
fn test_velocity_issued_to_host() {
    let (mut app, host) = create_slug_app(SurfaceTag::Water, InputScript::Fixed(Vec2::new(1.0, 1.0)));
    let slug = spawn_default(&mut app);

    step_n(&mut app, 100, 1);

    let issued: Vec<Vec3> = host
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            HostCall::SetVelocity { agent, velocity } if agent == slug => Some(velocity),
            _ => None,
        })
        .collect();

    assert_eq!(issued.len(), 1);
    assert!((issued[0].length() - 0.5).abs() < 1e-5, "|v| = {}", issued[0].length());
}

#[test]
fn test_animation_params_published() {
    let (mut app, host) = create_slug_app(SurfaceTag::SunlightZone, InputScript::Idle);
    spawn_default(&mut app);

    step(&mut app, 1.0);

    let params: Vec<AnimationParam> = host
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            HostCall::AnimationParam { param, .. } => Some(param),
            _ => None,
        })
        .collect();

    assert_eq!(params.len(), 3);
    assert_eq!(params[0], AnimationParam::Speed(0.0));
    assert_eq!(params[1], AnimationParam::Moisture(0.91));
    assert_eq!(params[2], AnimationParam::IsDrying(true));
}

#[test]
fn test_ai_controlled_slug_ignores_player_input() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Water, InputScript::Fixed(Vec2::new(1.0, 0.0)));
    let slug = spawn_default(&mut app);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 10);
    assert_eq!(mode(&app, slug), ControlMode::AIControlled);

    // AI хоста пишет свой input
    app.world_mut().get_mut::<CrawlInput>(slug).unwrap().direction = Vec2::new(0.0, -1.0);
    step_n(&mut app, 100, 3);

    assert_eq!(
        app.world().get::<CrawlInput>(slug).unwrap().direction,
        Vec2::new(0.0, -1.0)
    );
}

#[test]
fn test_runs_without_any_host() {
    let mut app = create_embedded_app();
    let slug = spawn_default(&mut app);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 20);

    // Без world query контакт остаётся нейтральным, влага убывает
    let moisture = app.world().get::<Moisture>(slug).unwrap().current;
    assert!((moisture - 94.0).abs() < 1e-3, "moisture = {}", moisture);
    assert_eq!(mode(&app, slug), ControlMode::ReturningToAI);
}

#[test]
fn test_slug_marker_takes_maxima_from_config() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Water, InputScript::Idle);
    let config = SlugConfig {
        max_moisture: 20.0,
        max_speed: 2.0,
        max_health: 10.0,
        ..default()
    };
    // Спавн через required components, без spawn_slug
    let slug = app
        .world_mut()
        .spawn((Slug, config, Transform::from_xyz(0.0, 0.05, 0.0)))
        .id();

    step(&mut app, 1.0);

    let world = app.world();
    assert_eq!(*world.get::<Moisture>(slug).unwrap(), Moisture { current: 20.0, max: 20.0 });
    assert_eq!(*world.get::<CrawlSpeed>(slug).unwrap(), CrawlSpeed { current: 2.0, max: 2.0 });
    assert_eq!(*world.get::<Health>(slug).unwrap(), Health { current: 10.0, max: 10.0 });
}

#[test]
fn test_trail_cost_updates_speed_same_tick() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Water, InputScript::Fixed(Vec2::Y));
    let config = SlugConfig {
        trail_cost: 10.0,
        ..default()
    };
    let slug = spawn(&mut app, config, ControlBindings::new(PLAYER, AI));

    // След на 0.5s, влага 100 → 90 после стоимости
    step_n(&mut app, 125, 4);

    let world = app.world();
    assert_eq!(world.get::<TrailEmitter>(slug).unwrap().emitted, 1);
    assert_eq!(world.get::<Moisture>(slug).unwrap().current, 90.0);
    let speed = world.get::<CrawlSpeed>(slug).unwrap().current;
    assert!((speed - 0.45).abs() < 1e-6, "speed = {}", speed);
}

#[test]
fn test_step_simulation_clears_old_events() {
    let (mut app, _host) = create_slug_app(SurfaceTag::Other("Rock".into()), InputScript::Idle);
    let config = SlugConfig {
        corpse_linger: 60.0,
        ..default()
    };
    let slug = spawn(&mut app, config, ControlBindings::new(PLAYER, AI));
    app.world_mut().get_mut::<Health>(slug).unwrap().current = 0.0;

    step_n(&mut app, 100, 1);
    assert_eq!(app.world().resource::<Events<SlugDied>>().len(), 1);

    // Двойной буфер: событие живёт ещё один тик
    step_n(&mut app, 100, 1);
    assert_eq!(app.world().resource::<Events<SlugDied>>().len(), 1);

    step_n(&mut app, 100, 1);
    assert!(app.world().resource::<Events<SlugDied>>().is_empty());
}

#[test]
fn test_leave_host_while_ai_controlled_is_noop() {
    let (mut app, host) = create_slug_app(SurfaceTag::Water, InputScript::Idle);
    let slug = spawn_default(&mut app);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 10);
    assert_eq!(mode(&app, slug), ControlMode::AIControlled);

    app.world_mut().send_event(LeaveHostRequested { agent: slug });
    step_n(&mut app, 100, 15);

    assert_eq!(mode(&app, slug), ControlMode::AIControlled);
    assert!(app.world().get::<LeaveHostTimer>(slug).is_none());
    assert_eq!(
        host.count_calls(|call| matches!(call, HostCall::LeaveHostCue { .. })),
        1
    );
    // Только исходная передача: player off, AI on
    assert_eq!(control_calls(&host).len(), 2);
}
