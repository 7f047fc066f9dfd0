//! Lifecycle systems: смерть, leave host, possession, despawn трупов

use bevy::prelude::*;

use super::events::{ControlHandedOff, LeaveHostRequested, PossessRequested, SlugDied};
use crate::components::{
    ControlBindings, ControlMode, CrawlVelocity, Dead, DespawnAfter, Health, LeaveHostTimer, Slug,
};
use crate::config::SlugConfig;
use crate::error::{Collaborator, SlugError};
use crate::host::{HostLifecycle, HostMotion, HostPresentation};
use crate::logger;

/// Переключает контроль хоста между player и AI
///
/// Все lookups (hooks, оба controller handle) проверяются до первого вызова,
/// поэтому при ошибке хост не остаётся в половинчатом состоянии.
/// Порядок вызовов: сначала отключаем старого владельца, потом включаем нового.
pub fn swap_control(
    agent: Entity,
    bindings: &ControlBindings,
    hooks: Option<&mut HostLifecycle>,
    target: ControlMode,
) -> Result<(), SlugError> {
    let hooks = hooks.ok_or(SlugError::MissingCollaborator(Collaborator::LifecycleHooks))?;
    let player = bindings
        .player_controller
        .ok_or(SlugError::MissingCollaborator(Collaborator::PlayerController))?;
    let ai = bindings
        .ai_controller
        .ok_or(SlugError::MissingCollaborator(Collaborator::AiController))?;

    match target {
        ControlMode::AIControlled => {
            hooks.0.enable_player_control(agent, player, false);
            hooks.0.enable_ai_control(agent, ai, true);
        }
        ControlMode::PlayerControlled => {
            hooks.0.enable_ai_control(agent, ai, false);
            hooks.0.enable_player_control(agent, player, true);
        }
        ControlMode::ReturningToAI | ControlMode::Dead => {
            return Err(SlugError::InvalidTarget { agent, target });
        }
    }

    Ok(())
}

/// Система: PossessRequested → вернуть контроль игроку
///
/// - ReturningToAI: отменяем LeaveHostTimer (хост ещё не переключался)
/// - AIControlled: AI off → player on
/// - Dead: InvalidState, no-op
pub fn handle_possess_requests(
    mut commands: Commands,
    mut requests: EventReader<PossessRequested>,
    mut lifecycle: Option<ResMut<HostLifecycle>>,
    mut query: Query<(&mut ControlMode, &ControlBindings), With<Slug>>,
    mut handed_off: EventWriter<ControlHandedOff>,
) {
    for request in requests.read() {
        let agent = request.agent;

        let Ok((mut mode, bindings)) = query.get_mut(agent) else {
            SlugError::UnknownAgent(agent).report("Possess ignored");
            continue;
        };

        let result = match *mode {
            ControlMode::PlayerControlled => {
                logger::log(&format!("Slug {:?} already player controlled", agent));
                continue;
            }
            ControlMode::ReturningToAI => {
                commands.entity(agent).remove::<LeaveHostTimer>();
                Ok(())
            }
            ControlMode::AIControlled => swap_control(
                agent,
                bindings,
                lifecycle.as_deref_mut(),
                ControlMode::PlayerControlled,
            ),
            ControlMode::Dead => Err(SlugError::InvalidState {
                agent,
                from: ControlMode::Dead,
                action: "be possessed",
            }),
        };

        match result {
            Ok(()) => {
                logger::log_info(&format!("Slug {:?} possessed ({:?} → PlayerControlled)", agent, *mode));
                *mode = ControlMode::PlayerControlled;
                handed_off.write(ControlHandedOff {
                    agent,
                    mode: ControlMode::PlayerControlled,
                });
            }
            Err(err) => err.report("Possess failed"),
        }
    }
}

/// Система: LeaveHostRequested → cue + ReturningToAI + отложенный таймер
pub fn handle_leave_host_requests(
    mut commands: Commands,
    mut requests: EventReader<LeaveHostRequested>,
    mut presentation: Option<ResMut<HostPresentation>>,
    mut query: Query<(&mut ControlMode, &SlugConfig), With<Slug>>,
) {
    for request in requests.read() {
        let agent = request.agent;

        let Ok((mut mode, config)) = query.get_mut(agent) else {
            SlugError::UnknownAgent(agent).report("Leave host ignored");
            continue;
        };

        match *mode {
            ControlMode::PlayerControlled => {}
            ControlMode::ReturningToAI => {
                logger::log(&format!("Slug {:?} already leaving host", agent));
                continue;
            }
            from @ (ControlMode::AIControlled | ControlMode::Dead) => {
                SlugError::InvalidState {
                    agent,
                    from,
                    action: "leave host",
                }
                .report("Leave host ignored");
                continue;
            }
        }

        // Cue чисто визуальный: без presentation передача всё равно идёт
        match presentation.as_mut() {
            Some(presentation) => presentation.0.trigger_leave_host(agent),
            None => SlugError::MissingCollaborator(Collaborator::Presentation)
                .report("Leave host cue skipped"),
        }

        *mode = ControlMode::ReturningToAI;
        commands
            .entity(agent)
            .insert(LeaveHostTimer::new(config.leave_host_delay));

        logger::log_info(&format!(
            "Slug {:?} leaving host, AI takes over in {:.2}s",
            agent, config.leave_host_delay
        ));
    }
}

/// Система: тикаем LeaveHostTimer, по истечении — player off, AI on
///
/// Ошибка передачи (нет hooks/контроллера) логируется один раз,
/// слизень остаётся в ReturningToAI и попытка повторяется каждый тик.
pub fn tick_leave_host_timers(
    mut commands: Commands,
    time: Res<Time>,
    mut lifecycle: Option<ResMut<HostLifecycle>>,
    mut query: Query<
        (Entity, &mut ControlMode, &ControlBindings, &mut LeaveHostTimer),
        (With<Slug>, Without<Dead>),
    >,
    mut handed_off: EventWriter<ControlHandedOff>,
) {
    for (agent, mut mode, bindings, mut pending) in query.iter_mut() {
        if *mode != ControlMode::ReturningToAI {
            // Умер или перехвачен на этом тике
            commands.entity(agent).remove::<LeaveHostTimer>();
            continue;
        }

        pending.timer.tick(time.delta());
        if !pending.timer.finished() {
            continue;
        }

        let result = swap_control(
            agent,
            bindings,
            lifecycle.as_deref_mut(),
            ControlMode::AIControlled,
        );

        match result {
            Ok(()) => {
                *mode = ControlMode::AIControlled;
                commands.entity(agent).remove::<LeaveHostTimer>();
                handed_off.write(ControlHandedOff {
                    agent,
                    mode: ControlMode::AIControlled,
                });
                logger::log_info(&format!("Slug {:?} handed off to AI", agent));
            }
            Err(err) => {
                if !pending.failure_reported {
                    err.report("Handoff to AI failed");
                    pending.failure_reported = true;
                }
            }
        }
    }
}

/// Система: health == 0 → Dead (терминально, ровно один раз)
///
/// 1. notify_host_died хоста
/// 2. ControlMode::Dead + маркер Dead (дальше все системы пропускают entity)
/// 3. velocity обнуляется, pending передача отменяется
/// 4. DespawnAfter — запрос удаления агента
pub fn check_death(
    mut commands: Commands,
    mut lifecycle: Option<ResMut<HostLifecycle>>,
    mut motion: Option<ResMut<HostMotion>>,
    mut query: Query<
        (Entity, &Health, &SlugConfig, &mut ControlMode, &mut CrawlVelocity),
        (With<Slug>, Without<Dead>),
    >,
    mut died: EventWriter<SlugDied>,
) {
    for (agent, health, config, mut mode, mut velocity) in query.iter_mut() {
        if health.is_alive() {
            continue;
        }

        match lifecycle.as_mut() {
            Some(hooks) => hooks.0.notify_host_died(agent),
            None => SlugError::MissingCollaborator(Collaborator::LifecycleHooks)
                .report("Death notification skipped"),
        }

        *mode = ControlMode::Dead;
        velocity.linear = Vec3::ZERO;
        if let Some(motion) = motion.as_mut() {
            motion.0.set_velocity(agent, Vec3::ZERO);
        }

        commands
            .entity(agent)
            .remove::<LeaveHostTimer>()
            .insert((Dead, DespawnAfter::new(config.corpse_linger)));

        died.write(SlugDied { agent });
        logger::log_info(&format!("Slug {:?} dried out and died", agent));
    }
}

/// Система: despawn трупов по истечении DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DespawnAfter), With<Dead>>,
) {
    for (entity, mut despawn) in query.iter_mut() {
        despawn.timer.tick(time.delta());
        if despawn.timer.finished() {
            commands.entity(entity).despawn();
            logger::log(&format!("Slug {:?} removed", entity));
        }
    }
}
