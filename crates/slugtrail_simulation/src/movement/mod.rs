//! MovementController — input direction × crawl speed → velocity
//!
//! Контроллер не читает moisture напрямую: скорость приходит только
//! из CrawlSpeed, который пишет moisture модель.
//!
//! Системы:
//! - read_player_input: InputSource хоста → CrawlInput (только player-driven слизни)
//! - apply_crawl_velocity: CrawlInput + CrawlSpeed → CrawlVelocity → MotionActuator
//! - integrate_crawl_velocity: headless интеграция velocity → Transform (без физики хоста)

use bevy::prelude::*;

use crate::components::{ControlMode, CrawlInput, CrawlSpeed, CrawlVelocity, Dead, Slug};
use crate::error::{Collaborator, SlugError};
use crate::host::{HostInput, HostMotion};
use crate::logger;

/// Нормализует input (ноль остаётся нулём) и масштабирует на speed
///
/// Input (x, y) → velocity (x, 0, y) в плоскости XZ.
pub fn compute_velocity(input: Vec2, speed: f32) -> Vec3 {
    let direction = input.normalize_or_zero();
    Vec3::new(direction.x, 0.0, direction.y) * speed.max(0.0)
}

/// Система: input игрока → CrawlInput
///
/// AIControlled слизни не трогаются (их CrawlInput пишет AI хоста).
pub fn read_player_input(
    input: Option<ResMut<HostInput>>,
    mut query: Query<(&ControlMode, &mut CrawlInput), (With<Slug>, Without<Dead>)>,
    mut warned: Local<bool>,
) {
    let Some(mut input) = input else {
        if !*warned {
            logger::log_warning(&format!(
                "Player input skipped: {}",
                SlugError::MissingCollaborator(Collaborator::InputSource)
            ));
            *warned = true;
        }
        return;
    };
    *warned = false;

    let mut player_driven = query
        .iter_mut()
        .filter(|(mode, _)| mode.is_player_driven())
        .peekable();

    // Не опрашиваем устройство, если управлять некем
    if player_driven.peek().is_none() {
        return;
    }

    let direction = input
        .0
        .directional_input()
        .clamp(Vec2::splat(-1.0), Vec2::splat(1.0));

    for (_, mut crawl_input) in player_driven {
        crawl_input.direction = direction;
    }
}

/// Система: velocity из input и скорости, отправка в motion actuator
///
/// Без actuator velocity всё равно считается (для trail emitter).
pub fn apply_crawl_velocity(
    mut motion: Option<ResMut<HostMotion>>,
    mut query: Query<(Entity, &CrawlInput, &CrawlSpeed, &mut CrawlVelocity), (With<Slug>, Without<Dead>)>,
    mut warned: Local<bool>,
) {
    if motion.is_some() {
        *warned = false;
    } else if !*warned {
        logger::log_warning(&format!(
            "Velocity not issued: {}",
            SlugError::MissingCollaborator(Collaborator::MotionActuator)
        ));
        *warned = true;
    }

    for (entity, input, speed, mut velocity) in query.iter_mut() {
        velocity.linear = compute_velocity(input.direction, speed.current);

        if let Some(motion) = motion.as_mut() {
            motion.0.set_velocity(entity, velocity.linear);
        }
    }
}

/// Система: position += velocity × dt (headless режим)
///
/// В движке позицию двигает физика хоста, эта система не регистрируется.
pub fn integrate_crawl_velocity(
    time: Res<Time>,
    mut query: Query<(&CrawlVelocity, &mut Transform), (With<Slug>, Without<Dead>)>,
) {
    let delta = time.delta_secs();

    for (velocity, mut transform) in query.iter_mut() {
        transform.translation += velocity.linear * delta;
    }
}
