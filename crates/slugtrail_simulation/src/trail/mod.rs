//! TrailEmitter — слизистый след, пока слизень движется
//!
//! Раз в `trail_interval` секунд движения (|velocity| > trail_min_speed):
//! - списать `trail_cost` влаги (clamp как в moisture модели), пересчитать скорость
//! - попросить хоста заспавнить маркер с `trail_lifetime`
//!
//! Период считается accumulator'ом (TrailEmitter::advance), не modulo от времени.

use bevy::prelude::*;

use crate::components::{CrawlSpeed, CrawlVelocity, Dead, Moisture, Slug, TrailEmitter};
use crate::config::SlugConfig;
use crate::error::{Collaborator, SlugError};
use crate::host::HostTrails;
use crate::logger;
use crate::moisture::derive_speed;

/// Событие: след оставлен
#[derive(Event, Debug, Clone)]
pub struct TrailDropped {
    pub agent: Entity,
    pub position: Vec3,
}

/// Система: оставить след, если пора
///
/// Без trail spawner хоста эмиссия пропускается целиком (влага не списывается).
pub fn emit_trails(
    time: Res<Time>,
    trails: Option<ResMut<HostTrails>>,
    mut dropped: EventWriter<TrailDropped>,
    mut query: Query<
        (
            Entity,
            &Transform,
            &CrawlVelocity,
            &SlugConfig,
            &mut TrailEmitter,
            &mut Moisture,
            &mut CrawlSpeed,
        ),
        (With<Slug>, Without<Dead>),
    >,
    mut warned: Local<bool>,
) {
    let Some(mut trails) = trails else {
        if !*warned {
            logger::log_warning(&format!(
                "Trail emission skipped: {}",
                SlugError::MissingCollaborator(Collaborator::TrailSpawner)
            ));
            *warned = true;
        }
        return;
    };
    *warned = false;

    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (entity, transform, velocity, config, mut emitter, mut moisture, mut speed) in query.iter_mut() {
        let fire = emitter.advance(
            velocity.magnitude(),
            config.trail_min_speed,
            delta,
            config.trail_interval,
        );
        if !fire {
            continue;
        }

        moisture.adjust(-config.trail_cost);
        derive_speed(&mut speed, &moisture);
        emitter.record_emit(now);

        let position = transform.translation;
        trails.0.spawn_trail_marker(position, config.trail_lifetime);
        dropped.write(TrailDropped { agent: entity, position });
    }
}
