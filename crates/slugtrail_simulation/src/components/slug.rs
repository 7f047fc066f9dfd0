//! Slug — агент симуляции

use bevy::prelude::*;

use crate::config::SlugConfig;
use crate::error::SlugError;
use crate::logger;

use super::{
    ControlBindings, ControlMode, CrawlInput, CrawlSpeed, CrawlVelocity, Health, Moisture,
    TerrainContact, TrailEmitter,
};

/// Слизень (один агент = одно entity)
///
/// Required Components добавляют всё состояние агента. Максимумы
/// moisture/speed/health берутся из SlugConfig на каждом шаге модели,
/// `spawn_slug` дополнительно стартует с полных значений.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    SlugConfig,
    Moisture,
    Health,
    CrawlSpeed,
    TerrainContact,
    CrawlInput,
    CrawlVelocity,
    TrailEmitter,
    ControlMode,
    ControlBindings,
    Transform
)]
pub struct Slug;

/// Spawn helper: слизень с полными moisture/health/speed из конфига
///
/// Невалидный конфиг → `SlugError::Config`, entity не создаётся.
pub fn spawn_slug(
    commands: &mut Commands,
    position: Vec3,
    config: SlugConfig,
    bindings: ControlBindings,
) -> Result<Entity, SlugError> {
    if let Err(err) = config.validate() {
        let err = SlugError::from(err);
        err.report("Slug spawn rejected");
        return Err(err);
    }

    let entity = commands
        .spawn((
            Slug,
            Transform::from_translation(position),
            Moisture::new(config.max_moisture),
            Health::new(config.max_health),
            CrawlSpeed::new(config.max_speed),
            ControlMode::PlayerControlled,
            bindings,
            config,
        ))
        .id();

    logger::log_info(&format!("Slug {:?} spawned at {:?}", entity, position));

    Ok(entity)
}
