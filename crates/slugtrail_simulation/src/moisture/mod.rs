//! Moisture domain — ресурсная модель слизня
//!
//! - model: чистая функция шага (moisture, speed, health)
//! - update_moisture: система FixedUpdate, применяет модель ко всем живым слизням

use bevy::prelude::*;

use crate::components::{CrawlSpeed, Dead, Health, Moisture, Slug, TerrainContact};
use crate::config::SlugConfig;

pub mod model;


pub use model::{depletion_multiplier, derive_speed, sync_maxima, update, MoistureTick};

/// Система: шаг moisture модели
///
/// Читает TerrainContact этого тика (sample_terrain уже отработал).
pub fn update_moisture(
    time: Res<Time>,
    mut query: Query<
        (
            &SlugConfig,
            &TerrainContact,
            &mut Moisture,
            &mut CrawlSpeed,
            &mut Health,
        ),
        (With<Slug>, Without<Dead>),
    >,
) {
    let delta = time.delta_secs();

    for (config, terrain, mut moisture, mut speed, mut health) in query.iter_mut() {
        model::update(&mut moisture, &mut speed, &mut health, *terrain, delta, config);
    }
}
