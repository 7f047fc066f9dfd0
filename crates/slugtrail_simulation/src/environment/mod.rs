//! EnvironmentSampler — что под слизнем (moist / sunlit / neutral)
//!
//! Короткий raycast вниз через `SurfaceQuery` хоста. Read-only,
//! кроме перезаписи `TerrainContact` этого тика.

use bevy::prelude::*;

use crate::components::{Dead, Slug, TerrainClass, TerrainContact};
use crate::config::SlugConfig;
use crate::error::{Collaborator, SlugError};
use crate::host::{HostWorld, SurfaceQuery};
use crate::logger;

/// Классифицирует поверхность под позицией
///
/// Нет поверхности в пределах `max_distance` → Neutral.
pub fn sample(query: &dyn SurfaceQuery, position: Vec3, max_distance: f32) -> TerrainClass {
    query
        .probe_downward(position, max_distance)
        .map(|tag| TerrainClass::from_tag(&tag))
        .unwrap_or(TerrainClass::Neutral)
}

/// Система: обновить TerrainContact всех живых слизней
///
/// Без world query хоста сэмплинг пропускается (контакт остаётся прежним).
pub fn sample_terrain(
    world: Option<Res<HostWorld>>,
    mut query: Query<(&Transform, &SlugConfig, &mut TerrainContact), (With<Slug>, Without<Dead>)>,
    mut warned: Local<bool>,
) {
    let Some(world) = world else {
        if !*warned {
            logger::log_warning(&format!(
                "Terrain sampling skipped: {}",
                SlugError::MissingCollaborator(Collaborator::WorldQuery)
            ));
            *warned = true;
        }
        return;
    };
    *warned = false;

    for (transform, config, mut contact) in query.iter_mut() {
        let class = sample(world.0.as_ref(), transform.translation, config.probe_distance);
        *contact = TerrainContact::from_class(class);
    }
}
