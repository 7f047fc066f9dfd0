//! Presentation sync — параметры анимации для хоста
//!
//! Каждый тик: Speed, Moisture (доля 0..1), IsDrying.

use bevy::prelude::*;

use crate::components::{CrawlVelocity, Dead, Moisture, Slug, TerrainContact};
use crate::error::{Collaborator, SlugError};
use crate::host::{AnimationParam, HostPresentation};
use crate::logger;

/// Параметры анимации одного слизня на этот тик
///
/// IsDrying = не на влажной поверхности (влага убывает).
pub fn animation_params(
    velocity: &CrawlVelocity,
    moisture: &Moisture,
    terrain: &TerrainContact,
) -> [AnimationParam; 3] {
    [
        AnimationParam::Speed(velocity.magnitude()),
        AnimationParam::Moisture(moisture.fraction()),
        AnimationParam::IsDrying(!terrain.is_moist),
    ]
}

pub fn sync_animation_params(
    presentation: Option<ResMut<HostPresentation>>,
    query: Query<(Entity, &CrawlVelocity, &Moisture, &TerrainContact), (With<Slug>, Without<Dead>)>,
    mut warned: Local<bool>,
) {
    let Some(mut presentation) = presentation else {
        if !*warned {
            logger::log_warning(&format!(
                "Animation sync skipped: {}",
                SlugError::MissingCollaborator(Collaborator::Presentation)
            ));
            *warned = true;
        }
        return;
    };
    *warned = false;

    for (entity, velocity, moisture, terrain) in query.iter() {
        for param in animation_params(velocity, moisture, terrain) {
            presentation.0.set_animation_param(entity, param);
        }
    }
}
