//! MoistureModel — чистое обновление moisture/speed/health за dt
//!
//! Алгоритм:
//! 1. depletion multiplier = sunlight_multiplier под солнцем, иначе 1.0
//! 2. moist: moisture += gain_rate × dt (множитель игнорируется)
//! 3. иначе: moisture -= depletion_rate × multiplier × dt
//! 4. clamp moisture в [0, max]
//! 5. speed = max_speed × moisture / max_moisture
//! 6. moisture == 0 → health -= health_depletion_rate × dt
//!
//! Максимумы берутся из SlugConfig (sync_maxima в начале шага).

use crate::components::{CrawlSpeed, Health, Moisture, TerrainContact};
use crate::config::SlugConfig;

/// Результат одного шага модели
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistureTick {
    /// Изменение здоровья (≤ 0)
    pub health_delta: f32,
    /// Влага убывала на этом шаге
    pub drying: bool,
}

pub fn depletion_multiplier(terrain: TerrainContact, config: &SlugConfig) -> f32 {
    if terrain.is_sunlit {
        config.sunlight_multiplier
    } else {
        1.0
    }
}

/// Переносит максимумы из конфига в vitals, current зажимается в новый max
pub fn sync_maxima(
    moisture: &mut Moisture,
    speed: &mut CrawlSpeed,
    health: &mut Health,
    config: &SlugConfig,
) {
    moisture.max = config.max_moisture;
    moisture.current = moisture.current.clamp(0.0, moisture.max);
    speed.max = config.max_speed;
    health.max = config.max_health;
    health.current = health.current.clamp(0.0, health.max);
}

/// speed = max × moisture / max_moisture
///
/// Вызывается после любого изменения влаги (модель, стоимость следа).
pub fn derive_speed(speed: &mut CrawlSpeed, moisture: &Moisture) {
    derive_speed(speed, moisture);
}

/// Один шаг модели. Отрицательный dt трактуется как 0.
pub fn update(
    moisture: &mut Moisture,
    speed: &mut CrawlSpeed,
    health: &mut Health,
    terrain: TerrainContact,
    dt: f32,
    config: &SlugConfig,
) -> MoistureTick {
    sync_maxima(moisture, speed, health, config);

    let dt = dt.max(0.0);
    let multiplier = depletion_multiplier(terrain, config);

    // Moist проверяется безусловно: moist + sunlit → влага набирается
    let drying = !terrain.is_moist;
    if terrain.is_moist {
        moisture.adjust(config.moisture_gain_rate * dt);
    } else {
        moisture.adjust(-config.moisture_depletion_rate * multiplier * dt);
    }

    derive_speed(speed, moisture);

    let health_before = health.current;
    if moisture.is_dry() {
        health.take_damage(config.health_depletion_rate * dt);
    }

    MoistureTick {
        health_delta: health.current - health_before,
        drying,
    }
}
