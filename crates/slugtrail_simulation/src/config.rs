//! Параметры слизня (задаются при спавне, не меняются во время жизни)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable параметры одного агента
///
/// Все времена в секундах симуляции, скорости в units/sec.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct SlugConfig {
    pub max_moisture: f32,
    /// Потеря влаги вне влажной поверхности (units/sec)
    pub moisture_depletion_rate: f32,
    /// Набор влаги на влажной поверхности (units/sec), множитель солнца не влияет
    pub moisture_gain_rate: f32,
    /// Множитель depletion под солнцем
    pub sunlight_multiplier: f32,
    pub max_health: f32,
    /// Потеря здоровья пока влага на нуле (units/sec)
    pub health_depletion_rate: f32,
    pub max_speed: f32,
    /// Длина raycast вниз для определения поверхности
    pub probe_distance: f32,
    pub trail_interval: f32,
    /// Стоимость одного следа во влаге
    pub trail_cost: f32,
    /// След не оставляется при |velocity| <= trail_min_speed
    pub trail_min_speed: f32,
    pub trail_lifetime: f32,
    /// Задержка передачи контроля AI после leave host
    pub leave_host_delay: f32,
    /// Сколько труп лежит до despawn
    pub corpse_linger: f32,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            max_moisture: 100.0,
            moisture_depletion_rate: 3.0,
            moisture_gain_rate: 5.0,
            sunlight_multiplier: 3.0,
            max_health: 100.0,
            health_depletion_rate: 5.0,
            max_speed: 0.5,
            probe_distance: 0.2,
            trail_interval: 0.5,
            trail_cost: 0.1,
            trail_min_speed: 0.1,
            trail_lifetime: 5.0,
            leave_host_delay: 1.0,
            corpse_linger: 0.0,
        }
    }
}

impl SlugConfig {
    /// Парсит TOML (отсутствующие поля берутся из Default) и валидирует
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SlugConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must be positive" })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must not be negative" })
            }
        }

        positive("max_moisture", self.max_moisture)?;
        positive("max_health", self.max_health)?;
        positive("max_speed", self.max_speed)?;
        positive("probe_distance", self.probe_distance)?;
        positive("trail_interval", self.trail_interval)?;

        non_negative("moisture_depletion_rate", self.moisture_depletion_rate)?;
        non_negative("moisture_gain_rate", self.moisture_gain_rate)?;
        non_negative("health_depletion_rate", self.health_depletion_rate)?;
        non_negative("trail_cost", self.trail_cost)?;
        non_negative("trail_min_speed", self.trail_min_speed)?;
        non_negative("trail_lifetime", self.trail_lifetime)?;
        non_negative("leave_host_delay", self.leave_host_delay)?;
        non_negative("corpse_linger", self.corpse_linger)?;

        if !(self.sunlight_multiplier.is_finite() && self.sunlight_multiplier >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "sunlight_multiplier",
                reason: "must be at least 1.0",
            });
        }

        Ok(())
    }
}
