//! Movement компоненты: входное направление и итоговая velocity

use bevy::prelude::*;

/// Сырое направление движения (каждая ось в [-1, 1])
///
/// Заполняется:
/// - read_player_input (PlayerControlled, из InputSource хоста)
/// - внешним AI хоста (AIControlled)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CrawlInput {
    pub direction: Vec2,
}

/// Velocity, выданная motion actuator на последнем тике (XZ плоскость)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CrawlVelocity {
    pub linear: Vec3,
}

impl CrawlVelocity {
    pub fn magnitude(&self) -> f32 {
        self.linear.length()
    }
}
