//! Ресурсы жизни слизня: Moisture, Health, CrawlSpeed

use bevy::prelude::*;

/// Влага — depletable ресурс, от которого зависят скорость и выживание
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Moisture {
    pub current: f32,
    pub max: f32,
}

impl Default for Moisture {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Moisture {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Доля влаги 0..=1 (для анимации и скорости)
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_dry(&self) -> bool {
        self.current <= 0.0
    }

    /// Изменяет влагу на delta и зажимает в [0, max]
    pub fn adjust(&mut self, delta: f32) {
        self.current = (self.current + delta).clamp(0.0, self.max);
    }
}

/// Здоровье слизня (только убывает, регенерации нет)
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }
}

/// Текущая скорость ползания, выводится из влаги каждый тик
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CrawlSpeed {
    pub current: f32,
    pub max: f32,
}

impl Default for CrawlSpeed {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl CrawlSpeed {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }
}
