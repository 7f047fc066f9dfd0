//! Trail emitter state (accumulator вместо `time % interval`)

use bevy::prelude::*;

/// Состояние эмиттера слизистого следа
///
/// Accumulator копит время движения; при достижении интервала
/// вычитается один интервал. Максимум один след за тик.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TrailEmitter {
    pub accumulator: f32,
    /// Время симуляции последнего следа (монотонно не убывает)
    pub last_emit_time: f32,
    pub emitted: u32,
}

impl TrailEmitter {
    /// Продвигает accumulator; true = пора оставить след
    ///
    /// Стоя на месте accumulator не растёт. После выстрела остаток
    /// ограничен одним интервалом: пропущенный след догоняется
    /// максимум один раз, дальше drift отбрасывается.
    pub fn advance(&mut self, speed: f32, min_speed: f32, dt: f32, interval: f32) -> bool {
        if speed <= min_speed || dt <= 0.0 {
            return false;
        }

        self.accumulator += dt;
        if self.accumulator < interval {
            return false;
        }

        self.accumulator = (self.accumulator - interval).min(interval);
        true
    }

    pub fn record_emit(&mut self, now: f32) {
        self.last_emit_time = self.last_emit_time.max(now);
        self.emitted += 1;
    }
}
