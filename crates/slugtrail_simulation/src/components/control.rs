//! Control компоненты: кто управляет слизнем, отложенная передача AI, смерть

use bevy::prelude::*;

/// Lifecycle состояние контроля
///
/// PlayerControlled → ReturningToAI → AIControlled; Dead — терминальное из любого.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum ControlMode {
    #[default]
    PlayerControlled,
    /// Leave host запрошен, ждём LeaveHostTimer
    ReturningToAI,
    AIControlled,
    Dead,
}

impl ControlMode {
    pub fn is_player_driven(&self) -> bool {
        matches!(self, ControlMode::PlayerControlled | ControlMode::ReturningToAI)
    }
}

/// Handle контроллера хоста (player controller, AI brain)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct ControllerHandle(pub u64);

/// Контроллеры, переданные при спавне (вместо глобального поиска по сцене)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ControlBindings {
    pub player_controller: Option<ControllerHandle>,
    pub ai_controller: Option<ControllerHandle>,
}

impl ControlBindings {
    pub fn new(player_controller: ControllerHandle, ai_controller: ControllerHandle) -> Self {
        Self {
            player_controller: Some(player_controller),
            ai_controller: Some(ai_controller),
        }
    }
}

/// Отложенная передача контроля AI (cancellable)
///
/// Удаление компонента = отмена. Таймер тикает в FixedUpdate,
/// поэтому ожидание не блокирует тики других агентов.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LeaveHostTimer {
    pub timer: Timer,
    /// Ошибка передачи уже залогирована (не спамим каждый тик)
    pub failure_reported: bool,
}

impl LeaveHostTimer {
    pub fn new(delay_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(delay_secs, TimerMode::Once),
            failure_reported: false,
        }
    }
}

/// Маркер: слизень мёртв (health == 0), все системы его пропускают
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Запрос удаления трупа после таймаута
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub timer: Timer,
}

impl DespawnAfter {
    pub fn new(delay_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(delay_secs, TimerMode::Once),
        }
    }
}
