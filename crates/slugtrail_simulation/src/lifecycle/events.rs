//! Lifecycle events

use bevy::prelude::*;

use crate::components::ControlMode;

/// Запрос "покинуть носителя" (от внешнего контроллера, например possessing entity)
#[derive(Event, Debug, Clone, Copy)]
pub struct LeaveHostRequested {
    pub agent: Entity,
}

/// Запрос вернуть контроль игроку (отменяет pending передачу AI)
#[derive(Event, Debug, Clone, Copy)]
pub struct PossessRequested {
    pub agent: Entity,
}

/// Событие: слизень умер (health == 0). Отправляется ровно один раз.
#[derive(Event, Debug, Clone, Copy)]
pub struct SlugDied {
    pub agent: Entity,
}

/// Событие: контроль переключён (mode — новое состояние)
#[derive(Event, Debug, Clone, Copy)]
pub struct ControlHandedOff {
    pub agent: Entity,
    pub mode: ControlMode,
}
