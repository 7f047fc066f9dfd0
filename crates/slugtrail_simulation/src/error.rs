//! Ошибки симуляции
//!
//! Все ошибки recoverable: логируются, операция пропускается на этом тике.
//! Смерть — не ошибка, а терминальный переход ControlMode::Dead.

use bevy::prelude::Entity;
use thiserror::Error;

use crate::components::ControlMode;
use crate::logger::{self, LogLevel};

/// Внешний collaborator, без которого операция невозможна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    WorldQuery,
    MotionActuator,
    TrailSpawner,
    Presentation,
    InputSource,
    LifecycleHooks,
    PlayerController,
    AiController,
}

impl Collaborator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::WorldQuery => "world query",
            Collaborator::MotionActuator => "motion actuator",
            Collaborator::TrailSpawner => "trail spawner",
            Collaborator::Presentation => "presentation",
            Collaborator::InputSource => "input source",
            Collaborator::LifecycleHooks => "lifecycle hooks",
            Collaborator::PlayerController => "player controller",
            Collaborator::AiController => "AI controller",
        }
    }
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SlugError {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(Collaborator),

    #[error("slug {agent:?} cannot {action} while {from:?}")]
    InvalidState {
        agent: Entity,
        from: ControlMode,
        action: &'static str,
    },

    #[error("slug {agent:?}: {target:?} is not a control owner")]
    InvalidTarget { agent: Entity, target: ControlMode },

    #[error("entity {0:?} is not a slug")]
    UnknownAgent(Entity),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse slug config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid slug config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl SlugError {
    /// Уровень логирования: недостающий collaborator — ошибка, остальное — warning
    pub fn log_level(&self) -> LogLevel {
        match self {
            SlugError::MissingCollaborator(_) | SlugError::Config(_) => LogLevel::Error,
            SlugError::InvalidState { .. }
            | SlugError::InvalidTarget { .. }
            | SlugError::UnknownAgent(_) => LogLevel::Warning,
        }
    }

    /// Залогировать recoverable ошибку с контекстом операции
    pub fn report(&self, context: &str) {
        logger::log_with_level(self.log_level(), &format!("{}: {}", context, self));
    }
}
