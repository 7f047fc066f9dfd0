//! Host seam — узкие интерфейсы внешнего движка
//!
//! HYBRID ARCHITECTURE:
//! - ECS = ресурсная модель слизня (moisture, health, lifecycle)
//! - Хост = физика, рендер, анимации, input, спавн объектов
//!
//! Каждый collaborator — trait object внутри Bevy resource.
//! Ресурса нет → `SlugError::MissingCollaborator`, операция пропускается.

use bevy::prelude::*;

use crate::components::{ControllerHandle, SurfaceTag};

pub mod headless;

pub use headless::{HeadlessHost, HostCall, InputScript, SurfacePatch};

/// Параметры анимации, которые ядро выставляет каждый тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationParam {
    Speed(f32),
    /// Доля влаги в [0, 1]
    Moisture(f32),
    IsDrying(bool),
}

impl AnimationParam {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationParam::Speed(_) => "Speed",
            AnimationParam::Moisture(_) => "Moisture",
            AnimationParam::IsDrying(_) => "IsDrying",
        }
    }
}

/// Короткий raycast вниз против collision world хоста
pub trait SurfaceQuery: Send + Sync {
    fn probe_downward(&self, position: Vec3, max_distance: f32) -> Option<SurfaceTag>;
}

pub trait MotionActuator: Send + Sync {
    fn set_velocity(&mut self, agent: Entity, velocity: Vec3);
}

/// Хост сам удаляет маркер по истечении lifetime
pub trait TrailSpawner: Send + Sync {
    fn spawn_trail_marker(&mut self, position: Vec3, lifetime: f32);
}

pub trait Presentation: Send + Sync {
    fn set_animation_param(&mut self, agent: Entity, param: AnimationParam);
    /// One-shot cue "покидаю носителя"
    fn trigger_leave_host(&mut self, agent: Entity);
}

pub trait InputSource: Send + Sync {
    /// Направление, каждая ось в [-1, 1]
    fn directional_input(&mut self) -> Vec2;
}

pub trait LifecycleHooks: Send + Sync {
    fn notify_host_died(&mut self, agent: Entity);
    fn enable_player_control(&mut self, agent: Entity, controller: ControllerHandle, enabled: bool);
    fn enable_ai_control(&mut self, agent: Entity, controller: ControllerHandle, enabled: bool);
}

#[derive(Resource)]
pub struct HostWorld(pub Box<dyn SurfaceQuery>);

#[derive(Resource)]
pub struct HostMotion(pub Box<dyn MotionActuator>);

#[derive(Resource)]
pub struct HostTrails(pub Box<dyn TrailSpawner>);

#[derive(Resource)]
pub struct HostPresentation(pub Box<dyn Presentation>);

#[derive(Resource)]
pub struct HostInput(pub Box<dyn InputSource>);

#[derive(Resource)]
pub struct HostLifecycle(pub Box<dyn LifecycleHooks>);
