//! HeadlessHost — хост без движка (headless симуляция и тесты)
//!
//! - Поверхности: набор прямоугольных патчей в XZ с высотой и тегом
//! - Input: скрипт (стоять, фиксированное направление, seeded wander)
//! - Все вызовы actuator/trail/presentation/lifecycle пишутся в общий лог

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    AnimationParam, HostInput, HostLifecycle, HostMotion, HostPresentation, HostTrails,
    HostWorld, InputSource, LifecycleHooks, MotionActuator, Presentation, SurfaceQuery,
    TrailSpawner,
};
use crate::components::{ControllerHandle, SurfaceTag};

/// Вызов, который ядро сделало в хост
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SetVelocity { agent: Entity, velocity: Vec3 },
    SpawnTrail { position: Vec3, lifetime: f32 },
    AnimationParam { agent: Entity, param: AnimationParam },
    LeaveHostCue { agent: Entity },
    HostDied { agent: Entity },
    PlayerControl { agent: Entity, controller: ControllerHandle, enabled: bool },
    AiControl { agent: Entity, controller: ControllerHandle, enabled: bool },
}

/// Горизонтальная поверхность: прямоугольник [min, max] в XZ на высоте `height`
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePatch {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
    pub tag: SurfaceTag,
}

impl SurfacePatch {
    pub fn new(min: Vec2, max: Vec2, height: f32, tag: SurfaceTag) -> Self {
        Self { min, max, height, tag }
    }

    fn contains_xz(&self, position: Vec3) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.z >= self.min.y
            && position.z <= self.max.y
    }
}

/// Откуда HeadlessHost берёт directional input
#[derive(Debug, Clone)]
pub enum InputScript {
    Idle,
    Fixed(Vec2),
    /// Случайное направление, меняется каждые `change_every` запросов
    Wander {
        rng: ChaCha8Rng,
        current: Vec2,
        change_every: u32,
        calls: u32,
    },
}

impl InputScript {
    pub fn wander(seed: u64, change_every: u32) -> Self {
        InputScript::Wander {
            rng: ChaCha8Rng::seed_from_u64(seed),
            current: Vec2::ZERO,
            change_every: change_every.max(1),
            calls: 0,
        }
    }

    fn next(&mut self) -> Vec2 {
        let raw = match self {
            InputScript::Idle => Vec2::ZERO,
            InputScript::Fixed(direction) => *direction,
            InputScript::Wander {
                rng,
                current,
                change_every,
                calls,
            } => {
                if *calls % *change_every == 0 {
                    *current = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
                }
                *calls = calls.wrapping_add(1);
                *current
            }
        };

        raw.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }
}

type CallLog = Arc<Mutex<Vec<HostCall>>>;

/// Хост для headless режима
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    surfaces: Arc<Vec<SurfacePatch>>,
    input: InputScript,
    calls: CallLog,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            surfaces: Arc::new(Vec::new()),
            input: InputScript::Idle,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_surfaces(mut self, surfaces: Vec<SurfacePatch>) -> Self {
        self.surfaces = Arc::new(surfaces);
        self
    }

    pub fn with_input(mut self, input: InputScript) -> Self {
        self.input = input;
        self
    }

    /// Вставляет все шесть collaborator ресурсов (лог общий с `self`)
    pub fn install(&self, world: &mut World) {
        world.insert_resource(HostWorld(Box::new(HeadlessWorld {
            surfaces: Arc::clone(&self.surfaces),
        })));
        world.insert_resource(HostInput(Box::new(HeadlessInput {
            script: self.input.clone(),
        })));
        world.insert_resource(HostMotion(Box::new(self.recorder())));
        world.insert_resource(HostTrails(Box::new(self.recorder())));
        world.insert_resource(HostPresentation(Box::new(self.recorder())));
        world.insert_resource(HostLifecycle(Box::new(self.recorder())));
    }

    /// Snapshot лога вызовов
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count_calls(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.iter().filter(|call| predicate(call)).count())
            .unwrap_or(0)
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn recorder(&self) -> CallRecorder {
        CallRecorder {
            calls: Arc::clone(&self.calls),
        }
    }
}

struct HeadlessWorld {
    surfaces: Arc<Vec<SurfacePatch>>,
}

impl SurfaceQuery for HeadlessWorld {
    fn probe_downward(&self, position: Vec3, max_distance: f32) -> Option<SurfaceTag> {
        // Ближайшая поверхность под позицией в пределах max_distance
        self.surfaces
            .iter()
            .filter(|patch| patch.contains_xz(position))
            .filter(|patch| {
                let drop = position.y - patch.height;
                (0.0..=max_distance).contains(&drop)
            })
            .max_by(|a, b| a.height.total_cmp(&b.height))
            .map(|patch| patch.tag.clone())
    }
}

struct HeadlessInput {
    script: InputScript,
}

impl InputSource for HeadlessInput {
    fn directional_input(&mut self) -> Vec2 {
        self.script.next()
    }
}

struct CallRecorder {
    calls: CallLog,
}

impl CallRecorder {
    fn push(&self, call: HostCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl MotionActuator for CallRecorder {
    fn set_velocity(&mut self, agent: Entity, velocity: Vec3) {
        self.push(HostCall::SetVelocity { agent, velocity });
    }
}

impl TrailSpawner for CallRecorder {
    fn spawn_trail_marker(&mut self, position: Vec3, lifetime: f32) {
        self.push(HostCall::SpawnTrail { position, lifetime });
    }
}

impl Presentation for CallRecorder {
    fn set_animation_param(&mut self, agent: Entity, param: AnimationParam) {
        self.push(HostCall::AnimationParam { agent, param });
    }

    fn trigger_leave_host(&mut self, agent: Entity) {
        self.push(HostCall::LeaveHostCue { agent });
    }
}

impl LifecycleHooks for CallRecorder {
    fn notify_host_died(&mut self, agent: Entity) {
        self.push(HostCall::HostDied { agent });
    }

    fn enable_player_control(&mut self, agent: Entity, controller: ControllerHandle, enabled: bool) {
        self.push(HostCall::PlayerControl { agent, controller, enabled });
    }

    fn enable_ai_control(&mut self, agent: Entity, controller: ControllerHandle, enabled: bool) {
        self.push(HostCall::AiControl { agent, controller, enabled });
    }
}
