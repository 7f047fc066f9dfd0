//! ECS Components слизня
//!
//! Организация по доменам:
//! - slug: маркер агента + spawn helper
//! - vitals: Moisture, Health, CrawlSpeed
//! - terrain: SurfaceTag, TerrainClass, TerrainContact
//! - movement: CrawlInput, CrawlVelocity
//! - trail: TrailEmitter
//! - control: ControlMode, ControlBindings, LeaveHostTimer, Dead

pub mod control;
pub mod movement;
pub mod slug;
pub mod terrain;
pub mod trail;
pub mod vitals;

pub use control::*;
pub use movement::*;
pub use slug::*;
pub use terrain::*;
pub use trail::*;
pub use vitals::*;
