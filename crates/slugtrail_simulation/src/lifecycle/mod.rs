//! LifecycleManager — смерть и передача контроля
//!
//! States: PlayerControlled → ReturningToAI → AIControlled; Dead терминально из любого.
//!
//! - check_death: health == 0 → notify хоста, Dead, запрос despawn
//! - LeaveHostRequested → cue, ReturningToAI, LeaveHostTimer (delay)
//! - LeaveHostTimer истёк → player off, AI on (ровно один раз, в этом порядке)
//! - PossessRequested → отмена pending передачи или AI off, player on

pub mod events;
pub mod systems;


pub use events::*;
pub use systems::*;
