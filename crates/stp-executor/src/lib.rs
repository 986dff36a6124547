//! Strategic execution engine.
//!
//! Every control cycle the [`Executor`] looks at a [`WorldData`](stp_core::WorldData)
//! snapshot, keeps (or picks) a [`Play`] from the [`PlayCatalog`], binds robots to the
//! play's five role slots, and advances every bound [`Tactic`](tactics::Tactic) exactly
//! once. Tactics either emit a [`Primitive`] directly or step a resumable
//! [`Action`](actions::Action).

mod abort;
pub mod actions;
mod assignment;
mod catalog;
pub mod coordinate;
mod executor;
mod flags;
pub mod navigator;
mod play;
pub mod predicates;
mod primitive;
pub mod tactics;

pub use abort::PlayAbort;
pub use assignment::{Assignment, SlotBinding, WorldView};
pub use catalog::PlayCatalog;
pub use coordinate::{Coordinate, Origin, Region, Side};
pub use executor::{Executor, ExecutorState};
pub use flags::MoveFlags;
pub use play::{Play, PlayBuilder, PlayCtx, RoleSequences};
pub use primitive::{PlayerCommand, PlayerCommands, Primitive};
