//! API surfaces of the orchestrator.
//!
//! Each surface is a thin handle over the shared engine, reachable as a
//! field on [`Gantry`](crate::Gantry): `db.runs`, `db.states`, `db.limits`,
//! `db.groups`.

mod groups;
mod limits;
mod runs;
mod states;

pub use groups::Groups;
pub use limits::Limits;
pub use runs::Runs;
pub use states::States;
