//! Level content schema for levelpack.
//!
//! A level is a declarative description of a timed state machine:
//! - [`Level`]: time limit, start/finish sounds and the set of states
//! - [`State`]: one node of the machine, identified by a unique id
//! - [`TimeFrame`]: how long a state stays displayed, drawn from a
//!   [`Distribution`]
//!
//! Levels are decoded from the `level.json` file at the root of a package.
//! Field names on the wire follow the PascalCase names used by existing
//! packages and must not change.

mod error;
mod level;
mod timeframe;

pub use error::{SchemaError, SchemaResult};
pub use level::{Level, State};
pub use timeframe::{Distribution, TimeFrame};
