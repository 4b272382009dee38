//! Command implementations behind the `stepwise` binary.

mod play_cmd;
mod schema;
mod trace_cmd;

pub use play_cmd::*;
pub use schema::*;
pub use trace_cmd::*;
