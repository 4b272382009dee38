//! Stepwise core library: trace recording, problem catalog and playback.

mod catalog;
mod cmd;
mod config;
mod error;
mod inputs;
mod playback;
pub mod problems;
mod recorder;
mod runtime;
mod script;
mod session;
mod step;
mod tracefile;

pub use catalog::*;
pub use cmd::*;
pub use config::*;
pub use error::*;
pub use inputs::*;
pub use playback::*;
pub use recorder::*;
pub use runtime::*;
pub use script::*;
pub use session::*;
pub use step::*;
pub use tracefile::*;
