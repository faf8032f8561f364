mod arena;
mod duel;
mod outcome;
mod phase;

pub use arena::*;
pub use duel::*;
pub use outcome::*;
pub use phase::*;
