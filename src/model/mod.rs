mod matches;
mod tournament;

pub use matches::*;
pub use tournament::*;
