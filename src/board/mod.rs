pub mod cozy;

pub use cozy::{CozyMove, CozyPosition};
