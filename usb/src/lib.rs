pub use rusb;

pub mod commands;
pub mod device;
pub mod error;
pub mod frame;
pub mod gmmk;
pub mod sequencer;
pub mod tables;
