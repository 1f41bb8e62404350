pub mod ac;
pub mod calendar;
pub mod completion;
pub mod error;
pub mod goal;
pub mod platform;
pub mod stats;
pub mod task;
