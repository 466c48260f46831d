pub mod config;
pub mod dispatch;
pub mod lifecycle;
pub mod output;
pub mod reset;
pub mod session;
pub mod status;
pub mod update;

pub use dispatch::dispatch;
