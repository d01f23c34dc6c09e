mod action;
mod event;
mod fetch_error;
mod loading;
mod log_request;
mod log_snapshot;
mod monitor;
mod session_ids;

pub use action::*;
pub use event::*;
pub use fetch_error::*;
pub use loading::*;
pub use log_request::*;
pub use log_snapshot::*;
pub use monitor::*;
pub use session_ids::*;
