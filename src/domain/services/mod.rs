pub mod actions;
mod app_state;
pub mod dashboard;
pub mod events;
mod poller;
mod scroll;

pub use app_state::*;
pub use poller::*;
pub use scroll::*;
