pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
pub mod clipboard;
mod conversation;
pub mod events;
mod inspector;
pub mod poller;
mod scroll;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use conversation::*;
pub use inspector::*;
pub use scroll::*;
