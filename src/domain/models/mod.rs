mod action;
mod backend;
mod event;
mod loading;
mod message;
mod model;
mod role;
mod slash_commands;
mod stats;
mod textarea;
mod upload;

pub use action::*;
pub use backend::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use model::*;
pub use role::*;
pub use slash_commands::*;
pub use stats::*;
pub use textarea::*;
pub use upload::*;
