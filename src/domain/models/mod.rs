mod action;
mod backend;
mod errors;
mod event;
mod loading;
mod message;
mod persona;
mod role;
mod slash_commands;
mod textarea;

pub use action::*;
pub use backend::*;
pub use errors::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use persona::*;
pub use role::*;
pub use slash_commands::*;
pub use textarea::*;
