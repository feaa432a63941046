pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod conversation;
pub mod events;
mod relay;
mod scroll;
#[cfg(test)]
pub mod scripted;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use conversation::*;
pub use relay::*;
pub use scroll::*;
