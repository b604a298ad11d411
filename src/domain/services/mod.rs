pub mod actions;
mod app_state;
mod auth;
mod bubble;
mod bubble_list;
pub mod clipboard;
mod commands;
pub mod events;
mod export;
mod long_press;
mod preferences;
mod scroll;
mod themes;

pub use app_state::*;
pub use auth::*;
pub use bubble::*;
pub use bubble_list::*;
pub use commands::*;
pub use export::*;
pub use long_press::*;
pub use preferences::*;
pub use scroll::*;
pub use themes::*;
