mod action;
mod alert;
mod backend;
mod event;
mod loading;
mod message;
mod role;
mod slash_commands;
mod speech;
mod storage;
mod textarea;
mod theme;
mod user;

pub use action::*;
pub use alert::*;
pub use backend::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use role::*;
pub use slash_commands::*;
pub use speech::*;
pub use storage::*;
pub use textarea::*;
pub use theme::*;
pub use user::*;
