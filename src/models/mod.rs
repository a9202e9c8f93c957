pub mod client_info;
pub mod health;
pub mod messages;
pub mod ready;

pub use client_info::*;
pub use health::*;
pub use messages::*;
pub use ready::*;
