pub mod connctx;
pub mod handler;
pub mod hub;
pub mod msg_code_handler;
pub mod msg_join_handler;
pub mod registry;
