pub mod config;
pub mod constants;
pub mod message;
pub mod session;
pub mod submit;
