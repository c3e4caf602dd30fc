pub mod config;
pub mod contact;
pub mod media;
pub mod modal;
pub mod utils;
