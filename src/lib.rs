pub mod commands;
pub mod errors;
pub mod providers;
pub mod render;
pub mod restaurants;
pub mod stream;
pub mod videos;
