pub mod base;
pub mod configs;
pub mod research;
pub mod sse;
pub mod types;
pub mod utils;
pub mod vision;
