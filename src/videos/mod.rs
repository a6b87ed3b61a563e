pub mod cache;
pub mod models;

pub use cache::{Clock, SystemClock, VideoCache, VideoSource};
pub use models::{QaResponse, Roast, Video, VideoMetadata};
