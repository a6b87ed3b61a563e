pub mod base;
pub mod research;
pub mod vision;

pub use base::EnvConfig;
pub use research::ResearchProviderConfig;
pub use vision::VisionProviderConfig;
