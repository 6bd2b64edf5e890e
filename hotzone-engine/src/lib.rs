pub mod engine;
pub mod sampler;
pub mod scoring;
pub mod trend;
pub mod zones;

pub use engine::{ActiveAnalysis, HotZoneEngine, InactiveAnalysis, InactiveReason, ZoneAnalysis};
