mod core;
mod gateway;
mod generation;
mod provider;
mod scheduler;
mod store;

pub use self::core::Config;
pub use gateway::GatewayConfig;
pub use generation::{GenerationConfig, LengthBucketConfig, StyleConfig};
pub use provider::ProviderConfig;
pub use scheduler::{PeakBandConfig, SchedulerConfig};
pub use store::StoreConfig;
