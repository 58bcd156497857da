pub mod schema;

pub use schema::{
    Config, GatewayConfig, GenerationConfig, LengthBucketConfig, PeakBandConfig, ProviderConfig,
    SchedulerConfig, StoreConfig, StyleConfig,
};
