pub mod anthropic;
pub mod factory;
pub mod http_client;
pub mod openai;
pub mod scrub;
pub mod traits;

pub use factory::create_provider;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{CompletionRequest, Provider};
