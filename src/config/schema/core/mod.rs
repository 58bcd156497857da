mod env_overrides;
mod loader;
#[cfg(test)]
pub(super) mod test_env;
mod types;

pub use types::Config;
