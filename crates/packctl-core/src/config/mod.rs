//! packctl configuration layer
//!
//! All environment reads live here; the rest of the crate works with the
//! structured configs from [`schema`].
//!
//! - `loader`: env_or, env_optional, env_bool and `.env` loading
//! - `schema`: ObservabilityConfig, RegistryConfig, BaseImageConfig
//! - `env_keys`: key constants with legacy aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_dotenv};
pub use schema::{BaseImageConfig, ObservabilityConfig, RegistryConfig};
