pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader, validate};
pub use schema::{DEFAULT_TARGET_URL, LoginConfig, ScreenshotConfig, Timeouts};
