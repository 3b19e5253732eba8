pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config};
pub use schema::{Config, ModelEntry};
