mod bell;
mod config;
mod dispatch;
mod error;
mod menu;
mod prompt;
mod update;

pub use bell::BellFilter;
pub use config::{resolve_path, Config, Project, Server};
pub use error::{ConfigError, UpdateError};
pub use menu::Navigator;
pub use prompt::{Outcome, Select};
pub use update::{self_update, VERSION};
