pub mod config;
pub mod error;
pub mod infra;
pub mod navigation;
pub mod sim;

// Re-export commonly used types for convenience
pub use config::NavigatorConfig;
pub use error::{ConfigError, NavigationError};
pub use infra::{ActionExecutor, Clock, Position, Recognizer, TextFragment};
pub use navigation::{LocationDescriptor, LocationParser, NavigationReport, Navigator, RouteStep};
