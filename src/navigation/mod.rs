mod location;
mod navigator;
mod obstacle;
mod route;

pub use location::{LocationDescriptor, LocationMarkers, LocationParser};
pub use navigator::{NavigationReport, Navigator};
pub use obstacle::ObstacleDetector;
pub use route::{Route, RouteStep, plan_route};
