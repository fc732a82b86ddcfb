use tracing::{info, warn};

use crate::error::NavigationError;
use crate::infra::Position;
use crate::navigation::{LocationDescriptor, NavigationReport, Route, RouteStep};

/// Trait for observing navigation events
pub trait NavigationObserver {
    /// Called whenever the status panel has been read and parsed
    fn on_location_read(&mut self, _info: &LocationDescriptor) {}

    /// Called once the route for a request is known
    fn on_route_planned(&mut self, _start: Position, _target: Position, _route: &Route) {}

    /// Called when the pre-check before step `index` reports an obstacle
    fn on_obstacle_detected(&mut self, _index: usize, _step: RouteStep) {}

    /// Called after a planned step executed successfully
    fn on_step_executed(&mut self, _index: usize, _step: RouteStep) {}

    /// Called when a navigation request ends, successfully or not
    fn on_navigation_finished(&mut self, _outcome: &Result<NavigationReport, NavigationError>) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl NavigationObserver for NullObserver {}

/// Logs navigation events through `tracing`.
pub struct DefaultObserver;

impl NavigationObserver for DefaultObserver {
    fn on_location_read(&mut self, location: &LocationDescriptor) {
        match location.position() {
            Some(pos) => info!("Location: {} {}", location.area_name, pos),
            None => warn!("Location: {} (no coordinates)", location.area_name),
        }
    }

    fn on_route_planned(&mut self, start: Position, target: Position, route: &Route) {
        info!("Current position: {}, target: {}, {} steps", start, target, route.len());
    }

    fn on_obstacle_detected(&mut self, index: usize, step: RouteStep) {
        warn!("Obstacle before step {} ({}), side-stepping", index, step.as_str_name());
    }

    fn on_step_executed(&mut self, index: usize, step: RouteStep) {
        info!("step {}: {}", index, step.as_str_name());
    }

    fn on_navigation_finished(&mut self, outcome: &Result<NavigationReport, NavigationError>) {
        match outcome {
            Ok(report) => info!(
                "Reached {} from {} ({} steps, {} recoveries)",
                report.target, report.start, report.executed_steps, report.recoveries
            ),
            Err(err) => warn!("Navigation failed: {}", err),
        }
    }
}
