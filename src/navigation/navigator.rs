use tracing::{debug, info, warn};

use crate::config::NavigatorConfig;
use crate::error::NavigationError;
use crate::infra::{
    ActionExecutor, Clock, NavigationObserver, NullObserver, Position, RecognitionRequest,
    Recognizer, SystemClock,
};
use crate::navigation::{LocationDescriptor, LocationParser, ObstacleDetector, plan_route};

/// Summary of a navigation request that reached its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationReport {
    pub start: Position,
    pub target: Position,
    pub planned_steps: u64,
    pub executed_steps: u64,
    pub recoveries: usize,
}

/// Reads the agent's position, walks an axis-aligned route to the target and
/// checks the arrival. Requests run synchronously and must not overlap.
pub struct Navigator<R, A, C = SystemClock> {
    recognizer: R,
    executor: A,
    clock: C,
    config: NavigatorConfig,
    parser: LocationParser,
    detector: ObstacleDetector,
    observer: Box<dyn NavigationObserver>,
}

impl<R: Recognizer, A: ActionExecutor> Navigator<R, A, SystemClock> {
    pub fn new(recognizer: R, executor: A, config: NavigatorConfig) -> Self {
        Self::with_clock(recognizer, executor, SystemClock, config)
    }
}

impl<R: Recognizer, A: ActionExecutor, C: Clock> Navigator<R, A, C> {
    pub fn with_clock(recognizer: R, executor: A, clock: C, config: NavigatorConfig) -> Self {
        Self {
            recognizer,
            executor,
            clock,
            parser: LocationParser::new(config.location_markers.clone()),
            detector: ObstacleDetector::from_config(&config),
            config,
            observer: Box::new(NullObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl NavigationObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn executor(&self) -> &A {
        &self.executor
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Captures the screen and parses the status panel. `None` when the
    /// location recognition matched nothing at all.
    pub fn check_location(&mut self) -> Option<LocationDescriptor> {
        let image = self.recognizer.capture_scene();
        let request =
            RecognitionRequest::new(&self.config.location_label, self.config.location_region);
        let result = self.recognizer.recognize(&request, &image)?;

        let info = self.parser.parse(&result.fragments);
        self.observer.on_location_read(&info);
        Some(info)
    }

    fn current_position(&mut self) -> Option<Position> {
        self.check_location().and_then(|info| info.position())
    }

    /// Re-reads the position and compares it with `target`. Only an exact match passes.
    pub fn verify_arrival(&mut self, target: Position) -> Result<Position, NavigationError> {
        match self.current_position() {
            Some(actual) if actual == target => Ok(actual),
            actual => Err(NavigationError::ArrivalVerificationFailure { target, actual }),
        }
    }

    /// Boolean form of [`Navigator::move_to_target`].
    pub fn move_to(&mut self, target_x: i32, target_y: i32) -> bool {
        self.move_to_target(Position::new(target_x, target_y)).is_ok()
    }

    #[tracing::instrument(level = "debug", skip(self), fields(target_x = target.x, target_y = target.y))]
    pub fn move_to_target(&mut self, target: Position) -> Result<NavigationReport, NavigationError> {
        let outcome = self.navigate(target);
        self.observer.on_navigation_finished(&outcome);
        outcome
    }

    fn navigate(&mut self, target: Position) -> Result<NavigationReport, NavigationError> {
        let Some(start) = self.current_position() else {
            warn!("Unable to read current position");
            return Err(NavigationError::LocationUnavailable);
        };

        let route = plan_route(start, target);
        debug!("Route from {} to {}: {} steps", start, target, route.len());
        self.observer.on_route_planned(start, target, &route);

        let settle = self.config.settle_delay;
        let recovery = self.config.recovery_step;
        let mut recoveries = 0;

        for (index, step) in route.steps().enumerate() {
            if self.detector.is_blocked(&mut self.recognizer) {
                self.observer.on_obstacle_detected(index, step);
                if !self.executor.execute(recovery) {
                    warn!("Recovery {} before step {} failed", recovery.as_str_name(), index);
                    return Err(NavigationError::RerouteFailure { index });
                }
                recoveries += 1;
                self.clock.settle(settle);
            }

            if !self.executor.execute(step) {
                warn!("Step {} ({}) failed", index, step.as_str_name());
                return Err(NavigationError::StepExecutionFailure { index, step });
            }
            self.observer.on_step_executed(index, step);
            self.clock.settle(settle);
        }

        let arrived = self.verify_arrival(target)?;
        info!("Arrived at {}", arrived);

        Ok(NavigationReport {
            start,
            target,
            planned_steps: route.len(),
            executed_steps: route.len(),
            recoveries,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::infra::scripted::{RecordingClock, ScriptedExecutor, ScriptedRecognizer};
    use crate::navigation::{Route, RouteStep};

    type TestNavigator = Navigator<ScriptedRecognizer, ScriptedExecutor, RecordingClock>;

    fn navigator(recognizer: ScriptedRecognizer, executor: ScriptedExecutor) -> TestNavigator {
        Navigator::with_clock(
            recognizer,
            executor,
            RecordingClock::default(),
            NavigatorConfig::default(),
        )
    }

    fn clear_checks(recognizer: &mut ScriptedRecognizer, count: usize) {
        for _ in 0..count {
            recognizer.push_clear();
        }
    }

    #[test]
    fn test_straight_line_success() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（10,50）", "负重：3/100"]);
        clear_checks(&mut recognizer, 4);
        recognizer.push_location(&["荒野（14,50）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        let report = nav.move_to_target(Position::new(14, 50)).unwrap();

        assert_eq!(nav.executor().executed(), &[RouteStep::MoveRight; 4]);
        assert_eq!(report.start, Position::new(10, 50));
        assert_eq!(report.planned_steps, 4);
        assert_eq!(report.executed_steps, 4);
        assert_eq!(report.recoveries, 0);
        assert_eq!(nav.clock().waits(), &[Duration::from_millis(500); 4]);
    }

    #[test]
    fn test_obstacle_recovery_before_second_step() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（10,50）"]);
        recognizer.push_clear();
        recognizer.push_obstacle(&["前方有障碍物"]);
        clear_checks(&mut recognizer, 2);
        recognizer.push_location(&["荒野（14,50）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        let report = nav.move_to_target(Position::new(14, 50)).unwrap();

        assert_eq!(
            nav.executor().executed(),
            &[
                RouteStep::MoveRight,
                RouteStep::MoveUp,
                RouteStep::MoveRight,
                RouteStep::MoveRight,
                RouteStep::MoveRight,
            ]
        );
        assert_eq!(report.recoveries, 1);
        assert_eq!(nav.clock().waits().len(), 5);
    }

    #[test]
    fn test_location_unavailable_executes_nothing() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野", "负重：3/100", "食物：充足"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        let err = nav.move_to_target(Position::new(14, 50)).unwrap_err();

        assert_eq!(err, NavigationError::LocationUnavailable);
        assert!(nav.executor().executed().is_empty());
        assert!(nav.clock().waits().is_empty());
    }

    #[test]
    fn test_no_recognition_result_is_location_unavailable() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_no_location();

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        assert!(nav.check_location().is_none());
        assert!(!nav.move_to(14, 50));
        assert!(nav.executor().executed().is_empty());
    }

    #[test]
    fn test_verification_mismatch() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（10,50）"]);
        clear_checks(&mut recognizer, 4);
        recognizer.push_location(&["荒野（13,50）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        let err = nav.move_to_target(Position::new(14, 50)).unwrap_err();

        assert_eq!(
            err,
            NavigationError::ArrivalVerificationFailure {
                target: Position::new(14, 50),
                actual: Some(Position::new(13, 50)),
            }
        );
        assert_eq!(nav.executor().executed().len(), 4);
    }

    #[test]
    fn test_unreadable_final_position_fails_verification() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（10,50）"]);
        clear_checks(&mut recognizer, 1);
        recognizer.push_location(&["荒野（?,?）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        let err = nav.move_to_target(Position::new(11, 50)).unwrap_err();
        assert_eq!(
            err,
            NavigationError::ArrivalVerificationFailure {
                target: Position::new(11, 50),
                actual: None,
            }
        );
    }

    #[test]
    fn test_step_failure_abandons_route() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（10,50）"]);
        clear_checks(&mut recognizer, 4);

        let mut nav = navigator(recognizer, ScriptedExecutor::failing_at(2));
        let err = nav.move_to_target(Position::new(14, 50)).unwrap_err();

        assert_eq!(
            err,
            NavigationError::StepExecutionFailure {
                index: 2,
                step: RouteStep::MoveRight,
            }
        );
        assert_eq!(nav.executor().executed().len(), 3);
        assert_eq!(nav.clock().waits().len(), 2);
    }

    #[test]
    fn test_recovery_failure_skips_original_step() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（10,50）"]);
        recognizer.push_obstacle(&["无法通过"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::failing_at(0));
        let err = nav.move_to_target(Position::new(14, 50)).unwrap_err();

        assert_eq!(err, NavigationError::RerouteFailure { index: 0 });
        assert_eq!(nav.executor().executed(), &[RouteStep::MoveUp]);
        assert!(nav.clock().waits().is_empty());
    }

    #[test]
    fn test_already_at_target_only_verifies() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["裂隙（14,54）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        assert!(nav.move_to(14, 54));
        assert!(nav.executor().executed().is_empty());
        assert_eq!(nav.recognizer().captures(), 2);
    }

    #[test]
    fn test_verification_is_idempotent() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（13,50）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        let target = Position::new(14, 50);
        assert_eq!(nav.verify_arrival(target), nav.verify_arrival(target));
        assert_eq!(nav.verify_arrival(Position::new(13, 50)), Ok(Position::new(13, 50)));
        assert_eq!(nav.verify_arrival(Position::new(13, 50)), Ok(Position::new(13, 50)));
    }

    #[test]
    fn test_obstacle_check_precedes_every_step() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（0,0）"]);
        clear_checks(&mut recognizer, 3);
        recognizer.push_location(&["荒野（1,2）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        nav.move_to_target(Position::new(1, 2)).unwrap();

        let config = NavigatorConfig::default();
        let labels: Vec<&str> = nav
            .recognizer()
            .requests()
            .iter()
            .map(|(label, _)| label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                config.location_label.as_str(),
                config.obstacle_label.as_str(),
                config.obstacle_label.as_str(),
                config.obstacle_label.as_str(),
                config.location_label.as_str(),
            ]
        );
        assert_eq!(
            nav.executor().executed(),
            &[RouteStep::MoveRight, RouteStep::MoveDown, RouteStep::MoveDown]
        );
    }

    #[test]
    fn test_misread_coordinates_fall_back_to_later_fragment() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（1O,50）", "荒野（10,50）"]);
        clear_checks(&mut recognizer, 1);
        recognizer.push_location(&["荒野（1O,50）", "荒野（11,50）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::new());
        let report = nav.move_to_target(Position::new(11, 50)).unwrap();

        assert_eq!(report.start, Position::new(10, 50));
        assert_eq!(nav.executor().executed(), &[RouteStep::MoveRight]);
    }

    #[test]
    fn test_extreme_target_fails_without_overflow() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（-2147483648,0）"]);

        let mut nav = navigator(recognizer, ScriptedExecutor::failing_at(2));
        let err = nav.move_to_target(Position::new(i32::MAX, i32::MIN)).unwrap_err();

        assert_eq!(
            err,
            NavigationError::StepExecutionFailure {
                index: 2,
                step: RouteStep::MoveRight,
            }
        );
        assert_eq!(nav.executor().executed().len(), 3);
    }

    #[derive(Default)]
    struct EventLog {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl NavigationObserver for EventLog {
        fn on_route_planned(&mut self, _start: Position, _target: Position, route: &Route) {
            self.events.borrow_mut().push(format!("route {}", route.len()));
        }

        fn on_obstacle_detected(&mut self, index: usize, _step: RouteStep) {
            self.events.borrow_mut().push(format!("obstacle {}", index));
        }

        fn on_step_executed(&mut self, index: usize, step: RouteStep) {
            self.events
                .borrow_mut()
                .push(format!("step {} {}", index, step.as_str_name()));
        }

        fn on_navigation_finished(&mut self, outcome: &Result<NavigationReport, NavigationError>) {
            self.events
                .borrow_mut()
                .push(format!("finished {}", outcome.is_ok()));
        }
    }

    #[test]
    fn test_observer_sees_events_in_order() {
        let mut recognizer = ScriptedRecognizer::new();
        recognizer.push_location(&["荒野（5,5）"]);
        recognizer.push_obstacle(&["障碍物"]);
        recognizer.push_location(&["荒野（4,5）"]);

        let log = EventLog::default();
        let events = Rc::clone(&log.events);
        let mut nav = navigator(recognizer, ScriptedExecutor::new()).with_observer(log);
        nav.move_to_target(Position::new(4, 5)).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                "route 1".to_string(),
                "obstacle 0".to_string(),
                "step 0 moveLeft".to_string(),
                "finished true".to_string(),
            ]
        );
    }
}
