//! Scripted backends for driving the navigator in tests without a game client.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::NavigatorConfig;
use crate::infra::{ActionExecutor, Clock, RecognitionRequest, RecognitionResult, Recognizer, Region};
use crate::navigation::RouteStep;

/// Answers location queries from one queue and every other label from another.
/// Once the location queue runs dry the last location keeps being reported;
/// an empty obstacle queue reports nothing.
pub struct ScriptedRecognizer {
    location_label: String,
    locations: VecDeque<Option<RecognitionResult>>,
    last_location: Option<RecognitionResult>,
    obstacles: VecDeque<Option<RecognitionResult>>,
    requests: Vec<(String, Option<Region>)>,
    captures: usize,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self {
            location_label: NavigatorConfig::default().location_label,
            locations: VecDeque::new(),
            last_location: None,
            obstacles: VecDeque::new(),
            requests: Vec::new(),
            captures: 0,
        }
    }

    pub fn push_location(&mut self, texts: &[&str]) {
        self.locations
            .push_back(Some(RecognitionResult::from_texts(texts.iter().copied())));
    }

    pub fn push_no_location(&mut self) {
        self.locations.push_back(None);
    }

    pub fn push_obstacle(&mut self, texts: &[&str]) {
        self.obstacles
            .push_back(Some(RecognitionResult::from_texts(texts.iter().copied())));
    }

    pub fn push_clear(&mut self) {
        self.obstacles.push_back(None);
    }

    pub fn requests(&self) -> &[(String, Option<Region>)] {
        &self.requests
    }

    pub fn captures(&self) -> usize {
        self.captures
    }
}

impl Recognizer for ScriptedRecognizer {
    type Image = usize;

    fn capture_scene(&mut self) -> usize {
        self.captures += 1;
        self.captures
    }

    fn recognize(
        &mut self,
        request: &RecognitionRequest<'_>,
        _image: &usize,
    ) -> Option<RecognitionResult> {
        self.requests.push((request.label.to_string(), request.region));

        if request.label == self.location_label {
            if let Some(next) = self.locations.pop_front() {
                self.last_location = next;
            }
            self.last_location.clone()
        } else {
            self.obstacles.pop_front().flatten()
        }
    }
}

/// Records every executed step; the call at `fail_at` (0-based) reports failure.
#[derive(Default)]
pub struct ScriptedExecutor {
    executed: Vec<RouteStep>,
    fail_at: Option<usize>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(call: usize) -> Self {
        Self {
            executed: Vec::new(),
            fail_at: Some(call),
        }
    }

    pub fn executed(&self) -> &[RouteStep] {
        &self.executed
    }
}

impl ActionExecutor for ScriptedExecutor {
    fn execute(&mut self, step: RouteStep) -> bool {
        let call = self.executed.len();
        self.executed.push(step);
        self.fail_at != Some(call)
    }
}

/// Clock that only records the requested delays.
#[derive(Default)]
pub struct RecordingClock {
    waits: Vec<Duration>,
}

impl RecordingClock {
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl Clock for RecordingClock {
    fn settle(&mut self, delay: Duration) {
        self.waits.push(delay);
    }
}
