use std::thread;
use std::time::Duration;

use crate::infra::Region;
use crate::navigation::RouteStep;

/// One unit of recognized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Fragments a recognition produced for one label, in recognition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionResult {
    pub fragments: Vec<TextFragment>,
}

impl RecognitionResult {
    pub fn new(fragments: Vec<TextFragment>) -> Self {
        Self { fragments }
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(TextFragment::new).collect())
    }
}

/// Which recognition to run and, optionally, the screen area it is limited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionRequest<'a> {
    pub label: &'a str,
    pub region: Option<Region>,
}

impl<'a> RecognitionRequest<'a> {
    pub fn new(label: &'a str, region: Option<Region>) -> Self {
        Self { label, region }
    }
}

/// Scene capture plus text recognition. Both calls block until done.
pub trait Recognizer {
    type Image;

    fn capture_scene(&mut self) -> Self::Image;

    /// Returns `None` when nothing matches the request.
    fn recognize(
        &mut self,
        request: &RecognitionRequest<'_>,
        image: &Self::Image,
    ) -> Option<RecognitionResult>;
}

/// Primitive action execution. Returns `false` when the action could not be performed.
pub trait ActionExecutor {
    fn execute(&mut self, step: RouteStep) -> bool;
}

/// Blocking wait used after every executed action.
pub trait Clock {
    fn settle(&mut self, delay: Duration);
}

/// Real-time clock backed by `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn settle(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
