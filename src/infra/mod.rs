mod backend;
mod observer;
mod types;

#[cfg(test)]
pub(crate) mod scripted;

pub use backend::{
    ActionExecutor, Clock, RecognitionRequest, RecognitionResult, Recognizer, SystemClock,
    TextFragment,
};
pub use observer::{DefaultObserver, NavigationObserver, NullObserver};
pub use types::{Position, Region};
