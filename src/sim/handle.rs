use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::infra::{
    ActionExecutor, RecognitionRequest, RecognitionResult, Recognizer, TextFragment,
};
use crate::navigation::RouteStep;
use crate::sim::{GridWorld, ScreenText};

/// Shared handle to a [`GridWorld`]. One clone serves as recognizer, another as executor.
#[derive(Clone)]
pub struct SimHandle {
    world: Rc<RefCell<GridWorld>>,
}

impl SimHandle {
    pub fn new(world: GridWorld) -> Self {
        Self {
            world: Rc::new(RefCell::new(world)),
        }
    }

    pub fn with_world<T>(&self, f: impl FnOnce(&GridWorld) -> T) -> T {
        f(&self.world.borrow())
    }

    pub fn with_world_mut<T>(&self, f: impl FnOnce(&mut GridWorld) -> T) -> T {
        f(&mut self.world.borrow_mut())
    }
}

impl Recognizer for SimHandle {
    type Image = Vec<ScreenText>;

    fn capture_scene(&mut self) -> Vec<ScreenText> {
        self.world.borrow().screen()
    }

    fn recognize(
        &mut self,
        request: &RecognitionRequest<'_>,
        image: &Vec<ScreenText>,
    ) -> Option<RecognitionResult> {
        let fragments: Vec<TextFragment> = image
            .iter()
            .filter(|t| request.region.is_none_or(|roi| roi.contains(t.x, t.y)))
            .map(|t| TextFragment::new(t.text.clone()))
            .collect();

        trace!("{}: {} fragments", request.label, fragments.len());
        if fragments.is_empty() {
            None
        } else {
            Some(RecognitionResult::new(fragments))
        }
    }
}

impl ActionExecutor for SimHandle {
    fn execute(&mut self, step: RouteStep) -> bool {
        self.world.borrow_mut().apply(step)
    }
}
