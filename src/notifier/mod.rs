pub mod timer;
pub mod worker;

use std::fmt;
use std::time::Duration;

pub use timer::{Timer, TokioTimer};
pub use worker::{spawn_notifier, spawn_notifier_with_timer, NotifierHandle};

pub type NoticeAction<T> = Box<dyn FnOnce(&mut T) + Send>;

/// One step of a sequence: run `action`, then hold for `hold` before the next step.
pub struct Notice<T> {
    action: NoticeAction<T>,
    hold: Duration,
}

impl<T> Notice<T> {
    pub fn new<F>(action: F, hold: Duration) -> Self
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        Self {
            action: Box::new(action),
            hold,
        }
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub(crate) fn into_parts(self) -> (NoticeAction<T>, Duration) {
        (self.action, self.hold)
    }
}

impl<T> fmt::Debug for Notice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notice").field("hold", &self.hold).finish()
    }
}

pub type Sequence<T> = Vec<Notice<T>>;
