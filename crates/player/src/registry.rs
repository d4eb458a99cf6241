use std::cell::RefCell;
use std::rc::Rc;

use vitrine_host::{MediaElement, WidgetId};

struct Registered {
    id: WidgetId,
    media: Rc<dyn MediaElement>,
}

/// Every player on a page, so that starting one can pause the rest.
///
/// Append-only: players live as long as the page does.
#[derive(Default)]
pub struct PlaybackRegistry {
    sessions: RefCell<Vec<Registered>>,
}

impl PlaybackRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn register(&self, id: WidgetId, media: Rc<dyn MediaElement>) {
        log::debug!("registering player {id:?}");
        self.sessions.borrow_mut().push(Registered { id, media });
    }

    /// Request a pause on every registered player other than `id`.
    ///
    /// Each paused player answers with its own pause event. The list is
    /// snapshotted first so a host that dispatches that event synchronously
    /// may re-enter the registry.
    pub fn pause_all_except(&self, id: WidgetId) {
        let others: Vec<Rc<dyn MediaElement>> = self
            .sessions
            .borrow()
            .iter()
            .filter(|s| s.id != id)
            .map(|s| s.media.clone())
            .collect();

        for media in others {
            media.pause();
        }
    }

    /// Players whose media is currently playing.
    pub fn playing(&self) -> Vec<WidgetId> {
        self.sessions
            .borrow()
            .iter()
            .filter(|s| !s.media.is_paused())
            .map(|s| s.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.borrow().is_empty()
    }
}
