use std::collections::HashMap;

use vitrine_host::{FrameHandle, WidgetId};

use crate::controller::{TimelineController, TimelineMarkup, TimelineServices};

/// All timelines on a page, keyed by widget identity.
pub struct TimelineBoard {
    services: TimelineServices,
    timelines: HashMap<WidgetId, TimelineController>,
}

impl TimelineBoard {
    pub fn new(services: TimelineServices) -> Self {
        Self {
            services,
            timelines: HashMap::new(),
        }
    }

    /// Set up one widget. A widget seen before keeps its vertical offset and
    /// max offset.
    pub fn attach(&mut self, id: WidgetId, markup: TimelineMarkup) -> bool {
        let Some(mut timeline) = TimelineController::setup(id, markup, self.services.clone())
        else {
            return false;
        };
        if let Some(previous) = self.timelines.remove(&id) {
            log::debug!("timeline {id:?} re-attached at offset {}", previous.offset());
            timeline.adopt_offset(previous.drag_state());
        }
        self.timelines.insert(id, timeline);
        true
    }

    pub fn discover(
        &mut self,
        widgets: impl IntoIterator<Item = (WidgetId, TimelineMarkup)>,
    ) -> usize {
        let attached = widgets
            .into_iter()
            .map(|(id, markup)| self.attach(id, markup))
            .filter(|attached| *attached)
            .count();
        log::debug!("discovered {attached} timelines");
        attached
    }

    pub fn get(&self, id: WidgetId) -> Option<&TimelineController> {
        self.timelines.get(&id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut TimelineController> {
        self.timelines.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> bool {
        self.timelines
            .values_mut()
            .any(|timeline| timeline.on_animation_frame(handle))
    }
}
