use std::collections::HashMap;
use std::rc::Rc;

use vitrine_host::{FrameHandle, MediaEvent, WidgetId};

use crate::controller::{PlayerController, PlayerMarkup, PlayerServices};
use crate::registry::PlaybackRegistry;

/// All players on a page, keyed by widget identity.
pub struct PlayerDeck {
    services: PlayerServices,
    players: HashMap<WidgetId, PlayerController>,
}

impl PlayerDeck {
    pub fn new(services: PlayerServices) -> Self {
        Self {
            services,
            players: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &Rc<PlaybackRegistry> {
        &self.services.registry
    }

    /// Set up and register one widget. Returns `false` if the widget is
    /// already attached or its markup is incomplete.
    pub fn attach(&mut self, id: WidgetId, markup: PlayerMarkup) -> bool {
        if self.players.contains_key(&id) {
            return false;
        }
        let Some(player) = PlayerController::setup(id, markup, self.services.clone()) else {
            return false;
        };
        self.services.registry.register(id, player.media().clone());
        self.players.insert(id, player);
        true
    }

    /// Attach every widget found on the page; returns how many were set up.
    pub fn discover(
        &mut self,
        widgets: impl IntoIterator<Item = (WidgetId, PlayerMarkup)>,
    ) -> usize {
        let attached = widgets
            .into_iter()
            .map(|(id, markup)| self.attach(id, markup))
            .filter(|attached| *attached)
            .count();
        log::debug!("discovered {attached} audio widgets");
        attached
    }

    pub fn get(&self, id: WidgetId) -> Option<&PlayerController> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut PlayerController> {
        self.players.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn ids(&self) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self.players.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn dispatch(&mut self, id: WidgetId, event: MediaEvent) {
        if let Some(player) = self.players.get_mut(&id) {
            player.on_media_event(event);
        }
    }

    /// Hand a fired frame to whichever player scheduled it.
    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> bool {
        self.players
            .values_mut()
            .any(|player| player.on_animation_frame(handle))
    }

    pub fn on_resize(&mut self, device_pixel_ratio: f64) {
        for player in self.players.values_mut() {
            player.on_resize(device_pixel_ratio);
        }
    }

    /// Players whose media is currently playing.
    pub fn playing(&self) -> Vec<WidgetId> {
        self.services.registry.playing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_config::PlayerConfig;
    use vitrine_host::sim::{
        AnalysisScript, ManualScheduler, RecordingSurface, ScriptedAnalysis, SimMedia,
    };
    use vitrine_host::{MediaElement, MotionPreference, PageEnvironment};

    struct Page {
        deck: PlayerDeck,
        media: Vec<(WidgetId, Rc<SimMedia>)>,
        scheduler: Rc<ManualScheduler>,
    }

    impl Page {
        fn with_players(count: u64) -> Self {
            let scheduler = ManualScheduler::new();
            let services = PlayerServices {
                registry: PlaybackRegistry::new(),
                scheduler: scheduler.clone(),
                analysis: Rc::new(ScriptedAnalysis::new(AnalysisScript::Working)),
                motion: MotionPreference::new(false),
                env: PageEnvironment::new("https://example.org/", 1.0),
                config: Rc::new(PlayerConfig::default()),
            };
            let mut deck = PlayerDeck::new(services);
            let mut media = Vec::new();
            let widgets: Vec<(WidgetId, PlayerMarkup)> = (1..=count)
                .map(|n| {
                    let id = WidgetId(n);
                    let element = SimMedia::new(format!("https://example.org/{n}.mp3"));
                    media.push((id, element.clone()));
                    let markup = PlayerMarkup::complete(
                        element,
                        Box::new(RecordingSurface::new(120.0, 30.0)),
                    );
                    (id, markup)
                })
                .collect();
            assert_eq!(deck.discover(widgets), count as usize);
            Self {
                deck,
                media,
                scheduler,
            }
        }

        fn media(&self, id: WidgetId) -> &Rc<SimMedia> {
            &self.media.iter().find(|(m, _)| *m == id).expect("media").1
        }

        fn pump(&mut self) {
            loop {
                let mut delivered = false;
                for (id, media) in &self.media {
                    for event in media.take_events() {
                        delivered = true;
                        self.deck.dispatch(*id, event);
                    }
                }
                if !delivered {
                    break;
                }
            }
        }

        fn toggle(&mut self, id: WidgetId) {
            self.deck.get_mut(id).expect("player").on_toggle_click();
            self.pump();
        }
    }

    #[test]
    fn test_discover_skips_incomplete_markup() {
        let services = PlayerServices {
            registry: PlaybackRegistry::new(),
            scheduler: ManualScheduler::new(),
            analysis: Rc::new(ScriptedAnalysis::new(AnalysisScript::Working)),
            motion: MotionPreference::default(),
            env: PageEnvironment::default(),
            config: Rc::new(PlayerConfig::default()),
        };
        let mut deck = PlayerDeck::new(services);
        let complete = PlayerMarkup::complete(
            SimMedia::new("a.mp3"),
            Box::new(RecordingSurface::new(10.0, 10.0)),
        );
        let incomplete = PlayerMarkup::default();

        let attached = deck.discover(vec![(WidgetId(1), complete), (WidgetId(2), incomplete)]);
        assert_eq!(attached, 1);
        assert_eq!(deck.ids(), vec![WidgetId(1)]);
        assert_eq!(deck.registry().len(), 1);
    }

    #[test]
    fn test_attach_twice_is_rejected() {
        let mut page = Page::with_players(1);
        let markup = PlayerMarkup::complete(
            SimMedia::new("again.mp3"),
            Box::new(RecordingSurface::new(10.0, 10.0)),
        );
        assert!(!page.deck.attach(WidgetId(1), markup));
        assert_eq!(page.deck.registry().len(), 1);
    }

    #[test]
    fn test_playing_one_pauses_the_others() {
        let mut page = Page::with_players(3);
        page.toggle(WidgetId(1));
        assert_eq!(page.deck.playing(), vec![WidgetId(1)]);

        page.toggle(WidgetId(3));
        assert_eq!(page.deck.playing(), vec![WidgetId(3)]);
        let first = page.deck.get(WidgetId(1)).expect("player");
        assert!(!first.view().toggle_playing);

        page.toggle(WidgetId(2));
        assert_eq!(page.deck.playing(), vec![WidgetId(2)]);
    }

    #[test]
    fn test_exclusive_playback_over_toggle_sequences() {
        let mut page = Page::with_players(4);
        let sequence = [1, 2, 2, 3, 1, 4, 4, 4, 2, 1, 3, 3];
        for n in sequence {
            page.toggle(WidgetId(n));
            let playing = page.deck.playing();
            assert!(playing.len() <= 1, "{playing:?} playing after toggling {n}");

            let shown: Vec<WidgetId> = page
                .deck
                .ids()
                .into_iter()
                .filter(|id| page.deck.get(*id).is_some_and(|p| p.view().toggle_playing))
                .collect();
            assert_eq!(shown, playing);
        }
    }

    #[test]
    fn test_only_playing_player_keeps_a_frame() {
        let mut page = Page::with_players(2);
        page.toggle(WidgetId(1));
        page.toggle(WidgetId(2));

        assert_eq!(page.scheduler.pending().len(), 1);
        for handle in page.scheduler.take_due() {
            assert!(page.deck.on_animation_frame(handle));
        }
        let first = page.deck.get(WidgetId(1)).expect("player");
        let second = page.deck.get(WidgetId(2)).expect("player");
        assert!(first.visualizer().pending_frame().is_none());
        assert!(second.visualizer().pending_frame().is_some());
        assert!(page.media(WidgetId(1)).is_paused());
    }
}
