use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use vitrine_config::Config;
use vitrine_host::sim::{ManualScheduler, RecordingSurface, SimMedia, SimScroller};
use vitrine_host::{AnalysisBackend, MediaElement, MotionPreference, PageEnvironment, WidgetId};
use vitrine_player::{PlaybackRegistry, PlayerController, PlayerDeck, PlayerMarkup, PlayerServices};
use vitrine_timeline::{TimelineBoard, TimelineController, TimelineMarkup, TimelineServices};

/// A page of widgets over the in-memory host. Owns the host side of every
/// element and routes its events into the controllers.
pub struct Page {
    scheduler: Rc<ManualScheduler>,
    motion: MotionPreference,
    players: PlayerDeck,
    timelines: TimelineBoard,
    media: Vec<(WidgetId, Rc<SimMedia>)>,
    surfaces: HashMap<WidgetId, RecordingSurface>,
    scrollers: HashMap<WidgetId, SimScroller>,
    next_id: u64,
}

impl Page {
    pub fn new(config: &Config, env: PageEnvironment, analysis: Rc<dyn AnalysisBackend>) -> Self {
        let scheduler = ManualScheduler::new();
        let motion = MotionPreference::default();
        let players = PlayerDeck::new(PlayerServices {
            registry: PlaybackRegistry::new(),
            scheduler: scheduler.clone(),
            analysis,
            motion: motion.clone(),
            env,
            config: Rc::new(config.player.clone()),
        });
        let timelines = TimelineBoard::new(TimelineServices {
            scheduler: scheduler.clone(),
            config: Rc::new(config.timeline.clone()),
        });
        Self {
            scheduler,
            motion,
            players,
            timelines,
            media: Vec::new(),
            surfaces: HashMap::new(),
            scrollers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_widget(&mut self) -> WidgetId {
        self.next_id += 1;
        WidgetId(self.next_id)
    }

    /// Add an audio widget whose media reports `duration` once attached.
    pub fn add_player(&mut self, src: &str, track_name: &str, duration: f64) -> Result<WidgetId> {
        let id = self.next_widget();
        let media = SimMedia::new(src);
        let surface = RecordingSurface::new(320.0, 48.0);
        let markup = PlayerMarkup::complete(media.clone(), Box::new(surface.clone()))
            .with_track_name(track_name);
        if !self.players.attach(id, markup) {
            bail!("audio widget {id:?} for {src} could not be set up");
        }
        self.media.push((id, media.clone()));
        self.surfaces.insert(id, surface);

        media.load_metadata(duration);
        self.pump_media();
        Ok(id)
    }

    pub fn add_timeline(&mut self, nodes: usize, max_offset: Option<&str>) -> Result<WidgetId> {
        let id = self.next_widget();
        let scroller = SimScroller::new(1200.0);
        let mut markup = TimelineMarkup::new(Box::new(scroller.clone()), nodes);
        markup.max_offset = max_offset.map(str::to_string);
        if !self.timelines.attach(id, markup) {
            bail!("timeline {id:?} could not be set up");
        }
        self.scrollers.insert(id, scroller);
        Ok(id)
    }

    pub fn player(&mut self, id: WidgetId) -> Result<&mut PlayerController> {
        self.players
            .get_mut(id)
            .with_context(|| format!("no audio widget {id:?}"))
    }

    pub fn timeline(&mut self, id: WidgetId) -> Result<&mut TimelineController> {
        self.timelines
            .get_mut(id)
            .with_context(|| format!("no timeline {id:?}"))
    }

    pub fn players(&self) -> &PlayerDeck {
        &self.players
    }

    pub fn surface(&self, id: WidgetId) -> Option<&RecordingSurface> {
        self.surfaces.get(&id)
    }

    pub fn scroller(&self, id: WidgetId) -> Option<&SimScroller> {
        self.scrollers.get(&id)
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.motion.set_reduced(reduced);
    }

    /// Press a player's toggle and let the media react.
    pub fn toggle(&mut self, id: WidgetId) -> Result<()> {
        self.player(id)?.on_toggle_click();
        self.pump_media();
        Ok(())
    }

    /// Deliver queued media events until every element is quiet.
    pub fn pump_media(&mut self) {
        loop {
            let mut delivered = 0;
            for (id, media) in &self.media {
                for event in media.take_events() {
                    delivered += 1;
                    self.players.dispatch(*id, event);
                }
            }
            if delivered == 0 {
                break;
            }
        }
    }

    /// Fire every pending animation frame once. Returns how many fired.
    pub fn run_frame(&mut self) -> usize {
        let due = self.scheduler.take_due();
        for handle in &due {
            if !self.players.on_animation_frame(*handle) {
                self.timelines.on_animation_frame(*handle);
            }
        }
        due.len()
    }

    /// Let `seconds` of playback pass, then repaint.
    pub fn tick(&mut self, seconds: f64) -> usize {
        for (_, media) in &self.media {
            if !media.is_paused() {
                media.advance(seconds);
            }
        }
        self.pump_media();
        self.run_frame()
    }

    pub fn resize(&mut self, device_pixel_ratio: f64) {
        self.players.on_resize(device_pixel_ratio);
    }
}
