mod page;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use vitrine_config::Config;
use vitrine_host::sim::{AnalysisScript, ScriptedAnalysis};
use vitrine_host::{Key, KeyEvent, PageEnvironment, PointerEnd, PointerEvent, Rect, WheelEvent};

use page::Page;

/// Drive a page of audio players and a timeline over the in-memory host
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve the page from a file:// origin (no live analysis)
    #[arg(long)]
    file_origin: bool,

    /// Behave as if the browser has no audio analysis support
    #[arg(long)]
    no_analysis: bool,

    /// Start with reduced motion requested
    #[arg(long)]
    reduced_motion: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => vitrine_config::load_config(path)?,
        None => Config::load(),
    };

    let page_url = if args.file_origin {
        "file:///srv/site/index.html"
    } else {
        "https://example.org/index.html"
    };
    let analysis = if args.no_analysis {
        ScriptedAnalysis::new(AnalysisScript::Unsupported)
    } else {
        ScriptedAnalysis::new(AnalysisScript::Working)
            .with_samples(vec![128, 150, 190, 220, 190, 150, 128, 100, 60, 40, 60, 100])
    };

    let mut page = Page::new(&config, PageEnvironment::new(page_url, 2.0), Rc::new(analysis));
    page.set_reduced_motion(args.reduced_motion);

    run_players(&mut page)?;
    run_timeline(&mut page)?;
    Ok(())
}

fn run_players(page: &mut Page) -> Result<()> {
    let intro = page.add_player("https://example.org/audio/intro.mp3", "intro", 125.0)?;
    let outro = page.add_player("https://example.org/audio/outro.mp3", "outro", 8.0)?;

    page.toggle(intro)?;
    for _ in 0..3 {
        page.tick(0.5);
    }
    print_player(page, intro)?;

    let response = page
        .player(intro)?
        .on_scrubber_key(&KeyEvent::with_shift(Key::ArrowRight));
    page.pump_media();
    println!("scrubber key: {response:?}");
    page.player(intro)?
        .on_scrubber_click(240.0, Rect::new(40.0, 0.0, 400.0, 8.0));
    page.pump_media();
    print_player(page, intro)?;

    // starting the second player pauses the first
    page.toggle(outro)?;
    println!("playing: {:?}", page.players().playing());
    for _ in 0..20 {
        page.tick(0.5);
    }
    print_player(page, intro)?;
    print_player(page, outro)?;

    // window moved to a standard-density display
    page.resize(1.0);
    if let Some(surface) = page.surface(outro) {
        println!(
            "outro surface: {} strokes, scale {}",
            surface.stroke_count(),
            surface.scale()
        );
    }
    Ok(())
}

fn run_timeline(page: &mut Page) -> Result<()> {
    let id = page.add_timeline(4, Some("120"))?;
    let timeline = page.timeline(id)?;

    timeline.on_pointer_down(&PointerEvent::mouse(1, 400.0, 200.0));
    timeline.on_pointer_move(&PointerEvent::mouse(1, 250.0, 500.0));
    timeline.on_pointer_end(&PointerEvent::mouse(1, 250.0, 500.0), PointerEnd::Up);
    // the click that ends a drag does not toggle
    timeline.on_node_click(1);
    println!("after drag: {:?}", timeline.view());

    page.run_frame();
    let timeline = page.timeline(id)?;
    timeline.on_node_click(1);
    timeline.on_wheel(&WheelEvent::new(0.0, 120.0));
    println!("after click and wheel: {:?}", timeline.view());

    timeline.on_reset_click();
    println!("after reset: {:?}", timeline.view());
    if let Some(scroller) = page.scroller(id) {
        println!("scroll left: {}", scroller.left());
    }
    Ok(())
}

fn print_player(page: &mut Page, id: vitrine_host::WidgetId) -> Result<()> {
    let player = page.player(id)?;
    println!(
        "{} [{:?}] {} / {} ({})",
        player.track_name(),
        player.playback_state(),
        player.view().current_label,
        player.view().duration_label,
        player.view().progress_width,
    );
    Ok(())
}
