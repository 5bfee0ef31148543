use clap::Parser;
use crossbeam_channel::bounded;
use log::{LevelFilter, error, info, warn};
#[cfg(debug_assertions)]
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::{
    append::rolling_file::{
        RollingFileAppender,
        policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use macroquad::prelude::*;
use scoreboard_common::{config::ViewConfig, feed::FeedMessage};
use scoreboard_layout::{LiveModelSync, RenderEnvironment, ScaleStrategy};
use std::{error::Error, path::PathBuf};

mod config;
mod feed;
mod render;
mod surface;
mod team_row;

use config::AppConfig;
use render::{Renderer, Theme};
use surface::ScreenSurface;
use team_row::{RowRegistry, TeamRow};

const APP_NAME: &str = "scoreboard";
const FEED_CHANNEL_LEN: usize = 16;
/// Pixels scrolled per mouse wheel step
const SCROLL_STEP: f32 = 60.0;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,

    #[clap(long)]
    /// File to read the feed from instead of stdin, overrides the config file
    feed: Option<PathBuf>,

    #[clap(long)]
    /// View parameters as a query string, e.g. `servicesFrom=0&servicesTo=50&autoOpen=10`.
    /// Replaces the view section of the config file
    query: Option<String>,

    #[clap(long)]
    /// How scaling is applied: `zoom`, `transform` or `legacy`, overrides the config file
    render_env: Option<RenderEnvironment>,
}

#[macroquad::main(window_conf())]
async fn main() {
    let args = Cli::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to set up logging: {e}");
        return;
    }

    let mut config: AppConfig = match confy::load(APP_NAME, None) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to read config file, overwriting with default. Error: {e}");
            let config = AppConfig::default();
            if let Err(e) = confy::store(APP_NAME, None, &config) {
                error!("Failed to store the default config: {e}");
            }
            config
        }
    };
    if let Some(query) = &args.query {
        config.view = ViewConfig::from_query(query);
    }
    if let Some(feed) = args.feed {
        config.feed = Some(feed);
    }
    let render_env = args
        .render_env
        .unwrap_or_else(|| config.render_environment());
    let strategy = ScaleStrategy::probe(render_env);
    info!("Starting with {config:?}, rendering as {render_env} ({strategy:?})");

    let (tx, rx) = bounded::<FeedMessage>(FEED_CHANNEL_LEN);
    let feed_source = config.feed.clone();
    let feed_worker = std::thread::spawn(move || {
        feed::feed_thread(tx, feed_source);
    });
    let mut feed_ended = false;

    let mut sync: LiveModelSync<TeamRow> =
        LiveModelSync::new(&config.view, strategy, std::time::Instant::now());
    let mut rows = RowRegistry::default();
    let mut surface = ScreenSurface::new(screen_width());
    let mut renderer = Renderer::new(Theme::from_style(&config.view.style));

    loop {
        if !feed_ended && feed_worker.is_finished() {
            warn!("Feed thread stopped, keeping the last state on screen");
            feed_ended = true;
        }

        let now = std::time::Instant::now();
        while let Ok(msg) = rx.try_recv() {
            let scoreboard_update = matches!(msg, FeedMessage::UpdateScoreboard(_));
            if matches!(msg, FeedMessage::Start { .. }) {
                rows.clear();
            }
            if feed::dispatch(&mut sync, msg, now, &mut surface) && scoreboard_update {
                renderer.mark_update();
            }
        }

        if surface.set_outer_width(screen_width()) {
            sync.on_resize(&mut surface);
        }
        if surface.take_layout_request() {
            rows.remount(&mut sync);
        }
        sync.poll_timers(now, &mut surface);

        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            if let Some(index) = renderer.row_at(x, y) {
                sync.click_row(index);
            }
        }
        let (_, wheel) = mouse_wheel();
        if wheel != 0.0 {
            surface.scroll_by(-wheel.signum() * SCROLL_STEP, renderer.max_scroll(screen_height()));
        }

        renderer.draw(&sync, &rows, &surface);
        let sidebar = sync.compact_panel(screen_height()).map_or(0.0, |c| c.width);
        render::lay_out_container(&mut sync, &mut surface, sidebar);

        next_frame().await;
    }
}

fn init_logging(args: &Cli) -> Result<(), Box<dyn Error>> {
    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_base_path = match &args.log_location {
        Some(path) => path.clone(),
        None => {
            let mut path = directories::BaseDirs::new()
                .ok_or("Could not find a directory to store logs")?
                .data_local_dir()
                .to_path_buf();
            path.push("scoreboard-logs");
            path
        }
    };
    let mut log_path = log_base_path.clone();
    let mut archived_log_path = log_base_path.clone();
    log_path.push(format!("{APP_NAME}-log.txt"));
    archived_log_path.push(format!("{APP_NAME}-log-{{}}.txt.gz"));

    #[cfg(debug_assertions)]
    println!("Log path: {}", log_path.display());

    // Only log to the console in debug mode
    #[cfg(all(debug_assertions, not(target_os = "windows")))]
    let console_target = Target::Stderr;
    #[cfg(all(debug_assertions, target_os = "windows"))]
    let console_target = Target::Stdout; // Windows apps don't get a stderr handle
    #[cfg(debug_assertions)]
    let console = ConsoleAppender::builder()
        .target(console_target)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    // Setup the file log roller
    let roller = FixedWindowRoller::builder().build(
        archived_log_path
            .as_os_str()
            .to_str()
            .ok_or("Log path is not valid UTF-8")?,
        args.num_old_logs,
    )?;
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(log_path, Box::new(file_policy))?;

    // Setup the logging from all locations to use `LevelFilter::Error`
    let root = Root::builder().appender("file_appender");
    #[cfg(debug_assertions)]
    let root = root.appender("console");
    let root = root.build(LevelFilter::Error);

    // Setup the top level logging config
    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)));

    #[cfg(debug_assertions)]
    let log_config = log_config.appender(Appender::builder().build("console", Box::new(console)));

    // The display and its engine crates all log at `log_level`
    let log_config = log_config
        .logger(Logger::builder().build("scoreboard", log_level))
        .logger(Logger::builder().build("scoreboard_common", log_level))
        .logger(Logger::builder().build("scoreboard_layout", log_level))
        .build(root)?;

    log4rs::init_config(log_config)?;
    log_panics::init();
    Ok(())
}

fn window_conf() -> Conf {
    Conf {
        window_title: String::from("Scoreboard"),
        window_width: 1920,
        window_height: 1080,
        window_resizable: true,
        ..Default::default()
    }
}
