mod api;
mod app;
mod cli;
mod event;
mod feed;
mod fetch;
mod help;
mod keys;
mod logging;
mod settings;
mod theme;
mod time;
mod tui;
mod views;
mod widgets;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ratatui::layout::Rect;
use tracing::{info, warn};

use api::ApiClient;
use app::{App, Message};
use cli::{Cli, Commands, ConfigCommands, FetchArgs};
use event::Event;
use settings::Settings;
use theme::{ResolvedTheme, ThemeVariant, default_for_variant, detect_terminal_theme};
use tui::{EventHandler, Tui};

const TICK_RATE_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = settings::config_dir(cli.config_dir.as_ref());
    let _log_guard = config_dir
        .as_deref()
        .and_then(|dir| match logging::init(dir, cli.verbose) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Logging disabled: {e:#}");
                None
            }
        });

    let settings = config_dir
        .as_ref()
        .map(|dir| {
            let path = settings::settings_path(dir);
            Settings::load(&path).unwrap_or_else(|e| {
                eprintln!("Warning: {e:#}");
                Settings::default()
            })
        })
        .unwrap_or_default();

    let api_url = settings.resolve_api_url(cli.api_url.as_deref());
    let timeout = settings.resolve_timeout(cli.timeout);

    match &cli.command {
        Some(Commands::Config(args)) => {
            handle_config_command(&args.command, config_dir, &settings, &api_url, timeout.as_secs())
        }
        Some(Commands::Fetch(args)) => {
            let client = ApiClient::new(&api_url, timeout)?;
            run_fetch(args, &client).await
        }
        None => {
            let client = ApiClient::new(&api_url, timeout)?;
            run_tui(&cli, &settings, client).await
        }
    }
}

fn handle_config_command(
    command: &ConfigCommands,
    config_dir: Option<PathBuf>,
    settings: &Settings,
    api_url: &str,
    timeout_secs: u64,
) -> Result<()> {
    let config_dir = config_dir.context("Could not determine config directory")?;
    let path = settings::settings_path(&config_dir);
    match command {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            let settings = Settings {
                api_url: Some(api_url.to_string()),
                timeout_secs: Some(timeout_secs),
                theme: settings.theme,
                ..Settings::default()
            };
            settings.save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

async fn run_fetch(args: &FetchArgs, client: &ApiClient) -> Result<()> {
    info!(video_id = %args.video_id, pages = args.pages, api = %client.base_url(), "fetch");
    let now = chrono::Utc::now();
    let output = fetch::run(client, &args.video_id, args.pages, args.format, now).await?;
    println!("{output}");
    Ok(())
}

fn resolve_theme(cli: &Cli, settings: &Settings) -> ResolvedTheme {
    // Priority: CLI flag > settings file > terminal detection
    let variant = if cli.dark {
        ThemeVariant::Dark
    } else if cli.light {
        ThemeVariant::Light
    } else if let Some(variant) = settings.theme {
        variant
    } else {
        detect_terminal_theme()
    };
    default_for_variant(variant)
}

async fn run_tui(cli: &Cli, settings: &Settings, client: ApiClient) -> Result<()> {
    let theme = resolve_theme(cli, settings);
    info!(api = %client.base_url(), theme = %theme.name, variant = ?theme.variant, "starting ui");
    let mut app = App::new(client, theme, time::system_clock());
    if let Some(video_id) = &cli.video_id {
        app.start(video_id);
    }

    let mut terminal = tui::init()?;
    let result = event_loop(&mut terminal, &mut app).await;
    tui::restore()?;
    if let Err(e) = &result {
        warn!(error = %e, "ui exited with error");
    }
    result
}

async fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE_MS);
    let mut last_area: Option<Rect> = None;

    loop {
        terminal.draw(|frame| views::render(frame, app))?;

        // Track size changes: the comment viewport drives paging
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        if last_area != Some(area) {
            last_area = Some(area);
            app.update(Message::UpdateViewport(area));
        }

        // Poll async results (non-blocking)
        while let Ok(result) = app.result_rx.try_recv() {
            app.handle_async_result(result);
        }

        if app.should_quit {
            return Ok(());
        }

        match events.next().await? {
            Event::Key(key) => {
                if let Some(msg) = keys::handle_key(key, app) {
                    app.update(msg);
                }
            }
            Event::Mouse(mouse) => {
                if let Some(msg) = keys::handle_mouse(mouse, app) {
                    app.update(msg);
                }
            }
            Event::Tick | Event::Resize => {}
        }
    }
}
