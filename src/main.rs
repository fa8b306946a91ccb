//! tickboard CLI
//!
//! Terminal front end for the dashboard:
//! - Print a snapshot
//! - Watch it refresh every tick
//! - Follow one countdown to the millisecond
//! - Fetch the weather
//! - Read or flip the theme
//! - Generate a default config

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use tickboard::config::{generate_default_config, Config};
use tickboard::dashboard::render::{precise_countdown, render_snapshot};
use tickboard::dashboard::Dashboard;
use tickboard::festival::FestivalResolver;
use tickboard::progress::CountdownFormat;
use tickboard::theme::{Theme, ThemeSettings};
use tickboard::ticker::{Clock, SystemClock, Ticker};
use tickboard::weather::{WeatherClient, WeatherPanel};

#[derive(Parser)]
#[command(name = "tickboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Time progress, festival countdowns and weather in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Countdown text layout (standard, compact, detailed, short)
    #[arg(short, long, global = true)]
    pub format: Option<CountdownFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the dashboard once (default)
    Show,

    /// Redraw the dashboard on every tick until Ctrl+C
    Watch {
        /// Tick period in milliseconds (default: from config)
        #[arg(short, long)]
        interval_ms: Option<u64>,
    },

    /// Millisecond countdown to one card's target until Ctrl+C
    Countdown {
        /// Card key (e.g. valentine, spring-festival, payday)
        key: String,
    },

    /// Fetch current weather from the configured webhook
    Weather,

    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    tickboard::logging::init(&config.logging);

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {
            let dashboard = build_dashboard(&config, cli.format);
            let snapshot = dashboard.snapshot(SystemClock.now());
            print!("{}", render_snapshot(&snapshot));
        }

        Commands::Watch { interval_ms } => {
            let dashboard = Arc::new(build_dashboard(&config, cli.format));
            let period = interval_ms.unwrap_or(config.dashboard.tick_interval_ms);
            watch(dashboard, Duration::from_millis(period.max(1))).await;
        }

        Commands::Countdown { key } => {
            let dashboard = build_dashboard(&config, cli.format);
            let period = Duration::from_millis(config.dashboard.countdown_interval_ms);
            countdown(&dashboard, &key, period).await?;
        }

        Commands::Weather => {
            let client = WeatherClient::new(&config.weather)?;
            let mut panel = WeatherPanel::new(config.weather.banner_dismiss_secs);
            let now = SystemClock.now();

            if !panel.refresh(&client, now).await {
                let message = panel
                    .visible_banner(now)
                    .map(|b| b.message.clone())
                    .unwrap_or_else(|| "Weather unavailable".to_string());
                anyhow::bail!(message);
            }

            if let Some(report) = &panel.report {
                println!("City:        {}", report.city_text());
                println!("Temperature: {}", report.temperature_text());
                println!("Weather:     {}", report.weather.as_deref().unwrap_or("--"));
                println!("Humidity:    {}", report.humidity_text());
                println!("Wind:        {}", report.wind_dir.as_deref().unwrap_or("--"));
            }
        }

        Commands::Theme { action } => {
            let store_path = config.theme.resolved_path();
            let mut settings = ThemeSettings::load(&store_path)
                .with_context(|| format!("opening {}", store_path.display()))?;

            let theme = match action {
                None => settings.theme(),
                Some(ThemeAction::Toggle) => settings.toggle()?,
                Some(ThemeAction::Light) => set_theme(&mut settings, Theme::Light)?,
                Some(ThemeAction::Dark) => set_theme(&mut settings, Theme::Dark)?,
            };
            println!("{}", theme);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn build_dashboard(config: &Config, format: Option<CountdownFormat>) -> Dashboard {
    Dashboard::new(config.widgets(), FestivalResolver::default())
        .with_format(format.unwrap_or(config.dashboard.countdown_format))
}

fn set_theme(settings: &mut ThemeSettings, theme: Theme) -> anyhow::Result<Theme> {
    settings.set(theme)?;
    Ok(theme)
}

async fn watch(dashboard: Arc<Dashboard>, period: Duration) {
    let ticker = Arc::new(Ticker::new(dashboard, Arc::new(SystemClock), period));
    let mut snapshots = ticker.subscribe();
    let handle = Arc::clone(&ticker).start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            published = snapshots.recv() => match published {
                Ok(snapshot) => {
                    // Clear screen, cursor home
                    print!("\x1b[2J\x1b[H{}", render_snapshot(&snapshot));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Renderer fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    ticker.stop();
    handle.abort();
}

async fn countdown(dashboard: &Dashboard, key: &str, period: Duration) -> anyhow::Result<()> {
    let widget = dashboard
        .widgets()
        .iter()
        .find(|w| w.key() == key)
        .with_context(|| format!("no card named {}", key))?;

    let card = dashboard.card(widget, SystemClock.now());
    let target = card
        .target
        .with_context(|| format!("{} has no countdown target", card.title))?;

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = interval.tick() => {
                let now = SystemClock.now();
                write!(stdout, "\r{}", precise_countdown(&card.title, target, now))?;
                stdout.flush()?;
                if now >= target {
                    break;
                }
            }
        }
    }

    writeln!(stdout)?;
    Ok(())
}
