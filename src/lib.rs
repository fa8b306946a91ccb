//! # tickboard
//!
//! Personal time dashboard: how much of today, this week, this month and
//! this year has elapsed, countdowns to fixed and lunar festivals, the end
//! of the workday and the next payday, plus a weather panel and a
//! light/dark theme flag.
//!
//! ## Modules
//!
//! - [`progress`]: Period windows and the elapsed/remaining/percent core
//! - [`festival`]: Festival rules, lunar calendar, workday and salary progress
//! - [`dashboard`]: Cards, calendar header and terminal rendering
//! - [`ticker`]: Clock abstraction and the periodic snapshot publisher
//! - [`weather`]: Weather webhook client and error banner
//! - [`theme`]: Persisted light/dark flag
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Live snapshot stream
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickboard::dashboard::{build_widgets, default_festivals, Dashboard};
//! use tickboard::festival::{FestivalResolver, SalaryRule, WorkdayRule};
//! use tickboard::ticker::{Clock, SystemClock};
//!
//! let widgets = build_widgets(
//!     &default_festivals(),
//!     WorkdayRule::default(),
//!     SalaryRule::default(),
//! );
//! let dashboard = Dashboard::new(widgets, FestivalResolver::default());
//!
//! let snapshot = dashboard.snapshot(SystemClock.now());
//! for card in &snapshot.cards {
//!     println!("{}: {:.1}%", card.title, card.percent);
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod festival;
pub mod logging;
pub mod progress;
pub mod theme;
pub mod ticker;
pub mod weather;
pub mod websocket;

// Re-export top-level types for convenience
pub use progress::{compute_progress, Breakdown, CountdownFormat, PeriodWindow, ProgressResult};

pub use festival::{FestivalResolver, FestivalRule, FestivalSpec, LunarCalendar, LunarDate};

pub use dashboard::{Card, Dashboard, DashboardSnapshot, WidgetSpec};

pub use ticker::{Clock, FixedClock, SystemClock, Ticker};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError};
