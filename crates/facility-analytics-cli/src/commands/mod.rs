pub mod charts;
pub mod portfolio;
pub mod risk;
pub mod scenarios;

use clap::Args;
use facility_analytics_core::aggregation::totals::AggregationWindow;
use facility_analytics_core::aggregation::years::reporting_year;
use facility_analytics_core::config::AnalyticsConfig;
use facility_analytics_core::PortfolioSnapshot;
use tracing::warn;

/// Everything a report needs besides its own flags.
pub struct Context {
    pub snapshot: PortfolioSnapshot,
    pub config: AnalyticsConfig,
}

/// Reporting year selector
#[derive(Args)]
pub struct YearArgs {
    /// Reporting year (defaults to the latest year with period data)
    #[arg(long)]
    pub year: Option<i32>,
}

/// Year selector for reports that can also span every year on record
#[derive(Args)]
pub struct WindowArgs {
    /// Reporting year (defaults to the latest year with period data)
    #[arg(long, conflicts_with = "all_years")]
    pub year: Option<i32>,

    /// Aggregate over every year on record
    #[arg(long)]
    pub all_years: bool,
}

/// Explicit year, or the most recent year with data (the current calendar
/// year when the snapshot has none).
pub fn resolve_year(snapshot: &PortfolioSnapshot, year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| reporting_year(snapshot))
}

/// Explicit year, every year on record, or the most recent year with data.
/// A snapshot without period data spans every year, so reports degrade to
/// zeros.
pub fn resolve_window(snapshot: &PortfolioSnapshot, args: &WindowArgs) -> AggregationWindow {
    if args.all_years {
        return AggregationWindow::all();
    }
    match args.year {
        Some(y) => AggregationWindow::year(y),
        None if snapshot.period_records.is_empty() => {
            warn!("no period data on record; aggregating over every year");
            AggregationWindow::all()
        }
        None => AggregationWindow::year(reporting_year(snapshot)),
    }
}
