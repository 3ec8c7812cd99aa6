pub mod file;
pub mod stdin;

use facility_analytics_core::config::AnalyticsConfig;
use facility_analytics_core::PortfolioSnapshot;
use tracing::debug;

/// Load the portfolio snapshot from `--input`, falling back to stdin.
pub fn load_snapshot(path: Option<&str>) -> Result<PortfolioSnapshot, Box<dyn std::error::Error>> {
    let snapshot: PortfolioSnapshot = match path {
        Some(p) => file::read_structured(p)?,
        None => stdin::read_stdin()?
            .ok_or("A portfolio snapshot is required: pass --input <file> or pipe JSON on stdin")?,
    };
    debug!(
        facilities = snapshot.facilities.len(),
        period_records = snapshot.period_records.len(),
        scenarios = snapshot.scenarios.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Load analytics tunables, defaults when no file is given.
pub fn load_config(path: Option<&str>) -> Result<AnalyticsConfig, Box<dyn std::error::Error>> {
    let config: AnalyticsConfig = match path {
        Some(p) => file::read_structured(p)?,
        None => AnalyticsConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
