use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(
        "download reserve ({reserve_secs}s) must be shorter than the cycle interval ({interval_secs}s)"
    )]
    ReserveExceedsInterval { reserve_secs: u64, interval_secs: u64 },

    #[error("cycle interval must be non-zero")]
    ZeroInterval,
}

/// Reject timing budgets that would leave the cycle with no download
/// window at all. Remote endpoint settings are intentionally not
/// validated; missing values surface as failed coordinator calls.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    let interval = config.collector.cycle_interval_secs;
    let reserve = config.collector.download_reserve_secs;

    if interval == 0 {
        return Err(ValidationError::ZeroInterval);
    }
    if reserve >= interval {
        return Err(ValidationError::ReserveExceedsInterval {
            reserve_secs: reserve,
            interval_secs: interval,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_reserve_must_fit_in_interval() {
        let mut config = Config::default();
        config.collector.cycle_interval_secs = 60;
        config.collector.download_reserve_secs = 60;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::ReserveExceedsInterval { .. })
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.collector.cycle_interval_secs = 0;
        config.collector.download_reserve_secs = 0;

        assert!(matches!(validate(&config), Err(ValidationError::ZeroInterval)));
    }
}
