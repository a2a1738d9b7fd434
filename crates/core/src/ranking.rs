//! Popular-article ranking windows.

use chrono::{DateTime, Duration, Utc};

use crate::error::MediaError;

/// Number of articles a ranking returns.
pub const RANKING_LIMIT: usize = 10;

/// Time window a ranking covers, ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl RankingPeriod {
    /// Start of the window ending at `now`: the last 24 hours, 7 days, or
    /// 30 days.
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            RankingPeriod::Daily => now - Duration::hours(24),
            RankingPeriod::Weekly => now - Duration::days(7),
            RankingPeriod::Monthly => now - Duration::days(30),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankingPeriod::Daily => "daily",
            RankingPeriod::Weekly => "weekly",
            RankingPeriod::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for RankingPeriod {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RankingPeriod::Daily),
            "weekly" => Ok(RankingPeriod::Weekly),
            "monthly" => Ok(RankingPeriod::Monthly),
            other => Err(MediaError::UnknownPeriod(other.to_owned())),
        }
    }
}

impl std::fmt::Display for RankingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn daily_window_is_twenty_four_hours() {
        let now = at("2026-08-04T12:00:00Z");
        assert_eq!(
            RankingPeriod::Daily.window_start(now),
            at("2026-08-03T12:00:00Z")
        );
    }

    #[test]
    fn weekly_window_is_seven_days() {
        let now = at("2026-08-04T12:00:00Z");
        assert_eq!(
            RankingPeriod::Weekly.window_start(now),
            at("2026-07-28T12:00:00Z")
        );
    }

    #[test]
    fn monthly_window_is_thirty_days() {
        let now = at("2026-08-04T12:00:00Z");
        assert_eq!(
            RankingPeriod::Monthly.window_start(now),
            at("2026-07-05T12:00:00Z")
        );
    }

    #[test]
    fn periods_parse_from_path_segments() {
        assert_eq!("daily".parse::<RankingPeriod>().unwrap(), RankingPeriod::Daily);
        assert_eq!("weekly".parse::<RankingPeriod>().unwrap(), RankingPeriod::Weekly);
        assert_eq!("monthly".parse::<RankingPeriod>().unwrap(), RankingPeriod::Monthly);
        assert!("hourly".parse::<RankingPeriod>().is_err());
        assert!("Daily".parse::<RankingPeriod>().is_err());
    }

    #[test]
    fn as_str_round_trips() {
        for period in [RankingPeriod::Daily, RankingPeriod::Weekly, RankingPeriod::Monthly] {
            assert_eq!(period.as_str().parse::<RankingPeriod>().unwrap(), period);
        }
    }
}
