//! Token-cost accounting for the text-generation API.

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use media_types::AiUsage;
use serde::Serialize;

/// Per-token USD pricing for a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_token: f64,
    pub output_per_token: f64,
}

// gpt-4o-mini list price: $0.150 / 1M input tokens, $0.600 / 1M output.
const GPT_4O_MINI: ModelPricing = ModelPricing {
    input_per_token: 0.150 / 1_000_000.0,
    output_per_token: 0.600 / 1_000_000.0,
};

/// Looks up pricing for a model name.
pub fn pricing_for(model: &str) -> Option<ModelPricing> {
    match model {
        "gpt-4o-mini" => Some(GPT_4O_MINI),
        _ => None,
    }
}

/// Estimated USD cost of one call. Unknown models are costed at zero.
pub fn estimated_cost(model: &str, prompt_tokens: i64, completion_tokens: i64) -> f64 {
    match pricing_for(model) {
        Some(pricing) => {
            prompt_tokens as f64 * pricing.input_per_token
                + completion_tokens as f64 * pricing.output_per_token
        }
        None => 0.0,
    }
}

/// Aggregated usage figures for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageStats {
    pub total_cost: f64,
    pub total_tokens: i64,
    pub total_requests: u64,
    pub today_cost: f64,
    pub month_cost: f64,
}

/// Sums usage rows. "Today" starts at UTC midnight and "this month" at the
/// first of the current UTC month.
pub fn summarize(records: &[AiUsage], now: DateTime<Utc>) -> UsageStats {
    let today = now.date_naive();
    let today_start = today.and_time(NaiveTime::MIN).and_utc();
    let month_start = today
        .with_day(1)
        .unwrap_or(today)
        .and_time(NaiveTime::MIN)
        .and_utc();

    let mut stats = UsageStats {
        total_requests: records.len() as u64,
        ..UsageStats::default()
    };
    for record in records {
        stats.total_cost += record.estimated_cost;
        stats.total_tokens += record.total_tokens;
        if record.created_at >= today_start {
            stats.today_cost += record.estimated_cost;
        }
        if record.created_at >= month_start {
            stats.month_cost += record.estimated_cost;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn usage_at(created_at: &str, cost: f64, tokens: i64) -> AiUsage {
        AiUsage {
            id: Uuid::new_v4(),
            user_id: None,
            model: "gpt-4o-mini".to_owned(),
            prompt_tokens: tokens / 2,
            completion_tokens: tokens - tokens / 2,
            total_tokens: tokens,
            estimated_cost: cost,
            request_type: "article_generation".to_owned(),
            metadata: None,
            created_at: DateTime::parse_from_rfc3339(created_at)
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn known_model_cost_follows_the_price_sheet() {
        // 1M input tokens cost $0.150, 1M output tokens $0.600.
        let cost = estimated_cost("gpt-4o-mini", 1_000_000, 1_000_000);
        assert!((cost - 0.750).abs() < 1e-9);

        let small = estimated_cost("gpt-4o-mini", 1_000, 2_000);
        assert!((small - (0.000150 + 0.0012)).abs() < 1e-9);
    }

    #[test]
    fn unknown_model_costs_zero() {
        assert_eq!(estimated_cost("some-future-model", 1_000, 1_000), 0.0);
    }

    #[test]
    fn summarize_totals_and_windows() {
        let now = DateTime::parse_from_rfc3339("2026-08-04T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let records = vec![
            usage_at("2026-08-04T09:00:00Z", 0.10, 1_000), // today
            usage_at("2026-08-02T09:00:00Z", 0.20, 2_000), // this month
            usage_at("2026-07-20T09:00:00Z", 0.40, 4_000), // older
        ];
        let stats = summarize(&records, now);
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.total_tokens, 7_000);
        assert!((stats.total_cost - 0.70).abs() < 1e-9);
        assert!((stats.today_cost - 0.10).abs() < 1e-9);
        assert!((stats.month_cost - 0.30).abs() < 1e-9);
    }

    #[test]
    fn summarize_of_nothing_is_all_zero() {
        let now = Utc::now();
        assert_eq!(summarize(&[], now), UsageStats::default());
    }

    #[test]
    fn midnight_boundary_counts_as_today() {
        let now = DateTime::parse_from_rfc3339("2026-08-04T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let stats = summarize(&[usage_at("2026-08-04T00:00:00Z", 0.05, 500)], now);
        assert!((stats.today_cost - 0.05).abs() < 1e-9);
    }
}
