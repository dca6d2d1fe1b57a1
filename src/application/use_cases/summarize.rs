use crate::domain::{
    format_currency, parse_currency, AlertDistribution, AlertLevel, BatchSummary,
    BusinessIntelligenceSummary, ConversationCategory, DomainError, ResponseTime,
    RetentionAction, Sentiment, SentimentDistribution, SentimentResult,
};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn percentage(count: usize, total: usize, decimals: i32) -> f64 {
    round_to(count as f64 * 100.0 / total as f64, decimals)
}

fn count_where(results: &[SentimentResult], predicate: impl Fn(&SentimentResult) -> bool) -> usize {
    results.iter().filter(|r| predicate(r)).count()
}

/// Compute batch-level statistics over `results`.
///
/// Returns `InvalidInput` for an empty batch, which has no meaningful averages.
pub fn summarize(results: &[SentimentResult]) -> Result<BatchSummary, DomainError> {
    if results.is_empty() {
        return Err(DomainError::invalid_input(
            "cannot summarize an empty batch of results",
        ));
    }
    let total = results.len();

    let sentiments = |s: Sentiment| count_where(results, |r| r.sentiment() == s);
    let (positive, negative, neutral) = (
        sentiments(Sentiment::Positive),
        sentiments(Sentiment::Negative),
        sentiments(Sentiment::Neutral),
    );

    let alerts = |a: AlertLevel| count_where(results, |r| r.alert_level() == a);
    let (low, medium, high) = (
        alerts(AlertLevel::Low),
        alerts(AlertLevel::Medium),
        alerts(AlertLevel::High),
    );

    let mean = |value: fn(&SentimentResult) -> f64| {
        results.iter().map(value).sum::<f64>() / total as f64
    };

    let high_value_customers = count_where(results, |r| r.customer_value_tier().is_high_value());

    // Unparsable amounts count as zero.
    let total_savings: f64 = results
        .iter()
        .filter_map(|r| parse_currency(&r.cost_prediction().cost_saved))
        .sum();

    let category = |c: ConversationCategory| {
        count_where(results, |r| r.template_recommendation().primary_category == c)
    };

    Ok(BatchSummary {
        total_messages: total,
        sentiment_distribution: SentimentDistribution {
            positive,
            negative,
            neutral,
            positive_percentage: percentage(positive, total, 2),
            negative_percentage: percentage(negative, total, 2),
            neutral_percentage: percentage(neutral, total, 2),
        },
        alert_distribution: AlertDistribution {
            low,
            medium,
            high,
            low_percentage: percentage(low, total, 2),
            medium_percentage: percentage(medium, total, 2),
            high_percentage: percentage(high, total, 2),
        },
        high_priority_count: high,
        average_confidence: round_to(mean(|r| r.confidence_score()), 2),
        business_intelligence: BusinessIntelligenceSummary {
            average_churn_risk: round_to(mean(|r| f64::from(r.churn_probability())), 1),
            average_purchase_intent: round_to(mean(|r| f64::from(r.purchase_intent())), 1),
            high_value_customers,
            high_value_percentage: percentage(high_value_customers, total, 1),
            total_cost_savings: format_currency(total_savings),
            customers_needing_retention: count_where(results, |r| {
                r.retention_action() != RetentionAction::None
            }),
            immediate_response_required: count_where(results, |r| {
                r.response_prediction().best_response_time == ResponseTime::Immediate
            }),
            marketing_opportunities: category(ConversationCategory::Marketing),
            service_required: category(ConversationCategory::Service),
        },
    })
}
