// =============================================================================
// Sentiment Aggregator — trailing-window news sentiment to a verdict
// =============================================================================
//
// Structurally the news-side twin of the verdict aggregator: a pile of signed
// scores in, one label/score/confidence out. The provider returns articles
// unfiltered by date; the trailing window (5 days inclusive of today, UTC) is
// applied HERE so the cutoff is one place, not per provider.
//
// Having nothing to say is a defined success, never an error: both an empty
// upstream feed and a feed with no articles inside the window produce a
// "no data" report with a zero score, neutral label, and low confidence.
// =============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Confidence, SentimentLabel};

/// One scored article from the news provider.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSentiment {
    pub date: NaiveDate,
    pub title: String,
    pub summary: String,
    pub url: String,
    #[serde(rename = "overall_sentiment_label")]
    pub sentiment_label: String,
    #[serde(rename = "overall_sentiment_score")]
    pub sentiment_score: f64,
}

/// Average sentiment of one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub avg_sentiment: f64,
}

/// Overall sentiment read across the window.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentSummary {
    pub label: SentimentLabel,
    pub score: f64,
    pub confidence: Confidence,
    pub verdict: String,
}

/// Result of aggregating a symbol's recent news.
#[derive(Debug, Clone)]
pub enum SentimentReport {
    /// Nothing usable — either the feed was empty or no article fell inside
    /// the trailing window. Still a success.
    NoData {
        message: &'static str,
        summary: SentimentSummary,
    },
    Data {
        from_date: NaiveDate,
        to_date: NaiveDate,
        daily: Vec<DailySentiment>,
        articles: Vec<ArticleSentiment>,
        summary: SentimentSummary,
    },
}

/// Trailing window length in days (inclusive of today).
pub const WINDOW_DAYS: i64 = 5;

/// Aggregate `articles` over the trailing window ending at `today`.
///
/// Daily averages come back ascending by date; articles descending (newest
/// first). `today` is passed in rather than read from the clock so the
/// boundary behaviour is testable.
pub fn aggregate(articles: Vec<ArticleSentiment>, today: NaiveDate) -> SentimentReport {
    if articles.is_empty() {
        return no_data(
            "No recent news found",
            "Not enough news to determine sentiment.",
        );
    }

    let from_date = today - chrono::Duration::days(WINDOW_DAYS);
    let mut in_window: Vec<ArticleSentiment> = articles
        .into_iter()
        .filter(|a| a.date >= from_date && a.date <= today)
        .collect();

    if in_window.is_empty() {
        return no_data(
            "No news in last 5 days",
            "No recent sentiment activity detected.",
        );
    }

    // Newest first for the article list; stable so same-day order is kept.
    in_window.sort_by(|a, b| b.date.cmp(&a.date));

    // Group by calendar day; BTreeMap gives ascending date order for free.
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for article in &in_window {
        let entry = by_day.entry(article.date).or_insert((0.0, 0));
        entry.0 += article.sentiment_score;
        entry.1 += 1;
    }
    let daily: Vec<DailySentiment> = by_day
        .into_iter()
        .map(|(date, (sum, n))| DailySentiment {
            date,
            avg_sentiment: sum / n as f64,
        })
        .collect();

    let overall_score =
        in_window.iter().map(|a| a.sentiment_score).sum::<f64>() / in_window.len() as f64;

    let label = if overall_score > 0.2 {
        SentimentLabel::Bullish
    } else if overall_score < -0.2 {
        SentimentLabel::Bearish
    } else {
        SentimentLabel::Neutral
    };

    let strength = overall_score.abs();
    let confidence = if strength > 0.35 {
        Confidence::High
    } else if strength > 0.15 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let verdict = match label {
        SentimentLabel::Bullish => "Recent news sentiment suggests upward/positive influence.",
        SentimentLabel::Bearish => "Recent news sentiment suggests downward/negative influence.",
        SentimentLabel::Neutral => "News sentiment is mixed or neutral.",
    };

    SentimentReport::Data {
        from_date,
        to_date: today,
        daily,
        articles: in_window,
        summary: SentimentSummary {
            label,
            score: overall_score,
            confidence,
            verdict: verdict.to_string(),
        },
    }
}

fn no_data(message: &'static str, verdict: &str) -> SentimentReport {
    SentimentReport::NoData {
        message,
        summary: SentimentSummary {
            label: SentimentLabel::Neutral,
            score: 0.0,
            confidence: Confidence::Low,
            verdict: verdict.to_string(),
        },
    }
}
