//! Unusual options activity alert

use super::{timestamp_line, AlertBuilder, Evaluation, FormattedAlert, OptionFields, BOT_SIGNATURE};
use crate::classify::Direction;
use crate::feeds::FeedType;
use crate::format::{format_confidence_bar, format_premium, format_thousands};
use crate::record::RawRecord;
use crate::scoring::EnsembleResult;
use chrono::DateTime;
use chrono_tz::Tz;

impl AlertBuilder {
    /// Alert for an unusual-activity record; direction comes from delta
    pub fn unusual_activity(&self, record: &RawRecord, now: DateTime<Tz>) -> Option<FormattedAlert> {
        self.assess_unusual_activity(record, now).into_alert()
    }

    pub fn assess_unusual_activity(&self, record: &RawRecord, now: DateTime<Tz>) -> Evaluation {
        let fields = OptionFields::extract(record);
        let direction = Direction::from_delta(fields.delta);

        let ensemble = match self.screen(&fields, direction) {
            Ok(ensemble) => ensemble,
            Err(suppression) => return Evaluation::Suppressed(suppression),
        };

        let whale = fields.is_whale();
        let text = render(&fields, &ensemble, whale, &now);

        Evaluation::Alert(FormattedAlert {
            feed: FeedType::UnusualActivity,
            symbol: fields.symbol,
            direction: ensemble.direction,
            score: ensemble.score,
            whale,
            text,
        })
    }
}

fn render(fields: &OptionFields, ensemble: &EnsembleResult, whale: bool, now: &DateTime<Tz>) -> String {
    let emoji = ensemble.direction.emoji();
    let (arrow, move_word) = match ensemble.direction {
        Direction::Bearish => ("🔴", "DOWN"),
        _ => ("🟢", "UP"),
    };

    let mut lines = Vec::with_capacity(32);
    lines.push(format!("{emoji} *COMBINED ML SIGNAL: {}* {emoji}", fields.symbol));
    lines.push(String::new());
    lines.push(format!(
        "📉 *Direction:* {} ({}% confidence)",
        ensemble.direction, ensemble.score
    ));
    if whale {
        lines.push(String::new());
        lines.push("✅ *Trigger:* Whale Trade".to_string());
    }
    lines.push(String::new());
    lines.push("📊 *Model Predictions:*".to_string());
    for (timeframe, score) in ensemble.predictions.iter() {
        lines.push(format!("{arrow} {timeframe}: {move_word} ({score}%)"));
    }
    lines.push(String::new());
    lines.push("💰 *Flow Summary:*".to_string());
    lines.push(format!("💰 Premium: {}", format_premium(fields.premium)));
    lines.push(format!(
        "🎯 Strike: {} {} | Exp: {} (DTE: {:.0})",
        fields.strike, fields.symbol_type, fields.expiration, fields.days_to_expiration
    ));
    lines.push(format!("Δ: {:.2} | Type: {}", fields.delta, fields.order_type_display()));
    lines.push(format!(
        "Vol: {} | OI: {} | Vol/OI: {:.1}x",
        format_thousands(fields.volume),
        format_thousands(fields.open_interest),
        fields.vol_over_oi
    ));
    lines.push(format!("IV: {:.1}%", fields.implied_volatility));
    if fields.darkpool_notional > 0.0 {
        lines.push(format!(
            "🏦 Darkpool Notional: {}",
            format_premium(fields.darkpool_notional)
        ));
    }
    lines.push(String::new());
    lines.push(format!("📈 *Conviction Score:* {}/100", ensemble.score));
    lines.push(format_confidence_bar(ensemble.score));
    lines.push(String::new());
    lines.push(timestamp_line(now));
    lines.push(BOT_SIGNATURE.to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixed_now, record};
    use super::super::Suppression;
    use super::*;
    use crate::config::AlertConfig;
    use serde_json::json;

    fn builder() -> AlertBuilder {
        AlertBuilder::new(AlertConfig::default())
    }

    #[test]
    fn test_whale_sweep_alerts() {
        let rec = record(json!({
            "baseSymbol": "XYZ",
            "symbolType": "Call",
            "strikePrice": 150,
            "expirationDate": "2024-06-15",
            "premium": 600000,
            "volume": 12500,
            "openInterest": 500,
            "volumeOpenInterestRatio": 25,
            "volatility": 48.3,
            "delta": 0.95,
            "daysToExpiration": 1,
            "type": "SWEEP",
            "darkpoolNotional": 0
        }));

        let alert = builder().unusual_activity(&rec, fixed_now()).expect("alert");
        assert_eq!(alert.feed, FeedType::UnusualActivity);
        assert_eq!(alert.symbol, "XYZ");
        assert_eq!(alert.direction, Direction::Bullish);
        assert_eq!(alert.score, 100);
        assert!(alert.whale);

        let expected = [
            "🟢 *COMBINED ML SIGNAL: XYZ* 🟢",
            "",
            "📉 *Direction:* BULLISH (100% confidence)",
            "",
            "✅ *Trigger:* Whale Trade",
            "",
            "📊 *Model Predictions:*",
            "🟢 5m: UP (100%)",
            "🟢 15m: UP (100%)",
            "🟢 30m: UP (100%)",
            "🟢 60m: UP (100%)",
            "🟢 EOD: UP (100%)",
            "",
            "💰 *Flow Summary:*",
            "💰 Premium: $600.0K",
            "🎯 Strike: 150 Call | Exp: 2024-06-15 (DTE: 1)",
            "Δ: 0.95 | Type: SWEEP",
            "Vol: 12,500 | OI: 500 | Vol/OI: 25.0x",
            "IV: 48.3%",
            "",
            "📈 *Conviction Score:* 100/100",
            "██████████",
            "",
            "🕒 10:31:02 EDT",
            "🤖 Option Trader ML v2.0",
        ]
        .join("\n");
        assert_eq!(alert.text, expected);
    }

    #[test]
    fn test_premium_floor_suppresses_everything_else() {
        let rec = record(json!({
            "baseSymbol": "XYZ",
            "premium": 10000,
            "volumeOpenInterestRatio": 50,
            "delta": 0.99,
            "daysToExpiration": 0,
            "type": "SWEEP BLOCK",
            "darkpoolNotional": 500_000_000
        }));

        match builder().assess_unusual_activity(&rec, fixed_now()) {
            Evaluation::Suppressed(Suppression::BelowPremium { premium, .. }) => assert_eq!(premium, 10_000.0),
            other => panic!("Expected premium suppression, got {other:?}"),
        }
    }

    #[test]
    fn test_low_conviction_suppressed() {
        let rec = record(json!({
            "baseSymbol": "XYZ",
            "premium": 60000,
            "volumeOpenInterestRatio": 1,
            "delta": 0.1,
            "daysToExpiration": 30,
            "type": "",
            "darkpoolNotional": 0
        }));

        match builder().assess_unusual_activity(&rec, fixed_now()) {
            Evaluation::Suppressed(Suppression::BelowConfidence { score, minimum }) => {
                assert_eq!(score, 12);
                assert_eq!(minimum, 70);
            }
            other => panic!("Expected confidence suppression, got {other:?}"),
        }
    }

    #[test]
    fn test_darkpool_boost_lifts_over_floor() {
        // timeframes score 80, 80, 80, 70, 60 for a rounded mean of 74
        let rec = record(json!({
            "baseSymbol": "QQQ",
            "premium": 300000,
            "volumeOpenInterestRatio": 12,
            "delta": 0.6,
            "daysToExpiration": 2,
            "darkpoolNotional": 60_000_000
        }));
        let config = AlertConfig {
            min_confidence: 85,
            ..AlertConfig::default()
        };
        let strict = AlertBuilder::new(config);

        let alert = strict.unusual_activity(&rec, fixed_now()).expect("boosted alert");
        assert!(alert.score >= 85);
        assert!(alert.text.contains("🏦 Darkpool Notional: $60.00M"));

        let mut without_boost = rec.clone();
        without_boost.0.insert("darkpoolNotional".into(), json!(0));
        assert!(strict.unusual_activity(&without_boost, fixed_now()).is_none());
    }

    #[test]
    fn test_bearish_ensemble_renders_down_arrows() {
        // Scores clear a lowered floor but average below 60
        let rec = record(json!({
            "baseSymbol": "IWM",
            "premium": 80000,
            "volumeOpenInterestRatio": 6,
            "delta": -0.55,
            "daysToExpiration": 3
        }));
        let lenient = AlertBuilder::new(AlertConfig {
            min_confidence: 30,
            ..AlertConfig::default()
        });

        let alert = lenient.unusual_activity(&rec, fixed_now()).expect("alert");
        assert_eq!(alert.direction, Direction::Bearish);
        assert!(alert.text.starts_with("🔴 *COMBINED ML SIGNAL: IWM* 🔴"));
        assert!(alert.text.contains("🔴 5m: DOWN ("));
        assert!(!alert.text.contains("Whale Trade"));
        assert!(!alert.text.contains("Darkpool"));
    }
}
