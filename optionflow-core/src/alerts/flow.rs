//! Smart money options flow alert

use super::{timestamp_line, AlertBuilder, Evaluation, FormattedAlert, OptionFields, BOT_SIGNATURE};
use crate::classify::Direction;
use crate::feeds::FeedType;
use crate::format::{format_confidence_bar, format_premium, format_thousands};
use crate::record::RawRecord;
use crate::scoring::EnsembleResult;
use chrono::DateTime;
use chrono_tz::Tz;

impl AlertBuilder {
    /// Alert for an options-flow record; direction is the feed's own label
    pub fn options_flow(&self, record: &RawRecord, now: DateTime<Tz>) -> Option<FormattedAlert> {
        self.assess_options_flow(record, now).into_alert()
    }

    pub fn assess_options_flow(&self, record: &RawRecord, now: DateTime<Tz>) -> Evaluation {
        let fields = OptionFields::extract(record);
        let direction = Direction::from_label(&fields.direction_label);

        let ensemble = match self.screen(&fields, direction) {
            Ok(ensemble) => ensemble,
            Err(suppression) => return Evaluation::Suppressed(suppression),
        };

        let text = render(&fields, &ensemble, &now);

        Evaluation::Alert(FormattedAlert {
            feed: FeedType::OptionsFlow,
            whale: fields.is_whale(),
            symbol: fields.symbol,
            direction: ensemble.direction,
            score: ensemble.score,
            text,
        })
    }
}

fn render(fields: &OptionFields, ensemble: &EnsembleResult, now: &DateTime<Tz>) -> String {
    let emoji = ensemble.direction.emoji();

    let mut lines = Vec::with_capacity(24);
    lines.push(format!("{emoji} *SMART MONEY FLOW - {}* {emoji}", ensemble.direction));
    lines.push("🎯 *UNUSUAL CONVICTION*".to_string());
    lines.push(String::new());
    lines.push(format!("*{} {} {}*", fields.symbol, fields.strike, fields.expiration));
    lines.push(format!("💲 Premium: {}", format_premium(fields.premium)));
    lines.push(format!(
        "📅 Exp: {} (DTE: {:.0})",
        fields.expiration, fields.days_to_expiration
    ));
    lines.push(String::new());
    lines.push(format!(
        "📍 Δ: {:.3} | Type: {} | Exch: {}",
        fields.delta,
        fields.order_type_display(),
        fields.exchange
    ));
    lines.push(format!(
        "📈 Vol: {} | OI: {} ({:.1}x)",
        format_thousands(fields.volume),
        format_thousands(fields.open_interest),
        fields.vol_over_oi
    ));
    if fields.darkpool_notional > 0.0 {
        lines.push(format!(
            "🏦 Darkpool Notional: {}",
            format_premium(fields.darkpool_notional)
        ));
    }
    lines.push(String::new());
    lines.push(format!("📊 *Conviction Score:* {}/100", ensemble.score));
    lines.push(format_confidence_bar(ensemble.score));
    lines.push(String::new());
    lines.push(
        "⚡ Quick Take: UNUSUAL CONVICTION - Multiple signals align with flow direction.".to_string(),
    );
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

    fn block_print(direction: &str) -> RawRecord {
        record(json!({
            "baseSymbol": "NVDA",
            "strikePrice": "120",
            "expirationDate": "2024-06-14",
            "premium": "1,500,000",
            "volume": "8,200",
            "openInterest": 310,
            "volumeOpenInterestRatio": "26.45",
            "delta": 0.412,
            "daysToExpiration": 0,
            "tradeType": "Block",
            "exchange": "CBOE",
            "direction": direction,
            "darkpoolNotional": 12_000_000
        }))
    }

    #[test]
    fn test_block_print_alert_text() {
        let alert = builder().options_flow(&block_print("bullish"), fixed_now()).expect("alert");
        assert_eq!(alert.feed, FeedType::OptionsFlow);
        assert_eq!(alert.direction, Direction::Bullish);
        assert_eq!(alert.score, 100);

        let expected = [
            "🟢 *SMART MONEY FLOW - BULLISH* 🟢",
            "🎯 *UNUSUAL CONVICTION*",
            "",
            "*NVDA 120 2024-06-14*",
            "💲 Premium: $1.50M",
            "📅 Exp: 2024-06-14 (DTE: 0)",
            "",
            "📍 Δ: 0.412 | Type: Block | Exch: CBOE",
            "📈 Vol: 8,200 | OI: 310 (26.4x)",
            "🏦 Darkpool Notional: $12.00M",
            "",
            "📊 *Conviction Score:* 100/100",
            "██████████",
            "",
            "⚡ Quick Take: UNUSUAL CONVICTION - Multiple signals align with flow direction.",
            "",
            "🕒 10:31:02 EDT",
            "🤖 Option Trader ML v2.0",
        ]
        .join("\n");
        assert_eq!(alert.text, expected);
    }

    #[test]
    fn test_direction_label_trusted_over_delta() {
        // Delta alone reads bullish; an unlabeled record loses the direction bonus
        let rec = record(json!({
            "baseSymbol": "META",
            "premium": 260000,
            "volumeOpenInterestRatio": 10,
            "delta": 0.75,
            "daysToExpiration": 3
        }));
        let lenient = AlertBuilder::new(AlertConfig {
            min_confidence: 0,
            ..AlertConfig::default()
        });

        let unlabeled = lenient.options_flow(&rec, fixed_now()).expect("alert");
        let unusual = lenient.unusual_activity(&rec, fixed_now()).expect("alert");
        assert_eq!(unusual.score, unlabeled.score + 10);

        let mut labeled = rec.clone();
        labeled.0.insert("direction".into(), json!("Bearish"));
        let labeled = lenient.options_flow(&labeled, fixed_now()).expect("alert");
        assert_eq!(labeled.score, unusual.score);

        let mut padded = rec.clone();
        padded.0.insert("direction".into(), json!(" BULLISH"));
        let padded = lenient.options_flow(&padded, fixed_now()).expect("alert");
        assert_eq!(padded.score, unlabeled.score);
    }

    #[test]
    fn test_premium_floor() {
        let mut rec = block_print("BULLISH");
        rec.0.insert("premium".into(), json!(10_000));

        match builder().assess_options_flow(&rec, fixed_now()) {
            Evaluation::Suppressed(Suppression::BelowPremium { .. }) => {}
            other => panic!("Expected premium suppression, got {other:?}"),
        }
    }

    #[test]
    fn test_confidence_floor() {
        let rec = record(json!({
            "baseSymbol": "F",
            "premium": 60000,
            "volumeOpenInterestRatio": 1,
            "delta": 0.1,
            "daysToExpiration": 30,
            "direction": "BULLISH"
        }));

        match builder().assess_options_flow(&rec, fixed_now()) {
            Evaluation::Suppressed(Suppression::BelowConfidence { score, .. }) => assert_eq!(score, 22),
            other => panic!("Expected confidence suppression, got {other:?}"),
        }
    }
}
