//! Human-readable formatting for alert text

/// Cells in a confidence bar
pub const BAR_CELLS: usize = 10;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// `$1.25M`, `$75.0K` or `$950`
pub fn format_premium(premium: f64) -> String {
    if premium >= 1_000_000.0 {
        format!("${:.2}M", premium / 1_000_000.0)
    } else if premium >= 1_000.0 {
        format!("${:.1}K", premium / 1_000.0)
    } else {
        format!("${:.0}", premium)
    }
}

/// Ten-cell bar filled in proportion to `score / 10`, truncated
pub fn format_confidence_bar(score: u8) -> String {
    let filled = (score as usize / 10).min(BAR_CELLS);
    let mut bar = String::with_capacity(BAR_CELLS * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(BAR_CELLS - filled));
    bar
}

/// Round to a whole number and group thousands with commas
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if grouped == "0" {
        return grouped;
    }
    format!("{sign}{grouped}")
}
