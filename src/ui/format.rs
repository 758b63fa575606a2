use crate::api::dto::MatchResult;
use ratatui::style::Color;

/// Euro amount with `.` grouping and `,` decimals, e.g. `€1.250.000`.
/// Missing values read `N/A`; text that is not a number is shown as is.
pub fn currency(raw: Option<&str>) -> String {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return "N/A".to_string();
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => format!("€{}", group_thousands(v)),
        _ => text.to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    // at most three fraction digits, trailing zeros dropped
    let scaled = (value.abs() * 1000.0).round() as u128;
    let int_part = (scaled / 1000).to_string();
    let mut frac = format!("{:03}", scaled % 1000);
    while frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::new();
    if value < 0.0 && scaled > 0 {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if !frac.is_empty() {
        out.push(',');
        out.push_str(&frac);
    }
    out
}

/// Badge text and colour for one of the last five results.
pub fn badge(result: Option<MatchResult>) -> (&'static str, Color) {
    match result {
        Some(MatchResult::G) => ("G", Color::Green),
        Some(MatchResult::E) => ("E", Color::Yellow),
        Some(MatchResult::P) => ("P", Color::Red),
        None => ("-", Color::DarkGray),
    }
}

pub fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn years(start: Option<i64>, end: Option<i64>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{}-{}", s, e),
        (Some(s), None) => format!("{}-", s),
        (None, Some(e)) => format!("-{}", e),
        (None, None) => "-".to_string(),
    }
}
