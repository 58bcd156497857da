//! Cleanup applied to raw provider output before scoring.

const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

/// Fraction of the ceiling within which a word boundary may be used.
const BOUNDARY_WINDOW: f64 = 0.2;

/// Remove one layer of matching wrapping quotes.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    let text = text.trim();
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

/// Cut `text` to at most `ceiling` characters, preferring a word boundary
/// that lies in the last 20% of the ceiling.
pub fn truncate_at_boundary(text: &str, ceiling: usize) -> String {
    if text.chars().count() <= ceiling {
        return text.to_string();
    }

    let cut: Vec<char> = text.chars().take(ceiling).collect();
    let next_is_break = text.chars().nth(ceiling).is_some_and(char::is_whitespace);
    if next_is_break {
        return cut.iter().collect::<String>().trim_end().to_string();
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let earliest = ceiling - (ceiling as f64 * BOUNDARY_WINDOW).floor() as usize;
    let boundary = cut.iter().rposition(|c| c.is_whitespace());

    match boundary {
        Some(index) if index >= earliest => {
            cut[..index].iter().collect::<String>().trim_end().to_string()
        }
        _ => cut.into_iter().collect(),
    }
}

/// Trim, unwrap quotes and enforce the character ceiling.
pub fn postprocess(raw: &str, ceiling: usize) -> String {
    truncate_at_boundary(strip_wrapping_quotes(raw), ceiling)
}
