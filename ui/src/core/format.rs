//! Formatting helpers for presenting results.

/// `1234` → `"#1,234"`.
pub fn format_participant(ordinal: u64) -> String {
    let digits = ordinal.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('#');
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_progress(answered: usize, total: usize) -> String {
    format!("{answered} / {total}")
}
