/// Create a simple ASCII progress bar for a 0..=100 score
pub fn progress_bar(percent: u8, width: usize) -> String {
    let ratio = (percent.min(100) as f64) / 100.0;
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Check mark for a done flag
pub fn check(done: bool) -> &'static str {
    if done { "●" } else { "○" }
}

/// Truncate to `max` chars, adding an ellipsis when cut
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_with_percent() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(50, 4), "██░░");
        assert_eq!(progress_bar(100, 4), "████");
        assert_eq!(progress_bar(250, 4), "████");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer task text", 8), "a longe…");
    }
}
