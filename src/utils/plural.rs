//! Counted nouns for log lines: `1 route`, `7 routes`.

pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "route"), "0 routes");
        assert_eq!(plural_count(1, "stylesheet"), "1 stylesheet");
        assert_eq!(plural_count(7, "scratch file"), "7 scratch files");
    }
}
