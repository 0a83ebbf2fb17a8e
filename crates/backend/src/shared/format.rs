/// Форматирует число с разделителями тысяч (точками)
///
/// ```ignore
/// assert_eq!(format_number(1234567), "1.234.567");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Доля `part` от `total` в процентах с одним знаком после запятой: "66.7%".
/// Пустой знаменатель дает "0.0%".
pub fn format_percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0, 0), "0.0%");
        assert_eq!(format_percent(2, 3), "66.7%");
        assert_eq!(format_percent(3, 5), "60.0%");
        assert_eq!(format_percent(5, 5), "100.0%");
    }
}
