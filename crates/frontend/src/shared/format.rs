//! Утилиты форматирования чисел и дат для витрины и админки

/// Форматирует число с разделителем тысяч и указанным количеством знаков после запятой
///
/// # Примеры
///
/// ```
/// use frontend::shared::format::format_number_with_decimals;
///
/// let formatted = format_number_with_decimals(1234.567, 2, ',');
/// assert_eq!(formatted, "1,234.57");
/// ```
pub fn format_number_with_decimals(value: f64, decimals: usize, separator: char) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    // Вставляем разделитель каждые 3 цифры с конца целой части
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }

    match decimal_part {
        Some(d) => format!("{}{}.{}", sign, grouped, d),
        None => format!("{}{}", sign, grouped),
    }
}

/// Цена товара: `$1,234.50`
pub fn format_price(value: f64) -> String {
    if value < 0.0 {
        return format!("-${}", format_number_with_decimals(-value, 2, ','));
    }
    format!("${}", format_number_with_decimals(value, 2, ','))
}

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}.{}.{}", day, month, year);
        }
    }
    date_str.to_string()
}

/// `16.7341, 95.6483` (lat first, as people read it)
pub fn format_lat_lon(lat: f64, lon: f64) -> String {
    format!("{:.4}, {:.4}", lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_with_decimals() {
        assert_eq!(format_number_with_decimals(1234.567, 2, ','), "1,234.57");
        assert_eq!(format_number_with_decimals(1234567.0, 0, ' '), "1 234 567");
        assert_eq!(format_number_with_decimals(999.0, 1, ','), "999.0");
        assert_eq!(format_number_with_decimals(-1234.5, 2, ','), "-1,234.50");
        assert_eq!(format_number_with_decimals(0.0, 2, ','), "0.00");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1299.5), "$1,299.50");
        assert_eq!(format_price(15.0), "$15.00");
        assert_eq!(format_price(-3.0), "-$3.00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_lat_lon() {
        assert_eq!(format_lat_lon(16.73412, 95.64834), "16.7341, 95.6483");
    }
}
