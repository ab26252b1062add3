use chrono::{Local, NaiveDate};

/// Storage key for a calendar day, `YYYY-MM-DD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// The local calendar day. No timezone normalization is applied.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now_millis() -> i64 {
    Local::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(date_key(date), "2024-01-03");
        assert_eq!(parse_date_key("2024-01-03"), Some(date));
        assert_eq!(parse_date_key("2024-1-3x"), None);
    }
}
