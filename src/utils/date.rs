//! UTC timestamps for manifests, build reports and watch status lines.
//!
//! Only what those need: the current time, RFC 3339 formatting and parsing
//! back what we wrote. No time zones.

use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self::from_unix_secs(secs)
    }

    /// Civil UTC time for `secs` since the epoch (days-to-civil, proleptic
    /// Gregorian).
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;

        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as u16;

        Self {
            year,
            month,
            day,
            hour: (rem / 3_600) as u8,
            minute: ((rem / 60) % 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SSZ`. Impossible dates are
    /// rejected.
    pub fn parse(s: &str) -> Option<Self> {
        fn field<T: std::str::FromStr>(s: &str, range: std::ops::Range<usize>) -> Option<T> {
            let part = s.get(range)?;
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse().ok()
        }

        let bytes = s.as_bytes();
        if bytes.get(4) != Some(&b'-') || bytes.get(7) != Some(&b'-') {
            return None;
        }

        let mut dt = Self {
            year: field(s, 0..4)?,
            month: field(s, 5..7)?,
            day: field(s, 8..10)?,
            hour: 0,
            minute: 0,
            second: 0,
        };

        match s.len() {
            10 => {}
            _ if bytes.get(10) == Some(&b'T') => {
                dt.hour = field(s, 11..13)?;
                dt.minute = field(s, 14..16)?;
                dt.second = field(s, 17..19)?;
            }
            _ => return None,
        }

        dt.is_valid().then_some(dt)
    }

    fn is_valid(&self) -> bool {
        let leap = (self.year % 4 == 0 && self.year % 100 != 0) || self.year % 400 == 0;
        let month_days = match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if leap => 29,
            2 => 28,
            _ => return false,
        };
        (1..=month_days).contains(&self.day) && self.hour < 24 && self.minute < 60 && self.second < 60
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!("{}T{}Z", self.date(), self.time_of_day())
    }

    /// `YYYY-MM-DD`
    pub fn date(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `HH:MM:SS`
    pub fn time_of_day(self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_and_known_instants() {
        assert_eq!(DateTimeUtc::from_unix_secs(0).to_rfc3339(), "1970-01-01T00:00:00Z");
        assert_eq!(DateTimeUtc::from_unix_secs(1_718_461_845).to_rfc3339(), "2024-06-15T14:30:45Z");

        let leap_day = DateTimeUtc::from_unix_secs(1_709_164_800);
        assert_eq!(leap_day.date(), "2024-02-29");
    }

    #[test]
    fn test_parse_what_we_write() {
        let now = DateTimeUtc::now();
        assert_eq!(DateTimeUtc::parse(&now.to_rfc3339()), Some(now));

        let day = DateTimeUtc::parse("2024-06-15").unwrap();
        assert_eq!(day.time_of_day(), "00:00:00");
    }

    #[test]
    fn test_parse_rejects_impossible() {
        assert!(DateTimeUtc::parse("2024-13-01").is_none());
        assert!(DateTimeUtc::parse("2023-02-29").is_none());
        assert!(DateTimeUtc::parse("2024-06-15T24:00:00Z").is_none());
        assert!(DateTimeUtc::parse("2024-06-15 garbage").is_none());
        assert!(DateTimeUtc::parse("not a date").is_none());
        assert!(DateTimeUtc::parse("+024-06-15").is_none());
    }
}
