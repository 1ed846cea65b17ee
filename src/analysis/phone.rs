//! Mobile number validation.

use crate::models::Record;
use tracing::debug;

/// Rules a mobile number must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRules {
    /// Country code stripped from the front, with or without a leading `+`.
    pub country_code: String,
    /// Number of digits left after stripping the country code.
    pub digits: usize,
    /// Smallest accepted subscriber number (inclusive).
    pub min_number: u64,
    /// Largest accepted subscriber number (inclusive).
    pub max_number: u64,
}

impl Default for PhoneRules {
    fn default() -> Self {
        Self {
            country_code: "91".to_string(),
            digits: 10,
            min_number: 6_000_000_000,
            max_number: 9_999_999_999,
        }
    }
}

impl From<&crate::config::PhoneConfig> for PhoneRules {
    fn from(config: &crate::config::PhoneConfig) -> Self {
        Self {
            country_code: config.country_code.clone(),
            digits: config.digits,
            min_number: config.min_number,
            max_number: config.max_number,
        }
    }
}

impl PhoneRules {
    /// Remove the country code prefix. The `+` form is tried first.
    pub fn strip_country_code<'a>(&self, number: &'a str) -> &'a str {
        if self.country_code.is_empty() {
            return number;
        }

        let plus_prefixed = format!("+{}", self.country_code);
        number
            .strip_prefix(plus_prefixed.as_str())
            .or_else(|| number.strip_prefix(self.country_code.as_str()))
            .unwrap_or(number)
    }

    /// Check a phone number against the rules.
    pub fn is_valid(&self, number: &str) -> bool {
        let subscriber = self.strip_country_code(number);

        if subscriber.chars().count() != self.digits
            || !subscriber.bytes().all(|b| b.is_ascii_digit())
        {
            return false;
        }

        match subscriber.parse::<u64>() {
            Ok(value) => (self.min_number..=self.max_number).contains(&value),
            Err(_) => false,
        }
    }
}

/// Mark every record with `isValidMobile` and return the number of valid ones.
///
/// A missing phone number is validated as the empty string.
pub fn annotate_phone_validity(records: &mut [Record], rules: &PhoneRules) -> usize {
    let mut valid = 0;

    for record in records.iter_mut() {
        let is_valid = rules.is_valid(record.phone_number.as_deref().unwrap_or(""));
        record.is_valid_mobile = Some(is_valid);
        if is_valid {
            valid += 1;
        }
    }

    debug!("{} of {} phone numbers valid", valid, records.len());
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_phone(number: Option<&str>) -> Record {
        Record {
            phone_number: number.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_numbers() {
        let rules = PhoneRules::default();
        assert!(rules.is_valid("+919876543210"));
        assert!(rules.is_valid("919876543210"));
        assert!(rules.is_valid("9876543210"));
        assert!(rules.is_valid("6000000000"));
        assert!(rules.is_valid("9999999999"));
    }

    #[test]
    fn test_invalid_numbers() {
        let rules = PhoneRules::default();
        assert!(!rules.is_valid("12345"));
        assert!(!rules.is_valid("+915000000000"));
        assert!(!rules.is_valid("5999999999"));
        assert!(!rules.is_valid("98765-43210"));
        assert!(!rules.is_valid("+91 9876543210"));
        assert!(!rules.is_valid(""));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        let rules = PhoneRules::default();
        assert!(!rules.is_valid("९८७६५४३२१०"));
        assert!(!rules.is_valid("+91９８７６５４３２１０"));
    }

    #[test]
    fn test_bare_country_code_is_stripped_from_local_numbers() {
        // A ten-digit number starting with 91 loses those digits first.
        let rules = PhoneRules::default();
        assert_eq!(rules.strip_country_code("9123456789"), "23456789");
        assert!(!rules.is_valid("9123456789"));
        assert!(rules.is_valid("919123456789"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = PhoneRules {
            country_code: "44".to_string(),
            digits: 4,
            min_number: 1000,
            max_number: 1999,
        };
        assert!(rules.is_valid("+441234"));
        assert!(!rules.is_valid("+442345"));
        assert!(!rules.is_valid("+911234"));
    }

    #[test]
    fn test_annotate_phone_validity() {
        let mut records = vec![
            with_phone(Some("+919876543210")),
            with_phone(Some("12345")),
            with_phone(None),
            with_phone(Some("7000000000")),
        ];

        let valid = annotate_phone_validity(&mut records, &PhoneRules::default());

        assert_eq!(valid, 2);
        let flags: Vec<_> = records.iter().map(|r| r.is_valid_mobile).collect();
        assert_eq!(flags, vec![Some(true), Some(false), Some(false), Some(true)]);
    }
}
