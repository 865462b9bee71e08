//! Structured postal addresses.

use serde::{Deserialize, Serialize};

/// A shipping or billing address.
///
/// The country is an ISO 3166-1 alpha-2 code and `region` a
/// state/province code where applicable; rate lookups key on these
/// instead of matching keywords in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    /// State/province/region code, e.g. "CA" or "BY".
    pub region: Option<String>,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code, e.g. "US".
    pub country: String,
}

impl Address {
    /// Creates an address with the required fields; optional parts default
    /// to empty.
    pub fn new(
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            line1: line1.into(),
            line2: None,
            city: city.into(),
            region: None,
            postal_code: postal_code.into(),
            country: country.into().to_uppercase(),
        }
    }

    /// Sets the region/state code.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into().to_uppercase());
        self
    }

    /// Sets the second address line.
    pub fn with_line2(mut self, line2: impl Into<String>) -> Self {
        self.line2 = Some(line2.into());
        self
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} {}, {}", self.line1, self.city, self.postal_code, self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_and_region_normalized_to_uppercase() {
        let address = Address::new("1 Main St", "Springfield", "62701", "us").with_region("il");
        assert_eq!(address.country, "US");
        assert_eq!(address.region.as_deref(), Some("IL"));
    }

    #[test]
    fn test_display_is_single_line() {
        let address = Address::new("1 Main St", "Springfield", "62701", "US");
        assert_eq!(address.to_string(), "1 Main St, Springfield 62701, US");
    }
}
