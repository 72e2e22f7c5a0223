use serde_json::Number;

pub const MIN_PRICE: i32 = 1;
pub const MAX_PRICE: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Price must be between 1 and 30")]
pub struct PriceOutOfRange;

/// Price of a pizza at a restaurant, always within `MIN_PRICE..=MAX_PRICE`.
///
/// Every join record written by this crate goes through this type, and the
/// store's CHECK constraint failure is reported as the same
/// [`PriceOutOfRange`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(i32);

impl Price {
    pub fn get(self) -> i32 {
        self.0
    }

    /// Accepts a price as it arrives in a request body. Absent, fractional
    /// and out-of-range values are all rejected the same way.
    pub fn from_json(value: Option<&Number>) -> Result<Self, PriceOutOfRange> {
        value
            .and_then(Number::as_i64)
            .ok_or(PriceOutOfRange)
            .and_then(Price::try_from)
    }
}

impl TryFrom<i64> for Price {
    type Error = PriceOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i32::try_from(value)
            .ok()
            .filter(|v| (MIN_PRICE..=MAX_PRICE).contains(v))
            .map(Price)
            .ok_or(PriceOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_inclusive_bounds() {
        assert_eq!(Price::try_from(1_i64).map(Price::get), Ok(1));
        assert_eq!(Price::try_from(30_i64).map(Price::get), Ok(30));
        assert_eq!(Price::try_from(15_i64).map(Price::get), Ok(15));
    }

    #[test]
    fn rejects_values_outside_range() {
        assert_eq!(Price::try_from(0_i64), Err(PriceOutOfRange));
        assert_eq!(Price::try_from(31_i64), Err(PriceOutOfRange));
        assert_eq!(Price::try_from(-5_i64), Err(PriceOutOfRange));
        assert_eq!(Price::try_from(i64::MAX), Err(PriceOutOfRange));
    }

    #[test]
    fn from_json_requires_an_integer() {
        let fractional = Number::from_f64(12.5).unwrap();
        assert_eq!(Price::from_json(None), Err(PriceOutOfRange));
        assert_eq!(Price::from_json(Some(&fractional)), Err(PriceOutOfRange));
        assert_eq!(
            Price::from_json(Some(&Number::from(20))).map(Price::get),
            Ok(20)
        );
    }

    #[test]
    fn error_message() {
        assert_eq!(PriceOutOfRange.to_string(), "Price must be between 1 and 30");
    }
}
