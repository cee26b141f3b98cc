use crate::error::{RegistryError, Result};

/// Width of the unit suffix on every size spec ("gb", "mb", ...)
const UNIT_WIDTH: usize = 2;

/// Parse a size spec such as `50gb` into its integer amount.
///
/// The last two characters are dropped unconditionally and whatever remains
/// must parse as an integer. The unit itself is never inspected.
pub fn parse_size(spec: &str) -> Result<i64> {
    let cut = spec
        .char_indices()
        .rev()
        .nth(UNIT_WIDTH - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    spec[..cut].parse::<i64>().map_err(|_| RegistryError::InvalidSize {
        spec: spec.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_specs() {
        assert_eq!(parse_size("50gb").unwrap(), 50);
        assert_eq!(parse_size("8gb").unwrap(), 8);
        assert_eq!(parse_size("512mb").unwrap(), 512);
    }

    #[test]
    fn test_unit_is_not_inspected() {
        assert_eq!(parse_size("20xx").unwrap(), 20);
        assert_eq!(parse_size("7é€").unwrap(), 7);
    }

    #[test]
    fn test_fixed_width_not_digit_scan() {
        // a one-letter unit leaves a trailing digit behind
        assert_eq!(parse_size("128g").unwrap(), 12);
        // a three-letter unit leaves a letter behind
        assert!(parse_size("4gib").is_err());
    }

    #[test]
    fn test_short_or_empty_specs() {
        assert!(parse_size("").is_err());
        assert!(parse_size("g").is_err());
        assert!(parse_size("gb").is_err());
    }

    #[test]
    fn test_signed_remainder() {
        assert_eq!(parse_size("-5gb").unwrap(), -5);
        assert_eq!(parse_size("+5gb").unwrap(), 5);
    }

    #[test]
    fn test_error_carries_spec() {
        match parse_size("fastgb") {
            Err(RegistryError::InvalidSize { spec }) => assert_eq!(spec, "fastgb"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
