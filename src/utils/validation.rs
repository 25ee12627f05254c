use crate::error::{UploadError, UploadResult};

/// Longest lifetime S3 accepts for a presigned URL: 7 days.
pub const MAX_EXPIRE_SECS: u64 = 604_800;

pub const MIN_QR_WIDTH: u32 = 100;
pub const MAX_QR_WIDTH: u32 = 1000;

/// Parses an integer input and checks it against an inclusive range.
/// Anything that does not parse fails exactly like an out-of-range value.
fn parse_in_range(name: &'static str, raw: &str, min: u64, max: u64) -> UploadResult<u64> {
    let out_of_range = || UploadError::InvalidRange { name, min, max };

    let value: i64 = raw.trim().parse().map_err(|_| out_of_range())?;
    if value < 0 {
        return Err(out_of_range());
    }

    let value = value as u64;
    if value < min || value > max {
        return Err(out_of_range());
    }
    Ok(value)
}

/// Validates the `expire` input, in seconds.
pub fn validate_expire(raw: &str) -> UploadResult<u64> {
    parse_in_range("expire", raw, 0, MAX_EXPIRE_SECS)
}

/// Validates the `qr-width` input, in pixels.
pub fn validate_qr_width(raw: &str) -> UploadResult<u32> {
    let width = parse_in_range(
        "qr-width",
        raw,
        u64::from(MIN_QR_WIDTH),
        u64::from(MAX_QR_WIDTH),
    )?;
    Ok(width as u32)
}

/// Platform booleans are true only when spelled exactly `true`.
pub fn parse_flag(raw: &str) -> bool {
    raw == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_expire_bounds() {
        assert_eq!(validate_expire("0").unwrap(), 0);
        assert_eq!(validate_expire("180").unwrap(), 180);
        assert_eq!(validate_expire("604800").unwrap(), MAX_EXPIRE_SECS);

        assert!(validate_expire("604801").is_err());
        assert!(validate_expire("-1").is_err());
        assert!(validate_expire("abc").is_err());
        assert!(validate_expire("").is_err());
    }

    #[test]
    fn test_validate_expire_error_names_input() {
        let err = validate_expire("999999").unwrap_err();
        assert_eq!(err.input_name(), Some("expire"));
        assert_eq!(
            err.to_string(),
            "\"expire\" input should be a number between 0 and 604800."
        );
    }

    #[test]
    fn test_validate_qr_width_bounds() {
        assert_eq!(validate_qr_width("100").unwrap(), 100);
        assert_eq!(validate_qr_width("120").unwrap(), 120);
        assert_eq!(validate_qr_width("1000").unwrap(), 1000);

        for bad in ["0", "99", "1001", "-120", "wide", "12.5"] {
            let err = validate_qr_width(bad).unwrap_err();
            assert_eq!(err.input_name(), Some("qr-width"), "value {bad:?}");
        }
    }

    #[test]
    fn test_validate_qr_width_message() {
        let err = validate_qr_width("0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"qr-width\" input should be a number between 100 and 1000."
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("1"));
    }
}
