//! Conversion of loosely-typed command-line text into typed device settings.
//!
//! Every parser here is pure and runs before the first device call, so a bad
//! argument never leaves the camera half-configured.

use std::fmt;

/// A device control that is either managed by the camera or pinned to a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting<T> {
    /// The device computes the value itself.
    Auto,
    /// A user-supplied magnitude, sent as-is.
    Manual(T),
}

impl<T> Setting<T> {
    /// True for [`Setting::Auto`].
    pub fn is_auto(&self) -> bool {
        matches!(self, Setting::Auto)
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Auto
    }
}

impl<T: fmt::Display> fmt::Display for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Auto => write!(f, "auto"),
            Setting::Manual(v) => write!(f, "{}", v),
        }
    }
}

/// Image rotation applied by the live mode transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    #[default]
    None,
    Left,
    Right,
}

impl RotationMode {
    /// Method code understood by `Transform.Rotate.setMethod`.
    pub fn code(self) -> i32 {
        match self {
            RotationMode::None => 0,
            RotationMode::Left => 1,
            RotationMode::Right => 2,
        }
    }
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationMode::None => write!(f, "none"),
            RotationMode::Left => write!(f, "left"),
            RotationMode::Right => write!(f, "right"),
        }
    }
}

/// Errors raised while normalizing raw argument text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{value}' is not a valid number; use 'auto' or a value such as 2.0")]
    InvalidSetting { value: String },

    #[error("'{value}' is not a valid switch; use 'true' to turn it on or 'false' to turn it off")]
    InvalidFlag { value: String },

    #[error("'{value}' is not a valid rotation; use 'False', 'left' or 'right'")]
    InvalidRotation { value: String },
}

/// Parse an exposure, gain or frame-rate argument.
///
/// `auto` hands control to the device. Anything else must be a finite float;
/// the value is not rounded or clamped here.
pub fn parse_setting(raw: &str) -> Result<Setting<f64>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed == "auto" {
        return Ok(Setting::Auto);
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Setting::Manual(v)),
        _ => Err(ValidationError::InvalidSetting {
            value: raw.to_string(),
        }),
    }
}

/// Parse a boolean switch such as `--clock` or `--histogram`.
///
/// Accepts `true`/`t` and `false`/`f` in any letter case.
pub fn parse_flag(raw: &str) -> Result<bool, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("t") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("f") {
        Ok(false)
    } else {
        Err(ValidationError::InvalidFlag {
            value: raw.to_string(),
        })
    }
}

/// Parse the `--rotate` argument.
pub fn parse_rotation(raw: &str) -> Result<RotationMode, ValidationError> {
    match raw {
        "False" => Ok(RotationMode::None),
        "left" | "Left" | "l" => Ok(RotationMode::Left),
        "right" | "Right" | "r" => Ok(RotationMode::Right),
        _ => Err(ValidationError::InvalidRotation {
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_auto() {
        assert_eq!(parse_setting("auto").unwrap(), Setting::Auto);
    }

    #[test]
    fn test_parse_setting_manual_values_are_not_rounded() {
        assert_eq!(parse_setting("2.0").unwrap(), Setting::Manual(2.0));
        assert_eq!(parse_setting("2").unwrap(), Setting::Manual(2.0));
        assert_eq!(parse_setting("0.0123").unwrap(), Setting::Manual(0.0123));
        assert_eq!(parse_setting("0").unwrap(), Setting::Manual(0.0));
        assert_eq!(parse_setting("-1.5").unwrap(), Setting::Manual(-1.5));
    }

    #[test]
    fn test_parse_setting_zero_is_not_auto() {
        assert!(!parse_setting("0").unwrap().is_auto());
    }

    #[test]
    fn test_parse_setting_rejects_garbage() {
        for raw in ["", "abc", "2.0x", "Auto", "1,5", "inf", "NaN"] {
            let err = parse_setting(raw).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidSetting {
                    value: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_flag_true_tokens() {
        for raw in ["true", "t", "True", "TRUE", "T"] {
            assert!(parse_flag(raw).unwrap(), "{} should be true", raw);
        }
    }

    #[test]
    fn test_parse_flag_false_tokens() {
        for raw in ["false", "f", "False", "FALSE", "F"] {
            assert!(!parse_flag(raw).unwrap(), "{} should be false", raw);
        }
    }

    #[test]
    fn test_parse_flag_rejects_other_strings() {
        for raw in ["yes", "no", "1", "0", "", "truth"] {
            assert!(matches!(
                parse_flag(raw),
                Err(ValidationError::InvalidFlag { .. })
            ));
        }
    }

    #[test]
    fn test_parse_rotation_aliases() {
        for raw in ["left", "Left", "l"] {
            assert_eq!(parse_rotation(raw).unwrap(), RotationMode::Left);
        }
        for raw in ["right", "Right", "r"] {
            assert_eq!(parse_rotation(raw).unwrap(), RotationMode::Right);
        }
        assert_eq!(parse_rotation("False").unwrap(), RotationMode::None);
    }

    #[test]
    fn test_parse_rotation_rejects_other_strings() {
        for raw in ["LEFT", "false", "none", "up", ""] {
            assert!(matches!(
                parse_rotation(raw),
                Err(ValidationError::InvalidRotation { .. })
            ));
        }
    }

    #[test]
    fn test_rotation_codes() {
        assert_eq!(RotationMode::None.code(), 0);
        assert_eq!(RotationMode::Left.code(), 1);
        assert_eq!(RotationMode::Right.code(), 2);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidFlag {
            value: "maybe".to_string(),
        };
        assert!(err.to_string().contains("'maybe'"));
    }
}
