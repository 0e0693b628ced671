//! Flexible numeric decoders.
//!
//! Upstream exchanges ship numeric fields as JSON numbers, quoted
//! strings, empty strings, the sentinel `"N/A"`, or `null`. These
//! newtypes carry a real `Deserialize` impl so the non-finite guard
//! can't be skipped by a call site that forgets to apply it inline.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

/// A float decoded from JSON number, string, or null, guaranteed finite.
/// Empty string, `"N/A"`, unparseable strings, and non-finite results all
/// map to `0.0` rather than erroring — upstreams routinely ship this noise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexFloat(pub f64);

impl<'de> Deserialize<'de> for FlexFloat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlexFloatVisitor;

        impl<'de> Visitor<'de> for FlexFloatVisitor {
            type Value = FlexFloat;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, numeric string, \"N/A\", or null")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
                Ok(FlexFloat(guard_finite(v)))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
                Ok(FlexFloat(guard_finite(v as f64)))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FlexFloat(guard_finite(v as f64)))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
                let trimmed = v.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
                    return Ok(FlexFloat(0.0));
                }
                match trimmed.parse::<f64>() {
                    Ok(parsed) => Ok(FlexFloat(guard_finite(parsed))),
                    Err(_) => Ok(FlexFloat(0.0)),
                }
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(FlexFloat(0.0))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(FlexFloat(0.0))
            }

            fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(de::Error::custom("expected number or string, got bool"))
            }
        }

        deserializer.deserialize_any(FlexFloatVisitor)
    }
}

fn guard_finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// An integer decoded from JSON number or string. A string that fails to
/// parse as a signed 64-bit integer maps to `0`, not an error — matching
/// the float decoder's tolerance. Booleans and non-scalar JSON are
/// errors. Out-of-range values map to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlexInt(pub i64);

impl<'de> Deserialize<'de> for FlexInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlexIntVisitor;

        impl<'de> Visitor<'de> for FlexIntVisitor {
            type Value = FlexInt;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, numeric string, or null")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
                Ok(FlexInt(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FlexInt(i64::try_from(v).unwrap_or(0)))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
                if v.is_finite() && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                    Ok(FlexInt(v as i64))
                } else {
                    Ok(FlexInt(0))
                }
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
                Ok(FlexInt(v.trim().parse::<i64>().unwrap_or(0)))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(FlexInt(0))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(FlexInt(0))
            }

            fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(de::Error::custom("expected number or string, got bool"))
            }
        }

        deserializer.deserialize_any(FlexIntVisitor)
    }
}
