//! Lenient deserializers for imported stat counters.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

struct NonNegativeVisitor;

impl<'de> Visitor<'de> for NonNegativeVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        Ok(v.max(0) as u64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
        if v.is_nan() || v <= 0.0 {
            return Ok(0);
        }
        Ok(v.floor() as u64)
    }

    fn visit_unit<E: de::Error>(self) -> Result<u64, E> {
        Ok(0)
    }
}

/// Accepts any JSON number (or null), clamping negatives to 0 and flooring floats.
pub fn non_negative<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    deserializer.deserialize_any(NonNegativeVisitor)
}

/// `non_negative` narrowed to u32, saturating.
pub fn non_negative_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let v = deserializer.deserialize_any(NonNegativeVisitor)?;
    Ok(v.min(u32::MAX as u64) as u32)
}
