//! Climate lookup key and record types.

use serde::{Deserialize, Serialize};

use crate::climate::error::ClimateError;

/// Number of digits in a postal code accepted by the upstream provider.
pub const ZIP_CODE_LEN: usize = 8;

/// A validated postal code.
///
/// Only constructed through [`ZipCode::parse`], so holding one means the
/// value has already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipCode(String);

impl ZipCode {
    /// Validate a caller-supplied postal code.
    ///
    /// Blank input, surrounding whitespace, and anything other than exactly
    /// [`ZIP_CODE_LEN`] ASCII digits fail with [`ClimateError::InvalidKey`].
    pub fn parse(raw: &str) -> Result<Self, ClimateError> {
        if raw.trim().is_empty() {
            return Err(ClimateError::InvalidKey);
        }

        if raw.len() != ZIP_CODE_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClimateError::InvalidKey);
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZipCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Climate attributes returned by the upstream provider.
///
/// Missing fields fall back to their defaults. A record equal to
/// `ClimateRecord::default()` is the upstream's "no data for this key"
/// signal, see [`ClimateRecord::is_empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateRecord {
    pub city: String,

    #[serde(rename = "temp_C")]
    pub temp_c: f64,

    #[serde(rename = "temp_F")]
    pub temp_f: f64,

    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl ClimateRecord {
    /// True when every field holds its default value.
    ///
    /// A legitimate record whose fields all happen to be default is
    /// indistinguishable from "not found"; the upstream contract offers no
    /// other signal.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
