// crates/cer-core/src/validate.rs

use crate::codes::CodecId;
use crate::config::defaults::{MAX_BLOCK_LEN, MAX_INITIAL_BUCKET, MAX_MARKOV_ORDER, MAX_VALUE_RANGE};
use crate::config::{CerConfig, PressCoding};
use crate::error::{CerError, Result};
use crate::spline::{InterpolationMethod, OutputFilter, MAX_IDW_POWER};

fn validate_codec(id: CodecId) -> Result<()> {
    if let CodecId::Enbonacci(k) = id {
        if !(2..=8).contains(&k) {
            return Err(CerError::validation(format!("press codec enbonacci order {k} not in 2..=8")));
        }
    }
    Ok(())
}

pub fn validate_config(c: &CerConfig) -> Result<()> {
    // IDW power must fit the header id.
    if let InterpolationMethod::InverseDistanceWeighted { power, .. } = c.interpolation {
        if power == 0 || power > MAX_IDW_POWER {
            return Err(CerError::validation(format!("idw power {power} not in 1..={MAX_IDW_POWER}")));
        }
    }

    for (i, f) in c.filters.iter().enumerate() {
        if c.filters[..i].contains(f) {
            return Err(CerError::validation(format!("filter {f:?} listed twice")));
        }
    }
    if c.filters.contains(&OutputFilter::Monotonic) && c.interpolation != InterpolationMethod::CubicHermite {
        return Err(CerError::validation("monotonic filter only applies to cubic hermite"));
    }

    match c.press_coding {
        PressCoding::Universal(id) => validate_codec(id)?,
        PressCoding::HavenBucket { codec, initial_bucket } => {
            validate_codec(codec)?;
            if initial_bucket > MAX_INITIAL_BUCKET {
                return Err(CerError::validation(format!(
                    "initial bucket {initial_bucket} exceeds {MAX_INITIAL_BUCKET}"
                )));
            }
        }
        PressCoding::Markov { order, novelty } => {
            validate_codec(novelty)?;
            if order > MAX_MARKOV_ORDER {
                return Err(CerError::validation(format!("markov order {order} exceeds {MAX_MARKOV_ORDER}")));
            }
        }
    }

    Ok(())
}

pub fn validate_block_params(len: usize, value_range: u32) -> Result<()> {
    if value_range == 0 {
        return Err(CerError::validation("value range must be at least 1"));
    }
    if value_range > MAX_VALUE_RANGE {
        return Err(CerError::validation(format!("value range {value_range} exceeds {MAX_VALUE_RANGE}")));
    }
    if len > MAX_BLOCK_LEN {
        return Err(CerError::validation(format!("block length {len} exceeds {MAX_BLOCK_LEN}")));
    }
    Ok(())
}
