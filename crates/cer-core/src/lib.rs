pub mod error;
pub mod validate;

pub mod bits;
pub mod codes;
pub mod transform;
pub mod catalogue;
pub mod spline;
pub mod cer;
pub mod post;
pub mod config;

pub use crate::cer::{decode_block, encode_block, CodecState};
pub use crate::config::CerConfig;
pub use crate::error::{CerError, Result};
