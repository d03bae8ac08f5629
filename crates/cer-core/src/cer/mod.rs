// crates/cer-core/src/cer/mod.rs

pub mod block;
pub mod rankings;
pub mod scoring;
pub mod state;

pub use block::{decode_block, encode_block, observed_range, press_bound, DecodedBlock, EncodedBlock};
pub use rankings::{RankedCell, Rankings, Side};
pub use scoring::{Score, Scoring, CURVE_WINDOW};
pub use state::{CerStats, CodecState, OpMode};
