// crates/cer-core/src/post/mod.rs
//
// Statistical post-stage for the press data.

pub mod bleed;
pub mod histogram;
pub mod huffman;
pub mod markov;

pub use bleed::BleedSorted;
pub use histogram::Histogram;
pub use huffman::HuffmanCode;
pub use markov::{MarkovCodec, Symbol};
