// crates/cer-cli/src/io/mod.rs

pub mod container;
pub mod pcm;
