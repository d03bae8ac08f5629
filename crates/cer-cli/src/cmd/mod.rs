// crates/cer-cli/src/cmd/mod.rs

pub mod analyze;
pub mod args;
pub mod decode;
pub mod encode;
pub mod inspect;
