// crates/cer-core/src/transform/mod.rs
//
// Reversible integer-sequence transforms. Each maps a sequence to one a
// universal code compresses better; none of them carries its own framing.

pub mod delta;
pub mod haven;
pub mod heading;
pub mod ruler;
pub mod tracked_sum;
pub mod zigzag;

pub use delta::{delta_decode, delta_decode_unsigned, delta_encode, delta_encode_unsigned};
pub use haven::{log_bucket, HavenBucket};
pub use heading::{heading_decode, heading_encode, Heading};
pub use ruler::{ruler_decode, ruler_encode, ruler_order};
pub use tracked_sum::{tracked_sum_decode, tracked_sum_encode, tracked_sum_width};
pub use zigzag::{focus, nop_to_op, op_to_nop, unfocus};
