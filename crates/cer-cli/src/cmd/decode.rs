// crates/cer-cli/src/cmd/decode.rs

use anyhow::Context;
use clap::Args;

use cer_core::cer::{decode_block, DecodedBlock};
use cer_core::CerConfig;

use crate::cmd::args::LocalArgs;
use crate::io::container::{self, Container};
use crate::io::pcm;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Input .cer path
    #[arg(long)]
    pub r#in: String,

    /// Output raw PCM path
    #[arg(long)]
    pub out: String,

    #[command(flatten)]
    pub local: LocalArgs,
}

/// Decode every block, checking block sizes against the framing.
pub fn decode_blocks(c: &Container, local: &CerConfig) -> anyhow::Result<Vec<DecodedBlock>> {
    let mut out = Vec::with_capacity(c.blocks.len());
    let mut remaining = c.total_samples;
    for (b, bits) in c.blocks.iter().enumerate() {
        let dec = decode_block(bits, local).with_context(|| format!("decode block {b}"))?;
        let expect = remaining.min(c.block_len as u64);
        if dec.samples.len() as u64 != expect {
            anyhow::bail!("block {b}: {} samples, framing says {expect}", dec.samples.len());
        }
        if dec.header.value_range != c.format.value_range() {
            anyhow::bail!(
                "block {b}: value range {} does not match {} samples",
                dec.header.value_range,
                c.format.label()
            );
        }
        remaining -= expect;
        out.push(dec);
    }
    Ok(out)
}

/// Decode a container to the original bytes and verify the digest.
pub fn decode_bytes(c: &Container, local: &CerConfig) -> anyhow::Result<Vec<u8>> {
    let blocks = decode_blocks(c, local)?;
    plain_bytes(c, &blocks)
}

/// Reassemble decoded blocks into bytes and check them against the stored digest.
pub fn plain_bytes(c: &Container, blocks: &[DecodedBlock]) -> anyhow::Result<Vec<u8>> {
    let samples: Vec<u32> = blocks.iter().flat_map(|d| d.samples.iter().copied()).collect();
    let plain = pcm::samples_to_bytes(&samples, c.format)?;

    let digest = container::digest16(&plain);
    if digest != c.digest {
        anyhow::bail!(
            "blake3 mismatch: stored {}, decoded {}",
            container::hex16(&c.digest),
            container::hex16(&digest)
        );
    }
    Ok(plain)
}

pub fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let c = container::read_container(&args.r#in)?;
    let plain = decode_bytes(&c, &args.local.to_config())?;
    std::fs::write(&args.out, &plain).with_context(|| format!("write {}", args.out))?;

    eprintln!("--- decode ---");
    eprintln!("in              = {}", args.r#in);
    eprintln!("out             = {}", args.out);
    eprintln!("format          = {}", c.format.label());
    eprintln!("samples         = {}", c.total_samples);
    eprintln!("blocks          = {}", c.blocks.len());
    eprintln!("bytes           = {}", plain.len());
    eprintln!("blake3_16       = {} (verified)", container::hex16(&c.digest));
    Ok(())
}
