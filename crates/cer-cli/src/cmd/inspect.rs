// crates/cer-cli/src/cmd/inspect.rs

use anyhow::Context;
use clap::Args;

use cer_core::bits::BitReader;
use cer_core::config::read_header;

use crate::cmd::decode;
use crate::io::container;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input .cer path
    #[arg(long)]
    pub r#in: String,

    /// Print headers for at most this many blocks
    #[arg(long, default_value_t = 8)]
    pub max_blocks: usize,

    /// Also decode every block, verify the digest and report run statistics
    #[arg(long, default_value_t = false)]
    pub verify: bool,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let c = container::read_container(&args.r#in)?;

    eprintln!("--- inspect ---");
    eprintln!("file            = {}", args.r#in);
    eprintln!("container_ok    = true (magic + version + crc32 verified)");
    eprintln!("format          = {}", c.format.label());
    eprintln!("block_len       = {}", c.block_len);
    eprintln!("samples         = {}", c.total_samples);
    eprintln!("blocks          = {}", c.blocks.len());
    eprintln!("payload_bits    = {}", c.payload_bits());
    eprintln!("blake3_16       = {}", container::hex16(&c.digest));

    for (b, bits) in c.blocks.iter().enumerate().take(args.max_blocks) {
        let mut r = BitReader::new(bits);
        let h = read_header(&mut r).with_context(|| format!("block {b} header"))?;
        let header_bits = r.position();
        let range = match h.range {
            Some((lo, hi)) => format!("[{lo}, {hi}]"),
            None => "-".to_string(),
        };
        eprintln!(
            "block #{:<4} n={} v={} interp={} filters={:?} scoring={:?} press={:?} range={} ends={:?} header_bits={} press_bits={}",
            b,
            h.len,
            h.value_range,
            h.interpolation.name(),
            h.filters,
            h.scoring,
            h.press_coding,
            range,
            h.endpoints,
            header_bits,
            bits.len() - header_bits
        );
    }
    if c.blocks.len() > args.max_blocks {
        eprintln!("... {} more blocks", c.blocks.len() - args.max_blocks);
    }

    if args.verify {
        let local = cer_core::config::default_config();
        let blocks = decode::decode_blocks(&c, &local)?;
        decode::plain_bytes(&c, &blocks)?;
        let runs: u64 = blocks.iter().map(|d| d.stats.runs).sum();
        let hits: u64 = blocks.iter().map(|d| d.stats.hits).sum();
        let absorptions: u64 = blocks.iter().map(|d| d.stats.absorptions).sum();
        let eliminations: u64 = blocks.iter().map(|d| d.stats.eliminations).sum();
        eprintln!("--- verify ---");
        eprintln!("digest_match    = true");
        eprintln!("runs            = {}", runs);
        eprintln!("hits            = {}", hits);
        eprintln!("absorptions     = {}", absorptions);
        eprintln!("eliminations    = {}", eliminations);
    }

    Ok(())
}
