// crates/cer-cli/src/cmd/encode.rs

use anyhow::Context;
use clap::Args;
use tracing::info;

use cer_core::cer::{encode_block, CerStats};
use cer_core::config::defaults::{DEFAULT_BLOCK_LEN, MAX_BLOCK_LEN};
use cer_core::CerConfig;

use crate::cmd::args::{CodecArgs, LocalArgs};
use crate::io::container::{self, Container};
use crate::io::pcm::{self, SampleFormat};

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw PCM input (8-bit, or 16-bit little-endian)
    #[arg(long)]
    pub r#in: String,

    /// Output .cer path
    #[arg(long)]
    pub out: String,

    /// Sample width in bits (8 or 16)
    #[arg(long, default_value_t = 8)]
    pub sample_bits: u8,

    /// Input samples are two's complement
    #[arg(long, default_value_t = false)]
    pub signed: bool,

    /// Samples per block
    #[arg(long, default_value_t = DEFAULT_BLOCK_LEN)]
    pub block_len: usize,

    #[command(flatten)]
    pub codec: CodecArgs,

    #[command(flatten)]
    pub local: LocalArgs,
}

/// Totals over every block of one encode.
#[derive(Clone, Debug, Default)]
pub struct EncodeSummary {
    pub blocks: usize,
    pub press_entries: usize,
    pub stats: CerStats,
}

impl EncodeSummary {
    fn add(&mut self, press_len: usize, s: &CerStats) {
        self.blocks += 1;
        self.press_entries += press_len;
        self.stats.hits += s.hits;
        self.stats.absorptions += s.absorptions;
        self.stats.eliminations += s.eliminations;
        self.stats.runs += s.runs;
        self.stats.peak_rankings = self.stats.peak_rankings.max(s.peak_rankings);
    }
}

/// Split the plain bytes into blocks and encode each one.
pub fn encode_bytes(
    plain: &[u8],
    format: SampleFormat,
    block_len: usize,
    cfg: &CerConfig,
) -> anyhow::Result<(Container, EncodeSummary)> {
    if block_len == 0 || block_len > MAX_BLOCK_LEN {
        anyhow::bail!("block length {block_len} not in 1..={MAX_BLOCK_LEN}");
    }
    let samples = pcm::bytes_to_samples(plain, format)?;

    let mut blocks = Vec::with_capacity(samples.len().div_ceil(block_len));
    let mut summary = EncodeSummary::default();
    for (b, chunk) in samples.chunks(block_len).enumerate() {
        let enc = encode_block(chunk, format.value_range(), cfg).with_context(|| format!("encode block {b}"))?;
        summary.add(enc.press.len(), &enc.stats);
        blocks.push(enc.bits);
    }

    let c = Container {
        format,
        block_len,
        total_samples: samples.len() as u64,
        blocks,
        digest: container::digest16(plain),
    };
    Ok((c, summary))
}

pub fn run(args: EncodeArgs) -> anyhow::Result<()> {
    let plain = std::fs::read(&args.r#in).with_context(|| format!("read {}", args.r#in))?;
    let format = SampleFormat::new(args.sample_bits, args.signed)?;
    let cfg = args.codec.to_config(&args.local)?;
    info!(?cfg, block_len = args.block_len, "encode");

    let (c, summary) = encode_bytes(&plain, format, args.block_len, &cfg)?;
    let out_bytes = container::write_container(&args.out, &c)?;

    let ratio = if out_bytes == 0 {
        0.0
    } else {
        plain.len() as f64 / out_bytes as f64
    };
    eprintln!("--- encode ---");
    eprintln!("in              = {}", args.r#in);
    eprintln!("out             = {}", args.out);
    eprintln!("format          = {}", format.label());
    eprintln!("samples         = {}", c.total_samples);
    eprintln!("blocks          = {} (block_len={})", summary.blocks, c.block_len);
    eprintln!("interp          = {}", cfg.interpolation.name());
    eprintln!("press_coding    = {:?}", cfg.press_coding);
    eprintln!("press_entries   = {}", summary.press_entries);
    eprintln!("hits            = {}", summary.stats.hits);
    eprintln!("absorptions     = {}", summary.stats.absorptions);
    eprintln!("eliminations    = {}", summary.stats.eliminations);
    eprintln!("payload_bits    = {}", c.payload_bits());
    eprintln!("bytes           = {} -> {}", plain.len(), out_bytes);
    eprintln!("ratio_raw/cer   = {:.4}x", ratio);
    eprintln!("blake3_16       = {}", container::hex16(&c.digest));
    Ok(())
}
