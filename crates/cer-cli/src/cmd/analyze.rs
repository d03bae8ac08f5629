// crates/cer-cli/src/cmd/analyze.rs

use clap::Args;
use std::io::Cursor;

use cer_core::bits::BitWriter;
use cer_core::cer::block::{encode_press, press_bound};
use cer_core::codes::CodecId;
use cer_core::config::PressCoding;
use cer_core::post::{Histogram, HuffmanCode};

use crate::cmd::args::LocalArgs;
use crate::cmd::decode;
use crate::io::container;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input .cer path
    #[arg(long)]
    pub r#in: String,

    /// Show the top N most frequent press values
    #[arg(long, default_value_t = 16)]
    pub top: usize,

    /// Skip re-coding the press data under every press coding
    #[arg(long, default_value_t = false)]
    pub no_codings: bool,

    /// Skip the zstd size of the plain samples
    #[arg(long, default_value_t = false)]
    pub no_zstd: bool,

    /// Zstd compression level (1..=22 typical). Higher is slower.
    #[arg(long, default_value_t = 3)]
    pub zstd_level: i32,

    #[command(flatten)]
    pub local: LocalArgs,
}

fn candidate_codings() -> Vec<(&'static str, PressCoding)> {
    vec![
        ("gamma", PressCoding::Universal(CodecId::EliasGamma)),
        ("delta", PressCoding::Universal(CodecId::EliasDelta)),
        ("fibonacci", PressCoding::Universal(CodecId::FIBONACCI)),
        ("gamma-fib", PressCoding::Universal(CodecId::EliasGammaFib)),
        ("gamma-iota", PressCoding::Universal(CodecId::EliasGammaIota)),
        (
            "haven/gamma",
            PressCoding::HavenBucket {
                codec: CodecId::EliasGamma,
                initial_bucket: 2,
            },
        ),
        (
            "markov1/gamma",
            PressCoding::Markov {
                order: 1,
                novelty: CodecId::EliasGamma,
            },
        ),
    ]
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let c = container::read_container(&args.r#in)?;
    let blocks = decode::decode_blocks(&c, &args.local.to_config())?;
    let plain = decode::plain_bytes(&c, &blocks)?;
    let file_bytes = std::fs::metadata(&args.r#in)?.len();

    let mut hist = Histogram::new();
    for d in &blocks {
        for &p in &d.press {
            hist.add(p);
        }
    }
    let n = hist.total();
    let entropy = hist.entropy_bits();

    eprintln!("--- analyze ---");
    eprintln!("file            = {}", args.r#in);
    eprintln!("format          = {}", c.format.label());
    eprintln!("samples         = {}", c.total_samples);
    eprintln!("blocks          = {}", c.blocks.len());
    eprintln!("press_entries   = {}", n);
    eprintln!("distinct_press  = {}", hist.distinct());
    eprintln!("max_press       = {}", hist.max_value().unwrap_or(0));
    eprintln!("entropy_bits    = {:.6} per entry", entropy);
    eprintln!("entropy_total   = {:.0} bits", entropy * n as f64);

    if !hist.is_empty() {
        let weights: Vec<(u64, u64)> = hist.iter().collect();
        let huff = HuffmanCode::from_weights(&weights)?;
        let huff_bits: u64 = hist
            .iter()
            .map(|(v, cnt)| cnt * huff.code_len(&v).unwrap_or(0) as u64)
            .sum();
        eprintln!("huffman_bits    = {} (static, table not counted)", huff_bits);
    }

    let top = hist.most_common(args.top);
    eprintln!("--- top {} press values ---", top.len());
    for (i, (v, cnt)) in top.iter().enumerate() {
        let pct = if n == 0 { 0.0 } else { (*cnt as f64) * 100.0 / (n as f64) };
        eprintln!("#{:>2} press={:<8} count={} ({:.3}%)", i + 1, v, cnt, pct);
    }

    if !args.no_codings {
        eprintln!("--- press codings ---");
        for (label, coding) in candidate_codings() {
            let mut bits = 0u64;
            for d in &blocks {
                let mut w = BitWriter::new();
                encode_press(coding, &d.press, press_bound(d.samples.len(), d.header.value_range), &mut w)?;
                bits += w.len() as u64;
            }
            eprintln!("{:<15} = {} bits", label, bits);
        }
    }

    eprintln!("--- size ---");
    eprintln!("plain_bytes     = {}", plain.len());
    eprintln!("cer_bytes       = {}", file_bytes);
    eprintln!("payload_bits    = {}", c.payload_bits());
    if !args.no_zstd {
        let z = zstd_size(&plain, args.zstd_level)?;
        let ratio = if z == 0 { 0.0 } else { (plain.len() as f64) / (z as f64) };
        eprintln!("--- zstd ---");
        eprintln!("zstd_level      = {}", args.zstd_level);
        eprintln!("zstd_bytes      = {}", z);
        eprintln!("ratio_raw/zstd  = {:.4}x", ratio);
    }

    Ok(())
}

fn zstd_size(bytes: &[u8], level: i32) -> anyhow::Result<usize> {
    let out = zstd::stream::encode_all(Cursor::new(bytes), level)?;
    Ok(out.len())
}
