// crates/cer-cli/src/io/pcm.rs
//
// Raw PCM bytes <-> unsigned samples in [0, 2^bits). Signed input is mapped
// to offset binary by flipping the sign bit.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleFormat {
    pub bits: u8,
    pub signed: bool,
}

impl SampleFormat {
    pub fn new(bits: u8, signed: bool) -> anyhow::Result<Self> {
        if bits != 8 && bits != 16 {
            anyhow::bail!("sample width must be 8 or 16 bits, got {bits}");
        }
        Ok(Self { bits, signed })
    }

    pub fn value_range(self) -> u32 {
        1u32 << self.bits
    }

    pub fn bytes_per_sample(self) -> usize {
        self.bits as usize / 8
    }

    fn sign_bit(self) -> u32 {
        if self.signed {
            1u32 << (self.bits - 1)
        } else {
            0
        }
    }

    pub fn label(self) -> String {
        format!("{}{}", if self.signed { "s" } else { "u" }, self.bits)
    }
}

/// 16-bit samples are little-endian.
pub fn bytes_to_samples(bytes: &[u8], fmt: SampleFormat) -> anyhow::Result<Vec<u32>> {
    let bps = fmt.bytes_per_sample();
    if bytes.len() % bps != 0 {
        anyhow::bail!(
            "input length {} is not a multiple of {} bytes per sample",
            bytes.len(),
            bps
        );
    }
    let flip = fmt.sign_bit();
    let samples = match fmt.bits {
        8 => bytes.iter().map(|&b| b as u32 ^ flip).collect(),
        _ => bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32 ^ flip)
            .collect(),
    };
    Ok(samples)
}

pub fn samples_to_bytes(samples: &[u32], fmt: SampleFormat) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(samples.len() * fmt.bytes_per_sample());
    let flip = fmt.sign_bit();
    for (i, &s) in samples.iter().enumerate() {
        if s >= fmt.value_range() {
            anyhow::bail!("sample {i} = {s} does not fit in {} bits", fmt.bits);
        }
        let raw = s ^ flip;
        match fmt.bits {
            8 => out.push(raw as u8),
            _ => out.extend_from_slice(&(raw as u16).to_le_bytes()),
        }
    }
    Ok(out)
}
