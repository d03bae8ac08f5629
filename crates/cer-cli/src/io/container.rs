// crates/cer-cli/src/io/container.rs

use anyhow::Context;
use cer_core::bits::{pack_bits, unpack_bits, varint};

use crate::io::pcm::SampleFormat;

pub const MAGIC: &[u8; 4] = b"CER1";
pub const VERSION: u16 = 1;

const FLAG_SIGNED: u8 = 0x01;

/// Fixed bytes outside the varint body: magic, version, width, flags, digest, crc.
const FIXED_BYTES: usize = 4 + 2 + 1 + 1 + 16 + 4;

/// .cer layout (little-endian for fixed-width fields):
/// MAGIC[4]
/// version:u16
/// sample_bits:u8            (8 or 16)
/// flags:u8                  (bit 0: signed input)
/// block_len:varint
/// total_samples:varint
/// block_count:varint
/// per block: bit_len:varint byte_len:varint bytes[byte_len]   (MSB-first packed bits)
/// blake3_16[16]             (over the plain input bytes)
/// crc32:u32                 (over everything before crc32)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub format: SampleFormat,
    pub block_len: usize,
    pub total_samples: u64,
    /// One bit string per block, one bit per u8.
    pub blocks: Vec<Vec<u8>>,
    pub digest: [u8; 16],
}

impl Container {
    pub fn payload_bits(&self) -> u64 {
        self.blocks.iter().map(|b| b.len() as u64).sum()
    }
}

pub fn to_bytes(c: &Container) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(FIXED_BYTES + (c.payload_bits() as usize + 7) / 8 + 8 * c.blocks.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.push(c.format.bits);
    out.push(if c.format.signed { FLAG_SIGNED } else { 0 });
    varint::put_u64(c.block_len as u64, &mut out);
    varint::put_u64(c.total_samples, &mut out);
    varint::put_u64(c.blocks.len() as u64, &mut out);

    for bits in &c.blocks {
        let packed = pack_bits(bits)?;
        varint::put_u64(bits.len() as u64, &mut out);
        varint::put_u64(packed.len() as u64, &mut out);
        out.extend_from_slice(&packed);
    }

    out.extend_from_slice(&c.digest);
    let crc = crc32(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    Ok(out)
}

/// Parse a container, verifying magic, version, crc32 and framing.
/// The digest is returned as stored; callers compare it after decoding.
pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Container> {
    if bytes.len() < FIXED_BYTES + 3 {
        anyhow::bail!("container too small ({} bytes)", bytes.len());
    }
    if &bytes[0..4] != MAGIC {
        anyhow::bail!("bad container magic");
    }

    let crc_off = bytes.len() - 4;
    let crc_expected = u32::from_le_bytes(bytes[crc_off..].try_into()?);
    let crc_actual = crc32(&bytes[..crc_off]);
    if crc_expected != crc_actual {
        anyhow::bail!("container crc32 mismatch (stored {crc_expected:08x}, computed {crc_actual:08x})");
    }

    let version = u16::from_le_bytes(bytes[4..6].try_into()?);
    if version != VERSION {
        anyhow::bail!("unsupported container version {version}");
    }
    let flags = bytes[7];
    if flags & !FLAG_SIGNED != 0 {
        anyhow::bail!("unknown container flags {flags:#04x}");
    }
    let format = SampleFormat::new(bytes[6], flags & FLAG_SIGNED != 0)?;

    let body_end = crc_off - 16;
    let body = &bytes[..body_end];
    let mut i = 8usize;

    let block_len = varint::get_u64(body, &mut i).context("block_len")?;
    let total_samples = varint::get_u64(body, &mut i).context("total_samples")?;
    let block_count = varint::get_u64(body, &mut i).context("block_count")?;
    if block_len == 0 {
        anyhow::bail!("block_len is zero");
    }
    if block_count != total_samples.div_ceil(block_len) {
        anyhow::bail!("block_count {block_count} does not cover {total_samples} samples in blocks of {block_len}");
    }

    let mut blocks = Vec::new();
    for b in 0..block_count {
        let bit_len = usize::try_from(varint::get_u64(body, &mut i)?)?;
        let byte_len = usize::try_from(varint::get_u64(body, &mut i)?)?;
        if byte_len != (bit_len + 7) / 8 {
            anyhow::bail!("block {b}: byte_len {byte_len} does not match bit_len {bit_len}");
        }
        let end = i
            .checked_add(byte_len)
            .filter(|&e| e <= body_end)
            .with_context(|| format!("block {b}: {byte_len} bytes run past the end"))?;
        let bits = unpack_bits(&body[i..end], bit_len).with_context(|| format!("block {b}"))?;
        blocks.push(bits);
        i = end;
    }
    if i != body_end {
        anyhow::bail!("{} trailing bytes after the last block", body_end - i);
    }

    let digest: [u8; 16] = bytes[body_end..crc_off].try_into()?;

    Ok(Container {
        format,
        block_len: usize::try_from(block_len)?,
        total_samples,
        blocks,
        digest,
    })
}

pub fn write_container(path: &str, c: &Container) -> anyhow::Result<u64> {
    let bytes = to_bytes(c)?;
    std::fs::write(path, &bytes).with_context(|| format!("write container: {path}"))?;
    Ok(bytes.len() as u64)
}

pub fn read_container(path: &str) -> anyhow::Result<Container> {
    let bytes = std::fs::read(path).with_context(|| format!("read {path}"))?;
    from_bytes(&bytes).with_context(|| format!("parse container: {path}"))
}

/// First 16 bytes of the blake3 hash.
pub fn digest16(bytes: &[u8]) -> [u8; 16] {
    let h = blake3::hash(bytes);
    let mut id = [0u8; 16];
    id.copy_from_slice(&h.as_bytes()[..16]);
    id
}

pub fn hex16(id: &[u8; 16]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut s = String::with_capacity(32);
    for &b in id {
        s.push(HEX[(b >> 4) as usize] as char);
        s.push(HEX[(b & 0x0F) as usize] as char);
    }
    s
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut h = crc32fast::Hasher::new();
    h.update(bytes);
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Container {
        Container {
            format: SampleFormat::new(16, true).unwrap(),
            block_len: 3,
            total_samples: 5,
            blocks: vec![vec![1, 0, 1, 1, 0, 0, 0, 0, 1, 1], vec![0, 1, 1]],
            digest: digest16(b"plain"),
        }
    }

    #[test]
    fn container_bytes_roundtrip() {
        let c = sample();
        let bytes = to_bytes(&c).unwrap();
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(from_bytes(&bytes).unwrap(), c);
    }

    #[test]
    fn any_flipped_byte_is_caught() {
        let bytes = to_bytes(&sample()).unwrap();
        for i in 0..bytes.len() {
            let mut bad = bytes.clone();
            bad[i] ^= 0x10;
            assert!(from_bytes(&bad).is_err(), "byte {i}");
        }
    }

    #[test]
    fn block_count_must_match_sample_count() {
        let mut c = sample();
        c.blocks.pop();
        let bytes = to_bytes(&c).unwrap();
        assert!(from_bytes(&bytes).is_err());
    }

    #[test]
    fn hex_is_lowercase() {
        let mut id = [0u8; 16];
        id[0] = 0xAB;
        id[15] = 0x01;
        assert_eq!(hex16(&id), "ab000000000000000000000000000001");
    }
}
