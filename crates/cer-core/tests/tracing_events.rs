// crates/cer-core/tests/tracing_events.rs

use std::io::Write;
use std::sync::{Arc, Mutex};

use cer_core::config::default_config;
use cer_core::{decode_block, encode_block};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn block_summaries_are_logged_at_debug() {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let samples: Vec<u32> = (0..64).map(|i| (i * 7 % 23) as u32).collect();
    tracing::subscriber::with_default(subscriber, || {
        let enc = encode_block(&samples, 32, &default_config()).unwrap();
        decode_block(&enc.bits, &default_config()).unwrap();
    });

    let log = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert!(log.contains("block encoded"), "{log}");
    assert!(log.contains("block decoded"), "{log}");
    assert!(log.contains("cer_encode"), "{log}");
    // per-cell events stay at trace
    assert!(!log.contains("spline bone"), "{log}");
}
