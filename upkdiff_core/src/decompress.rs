use flate2::read::GzDecoder;
use std::io::Read;
use tracing::warn;

/// Inflate a gzip stream, falling back to the raw input when decoding
/// fails. Some packages are distributed unpacked and nothing upstream can
/// tell the two apart, so the decision is made by attempting inflation.
pub fn decompress(bytes: &[u8]) -> Vec<u8> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();

    match decoder.read_to_end(&mut out) {
        Ok(_) => out,
        Err(e) => {
            warn!("gzip decode failed, assuming uncompressed input: {}", e);
            bytes.to_vec()
        }
    }
}
