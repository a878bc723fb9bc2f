use std::io::Read;

use flate2::read::ZlibDecoder;
use flate2::{Compress, FlushCompress, Status};

use crate::types::CompressionLevel;
use crate::{Result, TzipError};

use super::Codec;

/// zlib-wrapped DEFLATE codec backed by a reusable [`flate2::Compress`] stream.
pub struct ZlibCodec {
    stream: Compress,
    level: CompressionLevel,
}

impl ZlibCodec {
    pub fn new(level: CompressionLevel) -> Self {
        Self {
            stream: Compress::new(level.into(), true),
            level,
        }
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }
}

impl std::fmt::Debug for ZlibCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibCodec")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl Codec for ZlibCodec {
    fn reset(&mut self) {
        self.stream.reset();
    }

    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        // Counters are relative to the last reset.
        let base_in = self.stream.total_in();
        let base_out = self.stream.total_out();

        loop {
            let consumed = (self.stream.total_in() - base_in) as usize;
            let produced = (self.stream.total_out() - base_out) as usize;
            if produced >= output.len() {
                return Err(overflow(output.len()));
            }

            let status = self
                .stream
                .compress(&input[consumed..], &mut output[produced..], FlushCompress::Finish)
                .map_err(|err| TzipError::CodecFailure(format!("deflate failed: {err}")))?;

            let consumed_now = (self.stream.total_in() - base_in) as usize;
            let produced_now = (self.stream.total_out() - base_out) as usize;

            match status {
                Status::StreamEnd => {
                    if consumed_now != input.len() {
                        return Err(TzipError::CodecFailure(format!(
                            "deflate finished after consuming {consumed_now} of {} bytes",
                            input.len()
                        )));
                    }
                    return Ok(produced_now);
                }
                Status::Ok | Status::BufError => {
                    if consumed_now == consumed && produced_now == produced {
                        return Err(overflow(output.len()));
                    }
                }
            }
        }
    }
}

fn overflow(capacity: usize) -> TzipError {
    TzipError::CodecFailure(format!(
        "compressed stream does not fit the {capacity} byte output buffer"
    ))
}

/// Inflates one zlib record, refusing output larger than `capacity` bytes.
pub fn decompress(record: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    ZlibDecoder::new(record)
        .take(capacity as u64 + 1)
        .read_to_end(&mut output)
        .map_err(|err| TzipError::DecodeFailure(format!("inflate failed: {err}")))?;

    if output.len() > capacity {
        return Err(TzipError::DecodeFailure(format!(
            "inflated record exceeds {capacity} bytes"
        )));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text(len: usize) -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog\n"
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect()
    }

    #[test]
    fn compresses_and_inflates_back() {
        let input = sample_text(10_000);
        let mut codec = ZlibCodec::new(CompressionLevel::BEST);
        let mut output = vec![0u8; 16 * 1024];

        codec.reset();
        let written = codec.compress(&input, &mut output).expect("compress");
        assert!(written < input.len());

        let restored = decompress(&output[..written], input.len()).expect("inflate");
        assert_eq!(restored, input);
    }

    #[test]
    fn reset_makes_repeated_output_identical() {
        let input = sample_text(4096);
        let mut codec = ZlibCodec::new(CompressionLevel::BEST);
        let mut first = vec![0u8; 8192];
        let mut second = vec![0u8; 8192];

        codec.reset();
        let first_len = codec.compress(&input, &mut first).expect("first");
        codec.reset();
        let second_len = codec.compress(&input, &mut second).expect("second");

        assert_eq!(first[..first_len], second[..second_len]);
    }

    #[test]
    fn empty_input_produces_valid_stream() {
        let mut codec = ZlibCodec::new(CompressionLevel::BEST);
        let mut output = vec![0u8; 64];

        codec.reset();
        let written = codec.compress(&[], &mut output).expect("compress");
        assert!(written > 0);
        assert!(decompress(&output[..written], 0).expect("inflate").is_empty());
    }

    #[test]
    fn output_capacity_overflow_is_codec_failure() {
        // xorshift output does not compress below its own size.
        let mut state = 0x2545_F491_4F6C_DD1Du64;
        let input: Vec<u8> = (0..4096)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state >> 56) as u8
            })
            .collect();
        let mut codec = ZlibCodec::new(CompressionLevel::BEST);
        let mut output = vec![0u8; 256];

        codec.reset();
        let err = codec.compress(&input, &mut output).unwrap_err();
        assert!(matches!(err, TzipError::CodecFailure(_)), "{err:?}");
    }

    #[test]
    fn decompress_rejects_garbage_and_oversize() {
        assert!(matches!(
            decompress(b"not a zlib stream", 1024),
            Err(TzipError::DecodeFailure(_))
        ));

        let input = sample_text(2048);
        let mut codec = ZlibCodec::new(CompressionLevel::BEST);
        let mut output = vec![0u8; 4096];
        codec.reset();
        let written = codec.compress(&input, &mut output).expect("compress");
        assert!(matches!(
            decompress(&output[..written], 100),
            Err(TzipError::DecodeFailure(_))
        ));
    }
}
