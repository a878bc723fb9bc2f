use crate::Result;

pub mod zlib;

pub use zlib::{ZlibCodec, decompress};

/// A block codec whose state is created once and reused across inputs.
///
/// Construction plays the role of codec initialisation and `Drop` of
/// teardown. Callers must [`reset`](Codec::reset) between inputs; a codec is
/// never shared between threads, only moved into the worker that owns it.
pub trait Codec: Send {
    /// Returns the codec to its freshly initialised state without reallocating.
    fn reset(&mut self);

    /// Compresses all of `input` into `output` and returns the bytes written.
    ///
    /// `output.len()` is the hard ceiling; a stream that does not finish within
    /// it is a [`TzipError::CodecFailure`](crate::TzipError::CodecFailure).
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize>;
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        (**self).compress(input, output)
    }
}
