//! Stream compression codecs wrapped around tar archives

use std::io::{self, Read, Write};

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

/// Compression codec applied to a tar byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarCodec {
    Plain,
    Gzip,
    Bzip2,
    Xz,
}

impl TarCodec {
    /// Wrap `inner` in a decoder for this codec.
    pub fn reader<R: Read>(self, inner: R) -> TarReader<R> {
        match self {
            Self::Plain => TarReader::Plain(inner),
            Self::Gzip => TarReader::Gzip(Box::new(GzDecoder::new(inner))),
            Self::Bzip2 => TarReader::Bzip2(Box::new(BzDecoder::new(inner))),
            Self::Xz => TarReader::Xz(Box::new(XzDecoder::new(inner))),
        }
    }

    /// Wrap `inner` in an encoder for this codec.
    pub fn writer<W: Write>(self, inner: W) -> TarWriter<W> {
        match self {
            Self::Plain => TarWriter::Plain(inner),
            Self::Gzip => TarWriter::Gzip(Box::new(GzEncoder::new(
                inner,
                flate2::Compression::default(),
            ))),
            Self::Bzip2 => TarWriter::Bzip2(Box::new(BzEncoder::new(
                inner,
                bzip2::Compression::default(),
            ))),
            Self::Xz => TarWriter::Xz(Box::new(XzEncoder::new(inner, 6))),
        }
    }
}

/// Decoder wrapper over the codec variants.
pub enum TarReader<R: Read> {
    Plain(R),
    Gzip(Box<GzDecoder<R>>),
    Bzip2(Box<BzDecoder<R>>),
    Xz(Box<XzDecoder<R>>),
}

impl<R: Read> Read for TarReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(r) => r.read(buf),
            Self::Gzip(r) => r.read(buf),
            Self::Bzip2(r) => r.read(buf),
            Self::Xz(r) => r.read(buf),
        }
    }
}

/// Encoder wrapper over the codec variants.
pub enum TarWriter<W: Write> {
    Plain(W),
    Gzip(Box<GzEncoder<W>>),
    Bzip2(Box<BzEncoder<W>>),
    Xz(Box<XzEncoder<W>>),
}

impl<W: Write> Write for TarWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(w) => w.write(buf),
            Self::Bzip2(w) => w.write(buf),
            Self::Xz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
            Self::Bzip2(w) => w.flush(),
            Self::Xz(w) => w.flush(),
        }
    }
}

impl<W: Write> TarWriter<W> {
    /// Finalize the compressed stream and hand back the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Plain(w) => Ok(w),
            Self::Gzip(w) => w.finish(),
            Self::Bzip2(w) => w.finish(),
            Self::Xz(w) => w.finish(),
        }
    }
}
