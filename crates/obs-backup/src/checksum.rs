//! SHA256 helpers shared by the encoder and the verifier.

use sha2::{Digest, Sha256};
use std::io::{self, Read};
use std::path::PathBuf;

/// Digest recorded for one archived regular file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDigest {
    /// Entry name inside the archive
    pub name: PathBuf,

    /// Lowercase hex SHA256 of the payload
    pub sha256: String,
}

/// Reader adapter that hashes everything passing through it.
pub struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
    bytes: u64,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    /// Number of bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }

    /// Consume the reader and return the hex digest
    pub fn finalize(self) -> String {
        hex_digest(self.hasher)
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }
}

/// Hash a reader to EOF
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(reader, &mut hasher)?;
    Ok(hex_digest(hasher))
}

fn hex_digest(hasher: Sha256) -> String {
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_sha256_reader() {
        let mut data: &[u8] = b"abc";
        assert_eq!(sha256_reader(&mut data).unwrap(), ABC_SHA256);
    }

    #[test]
    fn test_hashing_reader_passes_data_through() {
        let mut reader = HashingReader::new(&b"abc"[..]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();

        assert_eq!(out, b"abc");
        assert_eq!(reader.bytes_read(), 3);
        assert_eq!(reader.finalize(), ABC_SHA256);
    }
}
