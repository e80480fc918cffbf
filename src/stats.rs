use std::fmt;

/// Size comparison between an original text and its compressed form, both
/// measured in UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_bytes: usize,
    pub compressed_bytes: usize,
}

impl CompressionStats {
    pub fn new(original: &str, compressed: &str) -> Self {
        Self {
            original_bytes: original.len(),
            compressed_bytes: compressed.len(),
        }
    }

    /// Compressed size as a percentage of the original size; 0 for an empty
    /// original.
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.compressed_bytes as f64 / self.original_bytes as f64 * 100.0
    }

    pub fn saved(&self) -> f64 {
        100.0 - self.ratio()
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original size:   {} bytes", self.original_bytes)?;
        writeln!(f, "Compressed size: {} bytes", self.compressed_bytes)?;
        writeln!(f)?;
        writeln!(f, "Compression ratio: {:.2} %", self.ratio())?;
        write!(f, "Space saved:       {:.2} %", self.saved())
    }
}
