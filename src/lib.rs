//! Lossless text compression with static Huffman coding.
//!
//! ```
//! let compressed = huffpress::encode("abracadabra").unwrap();
//! let restored = huffpress::decode(&compressed.text).unwrap();
//! assert_eq!(restored.text, "abracadabra");
//! ```
//!
//! The pieces are usable on their own: [`FrequencyTable`] counts symbols,
//! [`HuffmanTree`] merges them through a [`heap::MinHeap`], [`CodeTable`]
//! assigns bit patterns, [`tree_codec`] writes the tree as text and
//! [`bit_packer`] turns code bits into bytes.

pub mod bit_packer;
pub mod code_table;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod heap;
pub mod stats;
pub mod tree;
pub mod tree_codec;

pub use code_table::{CodeTable, SerializableCodeTable};
pub use codec::{decode, encode, Compressed, Decompressed, Layout};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use stats::CompressionStats;
pub use tree::HuffmanTree;
