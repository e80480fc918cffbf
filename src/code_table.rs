use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::tree::{HuffmanTree, Node};

pub type Code = BitBox<u8, Msb0>;

/// Symbol to bit-pattern mapping derived from a [`HuffmanTree`].
///
/// Left edges contribute a `0`, right edges a `1`. Every code is non-empty and
/// no code is a prefix of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<char, Code>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = HashMap::new();
        let mut stack = vec![(tree.root(), BitVec::<u8, Msb0>::new())];

        while let Some((id, prefix)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf(symbol) => {
                    codes.insert(symbol, prefix.into_boxed_bitslice());
                }
                Node::Internal { left, right } => {
                    let mut right_code = prefix.clone();
                    right_code.push(true);
                    stack.push((right, right_code));

                    let mut left_code = prefix;
                    left_code.push(false);
                    stack.push((left, left_code));
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: char) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|code| code.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &BitSlice<u8, Msb0>)> {
        self.codes.iter().map(|(&s, code)| (s, code.as_bitslice()))
    }

    /// Concatenates the code of every symbol of `text`, in order.
    pub fn encode(&self, text: &str) -> Result<BitVec<u8, Msb0>> {
        let mut out = BitVec::new();
        for symbol in text.chars() {
            let code = self.codes.get(&symbol).ok_or(Error::UnknownSymbol(symbol))?;
            out.extend_from_bitslice(code.as_bitslice());
        }
        Ok(out)
    }

    /// Total number of bits `encode` produces for an input with these counts.
    pub fn encoded_len(&self, freq: impl IntoIterator<Item = (char, u64)>) -> u64 {
        freq.into_iter()
            .map(|(s, count)| self.codes.get(&s).map_or(0, |c| c.len() as u64) * count)
            .sum()
    }
}

/// Persistable form of a [`CodeTable`]; each code is kept as its bit length
/// and its bits packed MSB-first into bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableCodeTable {
    codes: HashMap<char, (usize, Box<[u8]>)>,
}

impl SerializableCodeTable {
    /// Writes the table as MessagePack.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::result::Result<(), rmp_serde::encode::Error> {
        rmp_serde::encode::write(writer, self)
    }

    pub fn read_from<R: Read>(reader: R) -> std::result::Result<Self, rmp_serde::decode::Error> {
        rmp_serde::decode::from_read(reader)
    }
}

impl<'a> From<&'a CodeTable> for SerializableCodeTable {
    fn from(table: &'a CodeTable) -> Self {
        Self {
            codes: table
                .codes
                .iter()
                .map(|(&s, code)| {
                    let len = code.len();
                    let bytes = code.clone().into_bitvec().into_vec().into_boxed_slice();
                    (s, (len, bytes))
                })
                .collect(),
        }
    }
}

impl From<SerializableCodeTable> for CodeTable {
    fn from(other: SerializableCodeTable) -> Self {
        Self {
            codes: other
                .codes
                .into_iter()
                .map(|(s, (len, bytes))| {
                    let mut bv = BitVec::<u8, Msb0>::from_vec(bytes.into_vec());
                    bv.resize(len, false);
                    (s, bv.into_boxed_bitslice())
                })
                .collect(),
        }
    }
}
