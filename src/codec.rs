//! Top-level compression and decompression.
//!
//! A compressed stream takes one of three shapes, fields separated by `#`:
//!
//! - `zer#` for an empty input;
//! - `one#<symbol>#<count>` for an input made of a single distinct symbol;
//! - `<tree length>#<padding>#<tree><payload>` otherwise, where the tree
//!   length counts chars, the padding is the number of zero bits (0..=7)
//!   filling the last payload byte, and every payload char is one packed byte
//!   (`U+0000..=U+00FF`).

use log::debug;
use std::str::FromStr;

use crate::bit_packer;
use crate::code_table::CodeTable;
use crate::error::{HeaderError, PayloadError, Result, TreeError};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use crate::tree_codec;

pub const DELIMITER: char = '#';
pub const EMPTY_TAG: &str = "zer";
pub const SINGLE_TAG: &str = "one";

/// Which of the three stream shapes was produced or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Empty,
    Single,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub text: String,
    pub layout: Layout,
    pub message: &'static str,
}

impl Compressed {
    pub fn into_parts(self) -> (String, &'static str) {
        (self.text, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    pub text: String,
    pub layout: Layout,
    pub message: &'static str,
}

impl Decompressed {
    pub fn into_parts(self) -> (String, &'static str) {
        (self.text, self.message)
    }
}

/// Compresses `input`.
///
/// Fails only if the code table built from `input` cannot encode `input`,
/// which does not happen.
pub fn encode(input: &str) -> Result<Compressed> {
    let freq = FrequencyTable::from_text(input);

    let Some(tree) = HuffmanTree::from_frequencies(&freq) else {
        return Ok(match freq.single() {
            Some((symbol, count)) => {
                debug!("single symbol {symbol:?} repeated {count} times");
                Compressed {
                    text: format!("{SINGLE_TAG}{DELIMITER}{symbol}{DELIMITER}{count}"),
                    layout: Layout::Single,
                    message: "Compression done.\n\
                              Special case: the input holds only one distinct character.",
                }
            }
            None => {
                debug!("empty input");
                Compressed {
                    text: format!("{EMPTY_TAG}{DELIMITER}"),
                    layout: Layout::Empty,
                    message: "Compression done.\n\
                              The input was empty, so only minimal metadata was written.",
                }
            }
        });
    };

    let table = CodeTable::from_tree(&tree);
    let packed = bit_packer::pack(table.encode(input)?);
    let tree_string = tree_codec::serialize(&tree);
    let tree_len = tree_string.chars().count();

    debug!(
        "{} distinct symbols, tree of {} chars, {} payload bytes, {} padding bits",
        freq.len(),
        tree_len,
        packed.bytes.len(),
        packed.padding
    );

    let mut text = format!(
        "{tree_len}{DELIMITER}{}{DELIMITER}{tree_string}",
        packed.padding
    );
    text.extend(packed.bytes.iter().map(|&b| char::from(b)));

    Ok(Compressed {
        text,
        layout: Layout::General,
        message: "Compression done.",
    })
}

/// Restores the text a call to [`encode`] produced `input` from.
pub fn decode(input: &str) -> Result<Decompressed> {
    let (tag, rest) = input
        .split_once(DELIMITER)
        .ok_or(HeaderError::MissingDelimiter { field: "tag" })?;

    match tag {
        EMPTY_TAG => {
            debug!("empty stream");
            Ok(Decompressed {
                text: String::new(),
                layout: Layout::Empty,
                message: "Decompression done.\nThe original text was empty.",
            })
        }
        SINGLE_TAG => decode_single(rest),
        _ => decode_general(tag, rest),
    }
}

fn decode_single(rest: &str) -> Result<Decompressed> {
    let mut chars = rest.chars();
    let symbol = chars.next().ok_or(HeaderError::MissingSymbol)?;
    let count_field = chars
        .as_str()
        .strip_prefix(DELIMITER)
        .ok_or(HeaderError::MissingDelimiter { field: "symbol" })?;
    let count: u64 = parse_number("count", count_field)?;
    let text = repeat_symbol(symbol, count)?;

    debug!("single symbol {symbol:?} repeated {count} times");
    Ok(Decompressed {
        text,
        layout: Layout::Single,
        message: "Decompression done.\nSingle-character text restored.",
    })
}

fn decode_general(tag: &str, rest: &str) -> Result<Decompressed> {
    let tree_len: usize = parse_number("tree length", tag)?;
    let (padding_field, body) = rest
        .split_once(DELIMITER)
        .ok_or(HeaderError::MissingDelimiter { field: "padding" })?;
    let padding: u32 = parse_number("padding", padding_field)?;
    if padding > 7 {
        return Err(HeaderError::PaddingOutOfRange(padding).into());
    }

    let (tree_string, payload) =
        split_at_chars(body, tree_len).ok_or_else(|| TreeError::Truncated {
            declared: tree_len,
            available: body.chars().count(),
        })?;
    let tree = tree_codec::deserialize(tree_string)?;

    let bytes = payload
        .chars()
        .enumerate()
        .map(|(offset, c)| {
            u8::try_from(c).map_err(|_| PayloadError::UnitOutOfRange {
                offset,
                value: u32::from(c),
            })
        })
        .collect::<std::result::Result<Vec<u8>, _>>()?;
    let bits = bit_packer::unpack(&bytes, padding as u8)?;

    debug!(
        "tree of {} chars with {} leaves, {} payload bytes, {} padding bits",
        tree_len,
        tree.leaf_count(),
        bytes.len(),
        padding
    );

    Ok(Decompressed {
        text: tree.decode(&bits)?,
        layout: Layout::General,
        message: "Decompression done.",
    })
}

/// `count` copies of `symbol`, or `CountTooLarge` if the text cannot be
/// allocated.
fn repeat_symbol(symbol: char, count: u64) -> std::result::Result<String, HeaderError> {
    let too_large = || HeaderError::CountTooLarge { count };
    let bytes = usize::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(symbol.len_utf8()))
        .ok_or_else(too_large)?;

    let mut text = String::new();
    text.try_reserve_exact(bytes).map_err(|_| too_large())?;
    for _ in 0..count {
        text.push(symbol);
    }
    Ok(text)
}

/// Parses a field made of ASCII digits only; signs and blanks are rejected.
fn parse_number<T: FromStr>(field: &'static str, value: &str) -> std::result::Result<T, HeaderError> {
    let invalid = || HeaderError::InvalidNumber {
        field,
        value: value.to_owned(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

/// Splits `s` after its first `n` chars, or `None` if it is shorter.
fn split_at_chars(s: &str, n: usize) -> Option<(&str, &str)> {
    match s.char_indices().nth(n) {
        Some((i, _)) => Some(s.split_at(i)),
        None if s.chars().count() == n => Some((s, "")),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn round_trip(input: &str) -> String {
        let compressed = encode(input).unwrap();
        decode(&compressed.text).unwrap().text
    }

    #[test]
    fn empty_input() {
        let compressed = encode("").unwrap();
        assert_eq!(compressed.text, "zer#");
        assert_eq!(compressed.layout, Layout::Empty);

        let decompressed = decode("zer#").unwrap();
        assert_eq!(decompressed.text, "");
        assert_eq!(decompressed.layout, Layout::Empty);
    }

    #[test]
    fn single_symbol() {
        let (text, message) = encode("aaaa").unwrap().into_parts();
        assert_eq!(text, "one#a#4");
        assert!(message.contains("one distinct character"));
        assert_eq!(decode("one#a#4").unwrap().text, "aaaa");
    }

    #[test]
    fn single_delimiter_symbol() {
        let compressed = encode("###").unwrap();
        assert_eq!(compressed.text, "one####3");
        assert_eq!(decode(&compressed.text).unwrap().text, "###");
    }

    #[test]
    fn two_symbols() {
        let compressed = encode("ab").unwrap();
        assert_eq!(compressed.layout, Layout::General);
        assert_eq!(compressed.text, "5#6#0'a'b@");
        assert_eq!(decode(&compressed.text).unwrap().text, "ab");
    }

    #[test]
    fn skewed_symbols() {
        let compressed = encode("aaaab").unwrap();
        assert_eq!(compressed.text, "5#3#0'b'a\u{f0}");
        assert_eq!(decode(&compressed.text).unwrap().text, "aaaab");
    }

    #[test]
    fn round_trips_text_with_markers_and_unicode() {
        for input in [
            "hello, world",
            "0'0'#'#0",
            "zer#",
            "one#a#4",
            "héllo wörld ☃ 🦀",
            "\u{0}\u{ff}\u{100}",
        ] {
            assert_eq!(round_trip(input), input);
        }
    }

    #[test]
    fn missing_tag_delimiter() {
        assert_eq!(
            decode("12345"),
            Err(Error::MalformedHeader(HeaderError::MissingDelimiter {
                field: "tag"
            }))
        );
        assert!(matches!(
            decode(""),
            Err(Error::MalformedHeader(HeaderError::MissingDelimiter { .. }))
        ));
    }

    #[test]
    fn unknown_tag() {
        assert_eq!(
            decode("two#a"),
            Err(Error::MalformedHeader(HeaderError::InvalidNumber {
                field: "tree length",
                value: "two".into()
            }))
        );
    }

    #[test]
    fn malformed_single() {
        assert_eq!(
            decode("one#"),
            Err(Error::MalformedHeader(HeaderError::MissingSymbol))
        );
        assert_eq!(
            decode("one#ab4"),
            Err(Error::MalformedHeader(HeaderError::MissingDelimiter {
                field: "symbol"
            }))
        );
        assert!(matches!(
            decode("one#a#x"),
            Err(Error::MalformedHeader(HeaderError::InvalidNumber { field: "count", .. }))
        ));
    }

    #[test]
    fn single_count_too_large() {
        assert_eq!(
            decode("one#a#18446744073709551615"),
            Err(Error::MalformedHeader(HeaderError::CountTooLarge {
                count: u64::MAX
            }))
        );
        assert!(matches!(
            decode("one#\u{1F980}#9223372036854775807"),
            Err(Error::MalformedHeader(HeaderError::CountTooLarge { .. }))
        ));
        assert!(matches!(
            decode("one#a#18446744073709551616"),
            Err(Error::MalformedHeader(HeaderError::InvalidNumber { field: "count", .. }))
        ));
    }

    #[test]
    fn numbers_must_be_plain_digits() {
        assert_eq!(
            decode("one#a#+3"),
            Err(Error::MalformedHeader(HeaderError::InvalidNumber {
                field: "count",
                value: "+3".into()
            }))
        );
        assert_eq!(
            decode("+5#6#0'a'b@"),
            Err(Error::MalformedHeader(HeaderError::InvalidNumber {
                field: "tree length",
                value: "+5".into()
            }))
        );
        assert_eq!(
            decode("5#+6#0'a'b@"),
            Err(Error::MalformedHeader(HeaderError::InvalidNumber {
                field: "padding",
                value: "+6".into()
            }))
        );
        assert!(matches!(
            decode("one#a# 3"),
            Err(Error::MalformedHeader(HeaderError::InvalidNumber { .. }))
        ));
        assert_eq!(decode("5#6#0'a'b@").unwrap().text, "ab");
    }

    #[test]
    fn malformed_padding() {
        assert_eq!(
            decode("5#6"),
            Err(Error::MalformedHeader(HeaderError::MissingDelimiter {
                field: "padding"
            }))
        );
        assert_eq!(
            decode("5#9#0'a'b@"),
            Err(Error::MalformedHeader(HeaderError::PaddingOutOfRange(9)))
        );
    }

    #[test]
    fn tree_longer_than_stream() {
        assert_eq!(
            decode("50#6#0'a'b@"),
            Err(Error::MalformedTree(TreeError::Truncated {
                declared: 50,
                available: 6
            }))
        );
    }

    #[test]
    fn tree_length_mismatch() {
        assert!(matches!(
            decode("4#6#0'a'b@"),
            Err(Error::MalformedTree(TreeError::UnexpectedEnd { .. }))
        ));
        assert!(matches!(
            decode("6#6#0'a'b@"),
            Err(Error::MalformedTree(TreeError::TrailingInput { offset: 5 }))
        ));
    }

    #[test]
    fn payload_unit_out_of_range() {
        assert_eq!(
            decode("5#0#0'a'b\u{100}"),
            Err(Error::MalformedPayload(PayloadError::UnitOutOfRange {
                offset: 0,
                value: 0x100
            }))
        );
    }

    #[test]
    fn payload_without_bits_for_padding() {
        assert!(matches!(
            decode("5#3#0'a'b"),
            Err(Error::MalformedPayload(PayloadError::PaddingExceedsPayload { .. }))
        ));
    }

    #[test]
    fn split_at_chars_counts_chars() {
        assert_eq!(split_at_chars("é'a", 1), Some(("é", "'a")));
        assert_eq!(split_at_chars("ab", 2), Some(("ab", "")));
        assert_eq!(split_at_chars("ab", 3), None);
    }
}
