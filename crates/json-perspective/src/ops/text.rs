//! Operations that require a text scalar.
//!
//! Positions are counted in `char`s. Results are plain values: text derived
//! from a node does not track later changes to it.

use std::cmp::Ordering;

use regex::Regex;

use crate::error::Result;
use crate::node::NodeId;
use crate::store::Store;

/// Text-only operations.
pub trait TextOps {
    fn char_at(&self, text: NodeId, index: usize) -> Result<Option<char>>;

    fn code_point_at(&self, text: NodeId, index: usize) -> Result<Option<u32>>;

    fn to_upper_case(&self, text: NodeId) -> Result<String>;

    fn to_lower_case(&self, text: NodeId) -> Result<String>;

    fn trim(&self, text: NodeId) -> Result<String>;

    fn trim_start(&self, text: NodeId) -> Result<String>;

    fn trim_end(&self, text: NodeId) -> Result<String>;

    /// Pad on the left with repetitions of `pad` up to `target_len` chars.
    fn pad_start(&self, text: NodeId, target_len: usize, pad: &str) -> Result<String>;

    /// Pad on the right with repetitions of `pad` up to `target_len` chars.
    fn pad_end(&self, text: NodeId, target_len: usize, pad: &str) -> Result<String>;

    fn repeat(&self, text: NodeId, count: usize) -> Result<String>;

    fn starts_with(&self, text: NodeId, prefix: &str) -> Result<bool>;

    fn ends_with(&self, text: NodeId, suffix: &str) -> Result<bool>;

    /// Chars between `start` and `end` (swapped when reversed, clamped to
    /// the text).
    fn substring(&self, text: NodeId, start: usize, end: Option<usize>) -> Result<String>;

    /// Char position of the first match.
    fn search(&self, text: NodeId, pattern: &Regex) -> Result<Option<usize>>;

    /// Every non-overlapping match, in order.
    fn match_all(&self, text: NodeId, pattern: &Regex) -> Result<Vec<String>>;

    /// Replace the first match. `$1`-style group references are expanded.
    fn replace(&self, text: NodeId, pattern: &Regex, replacement: &str) -> Result<String>;

    fn replace_all(&self, text: NodeId, pattern: &Regex, replacement: &str) -> Result<String>;

    /// Split on a literal separator; an empty separator yields single chars.
    fn split(&self, text: NodeId, separator: &str) -> Result<Vec<String>>;

    fn split_pattern(&self, text: NodeId, pattern: &Regex) -> Result<Vec<String>>;

    /// Plain code-point ordering against `other`.
    fn locale_compare(&self, text: NodeId, other: &str) -> Result<Ordering>;
}

/// Byte offset of char position `index`, or the text length past the end.
pub(crate) fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(b, _)| b)
}

/// Char position of byte offset `byte`.
pub(crate) fn char_position(s: &str, byte: usize) -> usize {
    s[..byte].chars().count()
}

fn padding(len: usize, target_len: usize, pad: &str) -> String {
    if target_len <= len || pad.is_empty() {
        return String::new();
    }
    pad.chars().cycle().take(target_len - len).collect()
}

impl TextOps for Store {
    fn char_at(&self, text: NodeId, index: usize) -> Result<Option<char>> {
        Ok(self.text(text, "char_at")?.chars().nth(index))
    }

    fn code_point_at(&self, text: NodeId, index: usize) -> Result<Option<u32>> {
        Ok(self.text(text, "code_point_at")?.chars().nth(index).map(u32::from))
    }

    fn to_upper_case(&self, text: NodeId) -> Result<String> {
        Ok(self.text(text, "to_upper_case")?.to_uppercase())
    }

    fn to_lower_case(&self, text: NodeId) -> Result<String> {
        Ok(self.text(text, "to_lower_case")?.to_lowercase())
    }

    fn trim(&self, text: NodeId) -> Result<String> {
        Ok(self.text(text, "trim")?.trim().to_string())
    }

    fn trim_start(&self, text: NodeId) -> Result<String> {
        Ok(self.text(text, "trim_start")?.trim_start().to_string())
    }

    fn trim_end(&self, text: NodeId) -> Result<String> {
        Ok(self.text(text, "trim_end")?.trim_end().to_string())
    }

    fn pad_start(&self, text: NodeId, target_len: usize, pad: &str) -> Result<String> {
        let s = self.text(text, "pad_start")?;
        let mut out = padding(s.chars().count(), target_len, pad);
        out.push_str(s);
        Ok(out)
    }

    fn pad_end(&self, text: NodeId, target_len: usize, pad: &str) -> Result<String> {
        let s = self.text(text, "pad_end")?;
        let mut out = s.to_string();
        out.push_str(&padding(s.chars().count(), target_len, pad));
        Ok(out)
    }

    fn repeat(&self, text: NodeId, count: usize) -> Result<String> {
        Ok(self.text(text, "repeat")?.repeat(count))
    }

    fn starts_with(&self, text: NodeId, prefix: &str) -> Result<bool> {
        Ok(self.text(text, "starts_with")?.starts_with(prefix))
    }

    fn ends_with(&self, text: NodeId, suffix: &str) -> Result<bool> {
        Ok(self.text(text, "ends_with")?.ends_with(suffix))
    }

    fn substring(&self, text: NodeId, start: usize, end: Option<usize>) -> Result<String> {
        let s = self.text(text, "substring")?;
        let len = s.chars().count();
        let a = start.min(len);
        let b = end.map_or(len, |e| e.min(len));
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Ok(s.chars().skip(from).take(to - from).collect())
    }

    fn search(&self, text: NodeId, pattern: &Regex) -> Result<Option<usize>> {
        let s = self.text(text, "search")?;
        Ok(pattern.find(s).map(|m| char_position(s, m.start())))
    }

    fn match_all(&self, text: NodeId, pattern: &Regex) -> Result<Vec<String>> {
        let s = self.text(text, "match_all")?;
        Ok(pattern.find_iter(s).map(|m| m.as_str().to_string()).collect())
    }

    fn replace(&self, text: NodeId, pattern: &Regex, replacement: &str) -> Result<String> {
        let s = self.text(text, "replace")?;
        Ok(pattern.replace(s, replacement).into_owned())
    }

    fn replace_all(&self, text: NodeId, pattern: &Regex, replacement: &str) -> Result<String> {
        let s = self.text(text, "replace_all")?;
        Ok(pattern.replace_all(s, replacement).into_owned())
    }

    fn split(&self, text: NodeId, separator: &str) -> Result<Vec<String>> {
        let s = self.text(text, "split")?;
        if separator.is_empty() {
            return Ok(s.chars().map(String::from).collect());
        }
        Ok(s.split(separator).map(str::to_string).collect())
    }

    fn split_pattern(&self, text: NodeId, pattern: &Regex) -> Result<Vec<String>> {
        let s = self.text(text, "split_pattern")?;
        Ok(pattern.split(s).map(str::to_string).collect())
    }

    fn locale_compare(&self, text: NodeId, other: &str) -> Result<Ordering> {
        Ok(self.text(text, "locale_compare")?.cmp(other))
    }
}
