//! Match-range highlighting.
//!
//! [`highlight`] splits a string into literal and emphasized segments given
//! the character ranges a search step matched. Concatenating the segment
//! texts reproduces the source exactly, provided the ranges are ascending
//! and pairwise disjoint. Whether that precondition is trusted or enforced is
//! chosen with [`RangePolicy`].

use serde::{
  Deserialize,
  Serialize,
};

/// Inclusive character range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchRange {
  pub start: usize,
  pub end:   usize,
}

impl MatchRange {
  pub const fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }
}

/// How [`highlight_with`] treats ranges supplied by the search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangePolicy {
  /// Use ranges as given. Unsorted or overlapping input yields garbled but
  /// never panicking output.
  Trust,
  /// Sort, clip to the source and merge ranges before use.
  #[default]
  Normalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
  Literal,
  Emphasized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment<'a> {
  pub kind: SegmentKind,
  pub text: &'a str,
}

impl<'a> Segment<'a> {
  pub fn literal(text: &'a str) -> Self {
    Self {
      kind: SegmentKind::Literal,
      text,
    }
  }

  pub fn emphasized(text: &'a str) -> Self {
    Self {
      kind: SegmentKind::Emphasized,
      text,
    }
  }

  pub fn is_emphasized(&self) -> bool {
    self.kind == SegmentKind::Emphasized
  }
}

/// Highlights `source` trusting `ranges` to be ascending and disjoint.
pub fn highlight<'a>(source: &'a str, ranges: &[MatchRange]) -> Vec<Segment<'a>> {
  let text = CharSlicer::new(source);
  let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
  let mut push = |segment: Segment<'a>| {
    if !segment.text.is_empty() {
      segments.push(segment);
    }
  };

  let mut prev_end = 0;
  for range in ranges {
    push(Segment::literal(text.slice(prev_end, range.start)));
    let end = range.end.saturating_add(1);
    push(Segment::emphasized(text.slice(range.start, end)));
    prev_end = end;
  }
  push(Segment::literal(text.slice(prev_end, text.len())));

  segments
}

pub fn highlight_with<'a>(
  source: &'a str,
  ranges: &[MatchRange],
  policy: RangePolicy,
) -> Vec<Segment<'a>> {
  match policy {
    RangePolicy::Trust => highlight(source, ranges),
    RangePolicy::Normalize => {
      let len = source.chars().count();
      if !is_well_formed(ranges, len) {
        tracing::warn!(?ranges, len, "normalizing malformed match ranges");
      }
      highlight(source, &normalize_ranges(ranges, len))
    },
  }
}

/// True when `ranges` are ascending, disjoint and within `len` characters.
pub fn is_well_formed(ranges: &[MatchRange], len: usize) -> bool {
  ranges.iter().all(|range| range.start <= range.end && range.end < len)
    && ranges
      .windows(2)
      .all(|pair| pair[0].end < pair[1].start)
}

/// Sorts `ranges`, drops empty or out-of-bounds ones, clips ends to `len`
/// characters and merges overlapping or touching ranges.
pub fn normalize_ranges(ranges: &[MatchRange], len: usize) -> Vec<MatchRange> {
  let mut sorted: Vec<MatchRange> = ranges
    .iter()
    .filter(|range| range.start <= range.end && range.start < len)
    .map(|range| MatchRange::new(range.start, range.end.min(len - 1)))
    .collect();
  sorted.sort_unstable();

  let mut merged: Vec<MatchRange> = Vec::with_capacity(sorted.len());
  for range in sorted {
    match merged.last_mut() {
      Some(last) if range.start <= last.end.saturating_add(1) => {
        last.end = last.end.max(range.end);
      },
      _ => merged.push(range),
    }
  }
  merged
}

/// Slices a string by character index, clamping out-of-range indices.
struct CharSlicer<'a> {
  text:    &'a str,
  offsets: Vec<usize>,
}

impl<'a> CharSlicer<'a> {
  fn new(text: &'a str) -> Self {
    let offsets = text
      .char_indices()
      .map(|(offset, _)| offset)
      .chain(std::iter::once(text.len()))
      .collect();
    Self { text, offsets }
  }

  fn len(&self) -> usize {
    self.offsets.len() - 1
  }

  fn slice(&self, start: usize, end: usize) -> &'a str {
    let start = start.min(self.len());
    let end = end.min(self.len());
    if start >= end {
      return "";
    }
    &self.text[self.offsets[start]..self.offsets[end]]
  }
}
