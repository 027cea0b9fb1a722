//! Fuzzy matching with match positions, powered by [`nucleo`].
//!
//! A query is split on whitespace into atoms; a haystack matches when every
//! atom matches it. Scores of the atoms are summed and the matched character
//! positions are folded into ascending, disjoint [`MatchRange`]s ready for
//! [`crate::highlight`].
//!
//! Smart case applies: lowercase atoms match case-insensitively, atoms with
//! an uppercase character match case-sensitively.

use std::cell::RefCell;

use nucleo::{
  Config,
  Matcher,
  Utf32Str,
  pattern::{
    Atom,
    AtomKind,
    CaseMatching,
    Normalization,
  },
};

use crate::highlight::MatchRange;

thread_local! {
  static MATCHER: RefCell<Matcher> = RefCell::new(Matcher::new(Config::DEFAULT));
}

/// A parsed query, reusable across haystacks.
#[derive(Debug, Clone)]
pub struct FuzzyQuery {
  atoms: Vec<Atom>,
}

impl FuzzyQuery {
  pub fn parse(query: &str) -> Self {
    let atoms = query
      .split_whitespace()
      .map(|token| {
        Atom::new(
          token,
          CaseMatching::Smart,
          Normalization::Smart,
          AtomKind::Fuzzy,
          false,
        )
      })
      .collect();
    Self { atoms }
  }

  pub fn is_empty(&self) -> bool {
    self.atoms.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
  pub score:  u32,
  pub ranges: Vec<MatchRange>,
}

/// Matches `haystack` using a thread-local matcher.
pub fn fuzzy_match(query: &FuzzyQuery, haystack: &str) -> Option<FuzzyMatch> {
  MATCHER.with(|matcher| fuzzy_match_with(&mut matcher.borrow_mut(), query, haystack))
}

/// Matches `haystack` using a caller-provided matcher.
pub fn fuzzy_match_with(
  matcher: &mut Matcher,
  query: &FuzzyQuery,
  haystack: &str,
) -> Option<FuzzyMatch> {
  if query.is_empty() {
    return None;
  }

  // One code point per slot, so indices line up with `MatchRange`.
  let chars: Vec<char> = haystack.chars().collect();
  let mut indices = Vec::new();
  let mut score = 0u32;
  for atom in &query.atoms {
    let atom_score = atom.indices(Utf32Str::Unicode(&chars), matcher, &mut indices)?;
    score = score.saturating_add(u32::from(atom_score));
  }

  Some(FuzzyMatch {
    score,
    ranges: indices_to_ranges(indices),
  })
}

/// Folds matched positions into inclusive runs of consecutive indices.
pub fn indices_to_ranges(mut indices: Vec<u32>) -> Vec<MatchRange> {
  indices.sort_unstable();
  indices.dedup();

  let mut ranges: Vec<MatchRange> = Vec::new();
  for index in indices {
    let index = index as usize;
    match ranges.last_mut() {
      Some(last) if last.end + 1 == index => last.end = index,
      _ => ranges.push(MatchRange::new(index, index)),
    }
  }
  ranges
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contiguous_indices_become_one_range() {
    assert_eq!(indices_to_ranges(vec![4, 0, 1, 2, 6, 5, 1]), [
      MatchRange::new(0, 2),
      MatchRange::new(4, 6),
    ]);
    assert!(indices_to_ranges(Vec::new()).is_empty());
  }

  #[test]
  fn blank_query_matches_nothing() {
    let query = FuzzyQuery::parse("   ");
    assert!(query.is_empty());
    assert_eq!(fuzzy_match(&query, "anything"), None);
  }

  #[test]
  fn exact_substring_is_one_range() {
    let query = FuzzyQuery::parse("plan");
    let found = fuzzy_match(&query, "plan_type").unwrap();
    assert_eq!(found.ranges, [MatchRange::new(0, 3)]);
    assert!(found.score > 0);
  }

  #[test]
  fn every_atom_must_match() {
    let query = FuzzyQuery::parse("hmo zzz");
    assert_eq!(fuzzy_match(&query, "HMO PPO EPO POS"), None);

    let query = FuzzyQuery::parse("hmo ppo");
    let found = fuzzy_match(&query, "HMO PPO EPO POS").unwrap();
    assert_eq!(found.ranges, [MatchRange::new(0, 2), MatchRange::new(4, 6)]);
  }

  #[test]
  fn smart_case() {
    assert!(fuzzy_match(&FuzzyQuery::parse("grp"), "GRP001").is_some());
    assert!(fuzzy_match(&FuzzyQuery::parse("Grp"), "GRP001").is_none());
  }

  #[test]
  fn combining_marks_keep_char_positions() {
    let found = fuzzy_match(&FuzzyQuery::parse("plan"), "Cafe\u{301} plan").unwrap();
    assert_eq!(found.ranges, [MatchRange::new(6, 9)]);
  }

  #[test]
  fn non_matching_haystack() {
    assert!(fuzzy_match(&FuzzyQuery::parse("xyz"), "plan_type").is_none());
  }
}
