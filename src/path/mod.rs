//! Path patterns for addressing and matching nested data.
//!
//! A [`Path`] is compiled from a pattern string, a list of segments or
//! another path. Literal patterns reduce to a list of [`Segment`]s and can
//! read and write values; patterns with operators keep their syntax tree
//! and are used for matching.
//!
//! # Supported Syntax
//!
//! - `a.b.0` - Literal segments, all-digit names are array indices
//! - `a[0]` - Bracket index, same as `a.0`
//! - `*` - Any single segment (absorbs the rest when last)
//! - `*(a,b.c)` - Any of the member chains
//! - `*(!a,b)` - Anything except the members
//! - `*[10:50]` - Numeric segment within inclusive bounds
//! - `aa~` - Segment starting with `aa`
//! - `[[a.b c]]` - Literal text, whitespace ignored
//! - `a\.b` - Escaped reserved character
//! - `{a,b:c}` / `[x,y]` - Destructuring (last segment only)
//!
//! # Examples
//!
//! ```
//! use pathquill::Path;
//! use serde_json::json;
//!
//! let pattern = Path::parse("a.*[10:50].*").unwrap();
//! assert!(pattern.matches(vec!["a", "49", "s"]).unwrap());
//!
//! let mut data = json!({});
//! pathquill::set_in(&mut data, "array[0].bb[2]", json!("x")).unwrap();
//! assert_eq!(data, json!({"array": [{"bb": [null, null, "x"]}]}));
//! ```

pub mod accessor;
pub mod ast;
pub mod destructor;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod segment;
pub mod tokenizer;

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::ops::{Bound, RangeBounds};
use std::str::FromStr;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use serde_json::Value;

pub use ast::Node;
pub use destructor::{Destructor, DestructorKind, Rule};
pub use error::{ParseError, PathError};
pub use matcher::{match_segments, MatchRecord, Matcher};
pub use parser::{ParsedPattern, Parser};
pub use segment::{join_segments, Segment, Segments};

const PATH_CACHE_CAPACITY: usize = 1000;
const MATCH_CACHE_CAPACITY: usize = 200;

/// Cache key that keeps pattern text apart from segment lists, so `a.*`
/// the pattern never collides with `["a.*"]` the literal key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Pattern(String),
    Segments(Vec<String>),
}

static PATH_CACHE: LazyLock<Mutex<LruCache<CacheKey, Arc<Path>>>> =
    LazyLock::new(|| bounded(PATH_CACHE_CAPACITY));

fn bounded<K: Hash + Eq, V>(capacity: usize) -> Mutex<LruCache<K, V>> {
    let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
    Mutex::new(LruCache::new(capacity))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Anything a [`Path`] can be built from.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Pattern string, parsed as a whole.
    Text(String),
    /// Segment list; each key is parsed on its own and kept raw if it is
    /// not a literal path.
    Segments(Segments),
    /// An already compiled path.
    Path(Arc<Path>),
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::Text(text.to_string())
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Pattern::Text(text)
    }
}

impl From<&String> for Pattern {
    fn from(text: &String) -> Self {
        Pattern::Text(text.clone())
    }
}

impl From<Segments> for Pattern {
    fn from(segments: Segments) -> Self {
        Pattern::Segments(segments)
    }
}

impl From<&[Segment]> for Pattern {
    fn from(segments: &[Segment]) -> Self {
        Pattern::Segments(segments.to_vec())
    }
}

impl From<Vec<&str>> for Pattern {
    fn from(keys: Vec<&str>) -> Self {
        Pattern::Segments(keys.into_iter().map(Segment::from).collect())
    }
}

impl From<Segment> for Pattern {
    fn from(segment: Segment) -> Self {
        Pattern::Segments(vec![segment])
    }
}

impl From<usize> for Pattern {
    fn from(index: usize) -> Self {
        Pattern::Segments(vec![Segment::Index(index)])
    }
}

impl From<&Path> for Pattern {
    fn from(path: &Path) -> Self {
        Pattern::Path(Arc::new(path.clone()))
    }
}

impl From<Path> for Pattern {
    fn from(path: Path) -> Self {
        Pattern::Path(Arc::new(path))
    }
}

impl From<Arc<Path>> for Pattern {
    fn from(path: Arc<Path>) -> Self {
        Pattern::Path(path)
    }
}

impl From<&Arc<Path>> for Pattern {
    fn from(path: &Arc<Path>) -> Self {
        Pattern::Path(Arc::clone(path))
    }
}

/// A compiled path pattern.
pub struct Path {
    entire: String,
    segments: Segments,
    tree: Option<Arc<Node>>,
    is_match_pattern: bool,
    is_wild_match_pattern: bool,
    have_exclude_pattern: bool,
    match_cache: Mutex<LruCache<CacheKey, MatchRecord>>,
    includes_cache: Mutex<LruCache<CacheKey, bool>>,
}

impl Path {
    /// Compiles a path without going through the shared cache.
    pub fn new(pattern: impl Into<Pattern>) -> Result<Self, PathError> {
        match pattern.into() {
            Pattern::Text(text) => Self::from_text(&text),
            Pattern::Segments(raw) => Ok(Self::from_raw_segments(raw)),
            Pattern::Path(path) => Ok(path.as_ref().clone()),
        }
    }

    /// Compiles a path, reusing a previously compiled one for the same
    /// input when available.
    pub fn parse(pattern: impl Into<Pattern>) -> Result<Arc<Self>, PathError> {
        let pattern = pattern.into();
        let key = match &pattern {
            Pattern::Path(path) => return Ok(Arc::clone(path)),
            Pattern::Text(text) => CacheKey::Pattern(text.clone()),
            Pattern::Segments(segments) => CacheKey::Segments(render(segments)),
        };

        if let Some(path) = lock(&*PATH_CACHE).get(&key) {
            return Ok(Arc::clone(path));
        }

        log::trace!("Path cache miss for {:?}", key);
        let path = Arc::new(Self::new(pattern)?);
        if let Some((evicted, _)) = lock(&*PATH_CACHE).push(key, Arc::clone(&path)) {
            log::trace!("Path cache full, evicted {:?}", evicted);
        }
        Ok(path)
    }

    fn from_text(text: &str) -> Result<Self, PathError> {
        let parsed = Parser::parse(text)?;
        log::debug!(
            "Compiled pattern '{}' (match pattern: {}, wildcard: {}, exclude: {})",
            text,
            parsed.is_match_pattern,
            parsed.is_wild_match_pattern,
            parsed.have_exclude_pattern
        );

        if !parsed.is_match_pattern {
            return Ok(Self::literal(parsed.segments));
        }

        Ok(Self {
            entire: text.to_string(),
            segments: Vec::new(),
            tree: parsed.tree.map(Arc::new),
            is_match_pattern: true,
            is_wild_match_pattern: parsed.is_wild_match_pattern,
            have_exclude_pattern: parsed.have_exclude_pattern,
            match_cache: bounded(MATCH_CACHE_CAPACITY),
            includes_cache: bounded(MATCH_CACHE_CAPACITY),
        })
    }

    fn from_raw_segments(raw: Segments) -> Self {
        let entire = join_segments(&raw);
        let mut path = Self::literal(raw.into_iter().flat_map(normalize_segment).collect());
        path.entire = entire;
        path
    }

    fn literal(segments: Segments) -> Self {
        Self {
            entire: join_segments(&segments),
            segments,
            tree: None,
            is_match_pattern: false,
            is_wild_match_pattern: false,
            have_exclude_pattern: false,
            match_cache: bounded(MATCH_CACHE_CAPACITY),
            includes_cache: bounded(MATCH_CACHE_CAPACITY),
        }
    }

    /// Canonical text: the input for match patterns, the joined segments
    /// for literal paths.
    pub fn entire(&self) -> &str {
        &self.entire
    }

    /// Literal segments; empty for match patterns.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Syntax tree; only match patterns keep one.
    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_deref()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_match_pattern(&self) -> bool {
        self.is_match_pattern
    }

    pub fn is_wild_match_pattern(&self) -> bool {
        self.is_wild_match_pattern
    }

    pub fn have_exclude_pattern(&self) -> bool {
        self.have_exclude_pattern
    }

    fn cache_key(&self) -> CacheKey {
        if self.is_match_pattern {
            CacheKey::Pattern(self.entire.clone())
        } else {
            CacheKey::Segments(render(&self.segments))
        }
    }

    fn require_literal(&self, operation: &'static str) -> Result<(), PathError> {
        if self.is_match_pattern {
            Err(PathError::wrong_kind(&self.entire, operation))
        } else {
            Ok(())
        }
    }

    fn match_tree(&self, candidate: &[Segment]) -> MatchRecord {
        match &self.tree {
            Some(tree) => Matcher::new(tree).match_path(candidate),
            None => MatchRecord::unmatched(),
        }
    }

    // Matching

    /// Whether `pattern` matches this path. Either side may be the match
    /// pattern, but not both.
    pub fn matches(&self, pattern: impl Into<Pattern>) -> Result<bool, PathError> {
        self.match_record(pattern).map(|record| record.matched)
    }

    /// Like [`Path::matches`], also reporting the specificity score.
    pub fn match_record(&self, pattern: impl Into<Pattern>) -> Result<MatchRecord, PathError> {
        let other = Self::parse(pattern)?;
        let key = other.cache_key();
        if let Some(record) = lock(&self.match_cache).get(&key) {
            return Ok(*record);
        }

        let record = match (self.is_match_pattern, other.is_match_pattern) {
            (true, true) => return Err(PathError::wrong_kind(&other.entire, "match")),
            (false, true) => other.match_tree(&self.segments),
            (true, false) => self.match_tree(&other.segments),
            (false, false) => match_segments(&self.segments, &other.segments),
        };
        lock(&self.match_cache).put(key, record);
        Ok(record)
    }

    /// For a literal path: whether `pattern` is a prefix of it. For a match
    /// pattern: whether the literal `pattern` matches.
    pub fn includes(&self, pattern: impl Into<Pattern>) -> Result<bool, PathError> {
        let other = Self::parse(pattern)?;
        if other.is_match_pattern {
            return Err(PathError::wrong_kind(&other.entire, "includes"));
        }

        let key = other.cache_key();
        if let Some(included) = lock(&self.includes_cache).get(&key) {
            return Ok(*included);
        }

        let included = if self.is_match_pattern {
            self.match_tree(&other.segments).matched
        } else {
            other.segments.len() <= self.segments.len()
                && other
                    .segments
                    .iter()
                    .zip(&self.segments)
                    .all(|(left, right)| left.to_string() == right.to_string())
        };
        lock(&self.includes_cache).put(key, included);
        Ok(included)
    }

    /// Matches against a primary name and its alias. When this pattern has
    /// an exclusion the higher-scoring side decides, otherwise either
    /// matching is enough.
    pub fn match_alias_group(
        &self,
        name: impl Into<Pattern>,
        alias: impl Into<Pattern>,
    ) -> Result<bool, PathError> {
        let name = self.match_record(name)?;
        let alias = self.match_record(alias)?;
        if self.have_exclude_pattern {
            if name.score >= alias.score {
                Ok(name.matched)
            } else {
                Ok(alias.matched)
            }
        } else {
            Ok(name.matched || alias.matched)
        }
    }

    // Data access

    pub fn get_in<'a>(&self, source: &'a Value) -> Result<Option<Cow<'a, Value>>, PathError> {
        self.require_literal("get_in")?;
        Ok(accessor::get_in(source, &self.segments))
    }

    pub fn set_in(&self, target: &mut Value, value: Value) -> Result<(), PathError> {
        self.require_literal("set_in")?;
        accessor::set_in(target, &self.segments, value);
        Ok(())
    }

    pub fn delete_in(&self, target: &mut Value) -> Result<(), PathError> {
        self.require_literal("delete_in")?;
        accessor::delete_in(target, &self.segments);
        Ok(())
    }

    /// Checks existence starting at segment `start`, with `source` standing
    /// for the value at that prefix.
    pub fn exist_in(&self, source: &Value, start: usize) -> Result<bool, PathError> {
        self.require_literal("exist_in")?;
        Ok(accessor::exist_in(source, &self.segments, start))
    }

    // Sequence operations

    /// Returns a new path with `pattern` appended.
    pub fn concat(&self, pattern: impl Into<Pattern>) -> Result<Self, PathError> {
        self.require_literal("concat")?;
        let mut segments = self.segments.clone();
        segments.extend(pattern_segments(pattern.into()));
        Ok(Self::literal(segments))
    }

    /// Returns the sub-path covering `range`, clamped to the path length.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Self, PathError> {
        self.require_literal("slice")?;
        let len = self.segments.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        }
        .min(len);

        let segments = if start < end {
            self.segments[start..end].to_vec()
        } else {
            Vec::new()
        };
        Ok(Self::literal(segments))
    }

    /// Drops the last segment.
    pub fn parent(&self) -> Result<Self, PathError> {
        self.slice(..self.segments.len().saturating_sub(1))
    }

    pub fn push(&mut self, pattern: impl Into<Pattern>) -> Result<&mut Self, PathError> {
        self.require_literal("push")?;
        self.segments.extend(pattern_segments(pattern.into()));
        self.refresh();
        Ok(self)
    }

    pub fn pop(&mut self) -> Result<Option<Segment>, PathError> {
        self.require_literal("pop")?;
        let popped = self.segments.pop();
        self.refresh();
        Ok(popped)
    }

    /// Removes `delete_count` segments at `start` and inserts `items` in
    /// their place, returning the removed segments. Out-of-range positions
    /// are clamped.
    pub fn splice<I, P>(
        &mut self,
        start: usize,
        delete_count: usize,
        items: I,
    ) -> Result<Vec<Segment>, PathError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Pattern>,
    {
        self.require_literal("splice")?;
        let start = start.min(self.segments.len());
        let end = start.saturating_add(delete_count).min(self.segments.len());
        let inserted: Segments = items
            .into_iter()
            .flat_map(|item| pattern_segments(item.into()))
            .collect();
        let removed = self.segments.splice(start..end, inserted).collect();
        self.refresh();
        Ok(removed)
    }

    pub fn iter(&self) -> Result<std::slice::Iter<'_, Segment>, PathError> {
        self.require_literal("iter")?;
        Ok(self.segments.iter())
    }

    pub fn for_each(&self, callback: impl FnMut(&Segment)) -> Result<(), PathError> {
        self.require_literal("for_each")?;
        self.segments.iter().for_each(callback);
        Ok(())
    }

    pub fn map<T>(&self, callback: impl FnMut(&Segment) -> T) -> Result<Vec<T>, PathError> {
        self.require_literal("map")?;
        Ok(self.segments.iter().map(callback).collect())
    }

    pub fn reduce<T>(
        &self,
        initial: T,
        mut callback: impl FnMut(T, &Segment, usize) -> T,
    ) -> Result<T, PathError> {
        self.require_literal("reduce")?;
        Ok(self
            .segments
            .iter()
            .enumerate()
            .fold(initial, |acc, (index, segment)| callback(acc, segment, index)))
    }

    /// The child of this path on the way to `target`, or this path when
    /// `target` is not deeper.
    pub fn nearest_child_path_by(&self, target: impl Into<Pattern>) -> Result<Self, PathError> {
        self.require_literal("nearest_child_path_by")?;
        let target = Self::parse(target)?;
        match target.segments.get(self.segments.len()) {
            Some(next) => {
                let mut segments = self.segments.clone();
                segments.push(next.clone());
                Ok(Self::literal(segments))
            }
            None => Ok(self.clone()),
        }
    }

    /// Regenerates the canonical text after an in-place edit and forgets
    /// results computed for the old path.
    fn refresh(&mut self) {
        self.entire = join_segments(&self.segments);
        self.match_cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.includes_cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Clone for Path {
    fn clone(&self) -> Self {
        Self {
            entire: self.entire.clone(),
            segments: self.segments.clone(),
            tree: self.tree.clone(),
            is_match_pattern: self.is_match_pattern,
            is_wild_match_pattern: self.is_wild_match_pattern,
            have_exclude_pattern: self.have_exclude_pattern,
            match_cache: bounded(MATCH_CACHE_CAPACITY),
            includes_cache: bounded(MATCH_CACHE_CAPACITY),
        }
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("entire", &self.entire)
            .field("segments", &self.segments)
            .field("is_match_pattern", &self.is_match_pattern)
            .finish()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entire)
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::new(text)
    }
}

fn render(segments: &[Segment]) -> Vec<String> {
    segments.iter().map(ToString::to_string).collect()
}

/// Expands one raw list element: keys are parsed on their own and spliced
/// in when literal, otherwise kept as a single raw key.
fn normalize_segment(segment: Segment) -> Segments {
    match segment {
        Segment::Key(raw) => normalize_text(&raw),
        other => vec![other],
    }
}

fn normalize_text(raw: &str) -> Segments {
    let stripped = matcher::strip_whitespace(raw);
    match Parser::parse(&stripped) {
        Ok(parsed) if !parsed.is_match_pattern => parsed.segments,
        Ok(_) => vec![Segment::Key(stripped)],
        Err(err) => {
            log::trace!("Keeping '{}' as a raw key: {}", stripped, err);
            vec![Segment::Key(stripped)]
        }
    }
}

/// Segments contributed by an argument to a sequence operation.
fn pattern_segments(pattern: Pattern) -> Segments {
    match pattern {
        Pattern::Text(text) => normalize_text(&text),
        Pattern::Segments(segments) => segments.into_iter().flat_map(normalize_segment).collect(),
        Pattern::Path(path) => path.segments.clone(),
    }
}

/// Reads the value at `pattern` in `source`.
pub fn get_in<'a>(
    source: &'a Value,
    pattern: impl Into<Pattern>,
) -> Result<Option<Cow<'a, Value>>, PathError> {
    Path::parse(pattern)?.get_in(source)
}

/// Writes `value` at `pattern` in `target`.
pub fn set_in(target: &mut Value, pattern: impl Into<Pattern>, value: Value) -> Result<(), PathError> {
    Path::parse(pattern)?.set_in(target, value)
}

/// Removes the value at `pattern` from `target`.
pub fn delete_in(target: &mut Value, pattern: impl Into<Pattern>) -> Result<(), PathError> {
    Path::parse(pattern)?.delete_in(target)
}

/// Checks whether `pattern` exists in `source`, starting at segment `start`.
pub fn exist_in(source: &Value, pattern: impl Into<Pattern>, start: usize) -> Result<bool, PathError> {
    Path::parse(pattern)?.exist_in(source, start)
}
