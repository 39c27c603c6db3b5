//! Character-level diffs for spelling suggestions and round-trip comparisons.
//!
//! `diff_chars` computes the edit script; `DiffRenderer` turns it into a
//! displayable `DiffArtifact` (an SVG image plus a plain-text rendering) and
//! memoizes artifacts by the literal `(from, to)` pair.

use crate::error::DiffRenderError;
use lru::LruCache;
use serde::Serialize;
use std::fmt::Write as _;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub const DEFAULT_DIFF_CACHE_CAPACITY: usize = 100;
pub const DEFAULT_MAX_DIFF_CHARS: usize = 2000;

const CHAR_WIDTH: f64 = 8.4;
const LINE_HEIGHT: f64 = 22.0;
const PADDING: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiffKind {
    Unchanged,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub text: String,
    pub kind: DiffKind,
}

/// Collects single characters into merged, non-empty segments.
#[derive(Default)]
struct SegmentBuilder {
    segments: Vec<DiffSegment>,
}

impl SegmentBuilder {
    fn push(&mut self, kind: DiffKind, chars: &[char]) {
        if chars.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.kind == kind => last.text.extend(chars),
            _ => self.segments.push(DiffSegment {
                text: chars.iter().collect(),
                kind,
            }),
        }
    }

    fn finish(self) -> Vec<DiffSegment> {
        self.segments
    }
}

/// Edit script turning `from` into `to`, one character at a time.
///
/// Common prefix and suffix are split off first; the middle is aligned with a
/// longest-common-subsequence table. Removals are emitted before additions
/// within a changed run.
pub fn diff_chars(from: &str, to: &str) -> Vec<DiffSegment> {
    let a: Vec<char> = from.chars().collect();
    let b: Vec<char> = to.chars().collect();

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];

    let mut builder = SegmentBuilder::default();
    builder.push(DiffKind::Unchanged, &a[..prefix]);
    lcs_walk(a_mid, b_mid, &mut builder);
    builder.push(DiffKind::Unchanged, &a[a.len() - suffix..]);
    builder.finish()
}

fn lcs_walk(a: &[char], b: &[char], builder: &mut SegmentBuilder) {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    // table[i * width + j] = LCS length of a[i..] and b[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            builder.push(DiffKind::Unchanged, &a[i..=i]);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            builder.push(DiffKind::Removed, &a[i..=i]);
            i += 1;
        } else {
            builder.push(DiffKind::Added, &b[j..=j]);
            j += 1;
        }
    }
    builder.push(DiffKind::Removed, &a[i..]);
    builder.push(DiffKind::Added, &b[j..]);
}

/// A rendered diff, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffArtifact {
    pub segments: Vec<DiffSegment>,
    /// Standalone SVG image of the diff
    pub svg: String,
    /// Terminal rendering: `[-removed-]` and `{+added+}`
    pub plain: String,
}

impl DiffArtifact {
    /// Text on the `from` side: unchanged and removed segments.
    pub fn from_text(&self) -> String {
        self.side(DiffKind::Removed)
    }

    /// Text on the `to` side: unchanged and added segments.
    pub fn to_text(&self) -> String {
        self.side(DiffKind::Added)
    }

    pub fn has_changes(&self) -> bool {
        self.segments.iter().any(|s| s.kind != DiffKind::Unchanged)
    }

    fn side(&self, changed: DiffKind) -> String {
        self.segments
            .iter()
            .filter(|s| s.kind == DiffKind::Unchanged || s.kind == changed)
            .map(|s| s.text.as_str())
            .collect()
    }
}

/// Memoizing diff renderer with its own bounded cache.
pub struct DiffRenderer {
    cache: Mutex<LruCache<(String, String), Arc<DiffArtifact>>>,
    max_chars: usize,
}

impl DiffRenderer {
    pub fn new(capacity: usize, max_chars: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            max_chars,
        }
    }

    /// Diff and render `from` → `to`, reusing a cached artifact for the same pair.
    ///
    /// Inputs longer than the configured limit (both sides together) fail with
    /// `DiffRenderError::TooLarge`. Failures are not cached.
    pub fn diff(&self, from: &str, to: &str) -> Result<Arc<DiffArtifact>, DiffRenderError> {
        let key = (from.to_string(), to.to_string());
        if let Some(artifact) = self.lock().get(&key) {
            return Ok(Arc::clone(artifact));
        }

        let chars = from.chars().count() + to.chars().count();
        if chars > self.max_chars {
            return Err(DiffRenderError::TooLarge {
                chars,
                limit: self.max_chars,
            });
        }

        let segments = diff_chars(from, to);
        let artifact = Arc::new(DiffArtifact {
            svg: render_svg(&segments),
            plain: render_plain(&segments),
            segments,
        });
        debug!(
            "Rendered diff with {} segments ({} chars)",
            artifact.segments.len(),
            chars
        );

        self.lock().put(key, Arc::clone(&artifact));
        Ok(artifact)
    }

    pub fn cached_len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<(String, String), Arc<DiffArtifact>>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DIFF_CACHE_CAPACITY, DEFAULT_MAX_DIFF_CHARS)
    }
}

fn render_plain(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment.kind {
            DiffKind::Unchanged => out.push_str(&segment.text),
            DiffKind::Removed => {
                let _ = write!(out, "[-{}-]", segment.text);
            }
            DiffKind::Added => {
                let _ = write!(out, "{{+{}+}}", segment.text);
            }
        }
    }
    out
}

fn render_svg(segments: &[DiffSegment]) -> String {
    let chars: usize = segments.iter().map(|s| s.text.chars().count()).sum();
    let width = (chars.max(1) as f64) * CHAR_WIDTH + 2.0 * PADDING;
    let height = LINE_HEIGHT + PADDING;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        width, height, width, height
    );
    let _ = write!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-family="monospace" font-size="14" xml:space="preserve">"#,
        PADDING,
        LINE_HEIGHT - 4.0
    );
    for segment in segments {
        let style = match segment.kind {
            DiffKind::Unchanged => r#"fill="currentColor""#,
            DiffKind::Added => r##"fill="#1a7f37" font-weight="bold""##,
            DiffKind::Removed => r##"fill="#cf222e" text-decoration="line-through""##,
        };
        let _ = write!(svg, "<tspan {}>{}</tspan>", style, escape_xml(&segment.text));
    }
    svg.push_str("</text></svg>");
    svg
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
