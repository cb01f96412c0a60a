//! Linking files and their two in-memory views.
//!
//! A linking file holds one `<mention> <kb-id>` record per line. It is read
//! into a [`Clustering`] (kb-id -> mentions) and inverted into an
//! [`IdentityMap`] (mention -> kb-id). [`Linking`] keeps both, plus a name.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::{ScoreError, ScoreResult};
use crate::mention::{KbId, Mention};

/// Knobs for the line parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Ignore tokens after the second one (e.g. a trailing confidence column).
    pub allow_extra_columns: bool,
    /// Warn about NIL identifiers that are not `NIL` + three digits.
    pub lint_nil_format: bool,
}

// ---------------------------------------------------------------------------
// Clustering
// ---------------------------------------------------------------------------

/// Partition of mentions into clusters keyed by kb-id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clustering {
    clusters: BTreeMap<KbId, BTreeSet<Mention>>,
}

impl Clustering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, mention: Mention, kb_id: KbId) -> bool {
        self.clusters.entry(kb_id).or_default().insert(mention)
    }

    pub fn get(&self, kb_id: &KbId) -> Option<&BTreeSet<Mention>> {
        self.clusters.get(kb_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KbId, &BTreeSet<Mention>)> {
        self.clusters.iter()
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Sum of all cluster sizes.
    pub fn mention_count(&self) -> usize {
        self.clusters.values().map(BTreeSet::len).sum()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Clustering {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut clustering = Self::new();
        for (mention, kb_id) in iter {
            clustering.insert(Mention::new(mention), KbId::new(kb_id));
        }
        clustering
    }
}

/// Read `<mention> <kb-id>` records. Blank lines carry no record and are
/// skipped, with a debug line naming their position.
pub fn parse_clustering(origin: &str, text: &str, options: ParseOptions) -> ScoreResult<Clustering> {
    let mut clustering = Clustering::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            debug!(origin, line = idx + 1, "skipping blank line");
            continue;
        }

        let mut tokens = line.split_whitespace();
        let (mention, kb_id) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(m), Some(k), None) => (m, k),
            (Some(m), Some(k), Some(_)) if options.allow_extra_columns => (m, k),
            _ => {
                return Err(ScoreError::MalformedLine {
                    origin: origin.to_string(),
                    line: idx + 1,
                    content: line.to_string(),
                })
            }
        };

        let kb_id = KbId::new(kb_id);
        if options.lint_nil_format && kb_id.is_nil() && !kb_id.is_well_formed_nil() {
            warn!(origin, line = idx + 1, %kb_id, "NIL identifier is not of the form NILxxx");
        }
        clustering.insert(Mention::new(mention), kb_id);
    }

    debug!(
        origin,
        clusters = clustering.len(),
        mentions = clustering.mention_count(),
        "parsed linking"
    );
    Ok(clustering)
}

// ---------------------------------------------------------------------------
// IdentityMap
// ---------------------------------------------------------------------------

/// Inverse of a [`Clustering`]: mention -> kb-id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    index: BTreeMap<Mention, KbId>,
}

impl IdentityMap {
    /// Fails if a mention sits in more than one cluster.
    pub fn from_clustering(origin: &str, clustering: &Clustering) -> ScoreResult<Self> {
        let mut index = BTreeMap::new();
        for (kb_id, mentions) in clustering.iter() {
            for mention in mentions {
                if let Some(first) = index.insert(mention.clone(), kb_id.clone()) {
                    return Err(ScoreError::AmbiguousMention {
                        origin: origin.to_string(),
                        mention: mention.clone(),
                        first,
                        second: kb_id.clone(),
                    });
                }
            }
        }
        Ok(Self { index })
    }

    pub fn get(&self, mention: &Mention) -> Option<&KbId> {
        self.index.get(mention)
    }

    pub fn kb_id(&self, mention: &Mention) -> ScoreResult<&KbId> {
        self.get(mention)
            .ok_or_else(|| ScoreError::UnknownMention(mention.clone()))
    }

    pub fn contains(&self, mention: &Mention) -> bool {
        self.index.contains_key(mention)
    }

    /// Mentions in ascending order.
    pub fn mentions(&self) -> impl Iterator<Item = &Mention> {
        self.index.keys()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Linking
// ---------------------------------------------------------------------------

/// One gold standard or one system output, ready for scoring.
#[derive(Debug, Clone)]
pub struct Linking {
    name: String,
    clustering: Clustering,
    index: IdentityMap,
}

impl Linking {
    pub fn parse(name: impl Into<String>, text: &str, options: ParseOptions) -> ScoreResult<Self> {
        let name = name.into();
        let clustering = parse_clustering(&name, text, options)?;
        Self::from_clustering(name, clustering)
    }

    pub fn from_clustering(name: impl Into<String>, clustering: Clustering) -> ScoreResult<Self> {
        let name = name.into();
        let index = IdentityMap::from_clustering(&name, &clustering)?;
        Ok(Self {
            name,
            clustering,
            index,
        })
    }

    /// Rename, e.g. from the full path used in parse errors to a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clustering(&self) -> &Clustering {
        &self.clustering
    }

    pub fn index(&self) -> &IdentityMap {
        &self.index
    }

    pub fn mention_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention_set(ids: &[&str]) -> BTreeSet<Mention> {
        ids.iter().map(|m| Mention::new(m)).collect()
    }

    #[test]
    fn test_parse_groups_by_kb_id() {
        let text = "d1 KB007\nD2\tkb007\n  d3   NIL001  \n";
        let clustering = parse_clustering("gold", text, ParseOptions::default()).unwrap();

        assert_eq!(clustering.len(), 2);
        assert_eq!(clustering.mention_count(), 3);
        assert_eq!(
            clustering.get(&KbId::new("KB007")),
            Some(&mention_set(&["D1", "D2"]))
        );
        assert_eq!(clustering.get(&KbId::new("NIL001")), Some(&mention_set(&["D3"])));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\nd1 KB1\n   \nd2 KB2\n";
        let clustering = parse_clustering("gold", text, ParseOptions::default()).unwrap();
        assert_eq!(clustering.mention_count(), 2);
    }

    #[test]
    fn test_blank_lines_keep_line_numbers() {
        // A skipped line still counts towards the position of later errors.
        let text = "d1 KB1\n\t \n\nd2\n";
        let err = parse_clustering("sys.tab", text, ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ScoreError::MalformedLine { line: 4, .. }));
    }

    #[test]
    fn test_parse_rejects_single_token() {
        let text = "d1 KB1\nd2\n";
        let err = parse_clustering("sys.tab", text, ParseOptions::default()).unwrap_err();
        match err {
            ScoreError::MalformedLine { origin, line, content } => {
                assert_eq!(origin, "sys.tab");
                assert_eq!(line, 2);
                assert_eq!(content, "d2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_extra_columns() {
        let text = "d1 KB1 0.93\n";
        let strict = parse_clustering("sys", text, ParseOptions::default());
        assert!(matches!(strict, Err(ScoreError::MalformedLine { line: 1, .. })));

        let lenient = ParseOptions {
            allow_extra_columns: true,
            ..ParseOptions::default()
        };
        let clustering = parse_clustering("sys", text, lenient).unwrap();
        assert_eq!(clustering.get(&KbId::new("KB1")), Some(&mention_set(&["D1"])));
    }

    #[test]
    fn test_parse_lint_does_not_change_result() {
        let text = "d1 NILX\nd2 NIL002\n";
        let linted = ParseOptions {
            lint_nil_format: true,
            ..ParseOptions::default()
        };
        let a = parse_clustering("sys", text, linted).unwrap();
        let b = parse_clustering("sys", text, ParseOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_record_is_idempotent() {
        let text = "d1 KB1\nd1 kb1\n";
        let linking = Linking::parse("sys", text, ParseOptions::default()).unwrap();
        assert_eq!(linking.mention_count(), 1);
        assert_eq!(linking.clustering().mention_count(), 1);
    }

    #[test]
    fn test_identity_map_inverts_clustering() {
        let clustering: Clustering = [("D1", "KB007"), ("D2", "KB007"), ("D3", "NIL001")]
            .into_iter()
            .collect();
        let index = IdentityMap::from_clustering("gold", &clustering).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(&Mention::new("D1")), Some(&KbId::new("KB007")));
        assert_eq!(index.get(&Mention::new("D3")), Some(&KbId::new("NIL001")));
        assert!(index.get(&Mention::new("D4")).is_none());
        assert!(matches!(
            index.kb_id(&Mention::new("D4")),
            Err(ScoreError::UnknownMention(_))
        ));
    }

    #[test]
    fn test_identity_map_rejects_ambiguous_mention() {
        let err = Linking::parse("sys.tab", "d1 KB1\nd1 KB2\n", ParseOptions::default()).unwrap_err();
        match err {
            ScoreError::AmbiguousMention {
                origin,
                mention,
                first,
                second,
            } => {
                assert_eq!(origin, "sys.tab");
                assert_eq!(mention, Mention::new("D1"));
                assert_eq!(first, KbId::new("KB1"));
                assert_eq!(second, KbId::new("KB2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_with_name() {
        let linking = Linking::parse("/tmp/out/run1", "d1 KB1", ParseOptions::default())
            .unwrap()
            .with_name("run1");
        assert_eq!(linking.name(), "run1");
    }
}
