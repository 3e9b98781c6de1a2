//! # Catalog Module
//!
//! The catalog indexes [`Record`]s by title in an AVL tree. Every node owns its
//! children through `Option<Box<Node>>`, so rotations are plain moves of boxes
//! and the tree frees itself when dropped.
//!
//! ## Invariants
//!
//! After every insert, for every node:
//!
//! - all titles in `left` sort before the node's title, all titles in `right`
//!   sort after it (byte-wise `str` ordering, no case folding);
//! - `height = 1 + max(height(left), height(right))`, with an empty link at 0;
//! - `height(left) - height(right)` is one of -1, 0 or 1.
//!
//! Inserting a title that is already present is a no-op: the first record
//! wins and the tree shape is untouched.
//!
//! ## Example
//!
//! ```
//! use songbook::catalog::Catalog;
//!
//! let mut catalog = Catalog::new();
//! for title in ["Zephyr", "Aurora", "Mosaic", "Echo"] {
//!     catalog.insert_track(title, "Artist", "Album", "Genre", 3.0)?;
//! }
//!
//! assert_eq!(catalog.root_title(), Some("Mosaic"));
//! assert!(catalog.search("Echo").is_some());
//! assert!(catalog.search("Nocturne").is_none());
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::record::Record;
use anyhow::Result;
use log::{debug, trace};
use std::cmp::Ordering;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    record: Record,
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(record: Record) -> Box<Self> {
        Box::new(Self {
            record,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn title(&self) -> &str {
        self.record.title()
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Right rotation around `y`.
///
/// ```text
///       y            x
///      / \          / \
///     x   C  ->    A   y
///    / \              / \
///   A   T2           T2  C
/// ```
fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    trace!("Rotating right: `{}' over `{}'.", x.title(), y.title());

    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Left rotation around `x`, the mirror image of [`rotate_right`].
fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    trace!("Rotating left: `{}' over `{}'.", y.title(), x.title());

    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Recursive insert. Returns the new local root and whether `record` was
/// stored (`false` means `key` was already present).
fn insert_node(link: Link, key: &str, record: Record) -> (Box<Node>, bool) {
    let Some(mut node) = link else {
        return (Node::leaf(record), true);
    };

    let inserted = match key.cmp(node.title()) {
        Ordering::Less => {
            let (left, inserted) = insert_node(node.left.take(), key, record);
            node.left = Some(left);
            inserted
        }
        Ordering::Greater => {
            let (right, inserted) = insert_node(node.right.take(), key, record);
            node.right = Some(right);
            inserted
        }
        Ordering::Equal => false,
    };

    if !inserted {
        return (node, false);
    }

    node.update_height();
    (rebalance(node, key), true)
}

/// Restore the balance of `node` after `key` was inserted below it.
fn rebalance(mut node: Box<Node>, key: &str) -> Box<Node> {
    let balance = node.balance();

    if balance > 1 {
        match node.left.as_ref().map(|left| key.cmp(left.title())) {
            // left-left
            Some(Ordering::Less) => return rotate_right(node),
            // left-right
            Some(Ordering::Greater) => {
                node.left = node.left.take().map(rotate_left);
                return rotate_right(node);
            }
            _ => {}
        }
    }

    if balance < -1 {
        match node.right.as_ref().map(|right| key.cmp(right.title())) {
            // right-right
            Some(Ordering::Greater) => return rotate_left(node),
            // right-left
            Some(Ordering::Less) => {
                node.right = node.right.take().map(rotate_right);
                return rotate_left(node);
            }
            _ => {}
        }
    }

    node
}

/// Height-balanced index of records keyed by title.
#[derive(Debug, Default)]
pub struct Catalog {
    root: Link,
    len: usize,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` unless its title is already cataloged.
    ///
    /// Returns `true` if the record was stored, `false` if an existing record
    /// with the same title was kept instead.
    pub fn insert(&mut self, record: Record) -> bool {
        let key = record.title().to_owned();
        let (root, inserted) = insert_node(self.root.take(), &key, record);
        self.root = Some(root);

        if inserted {
            self.len += 1;
        } else {
            debug!("Ignoring duplicate title `{key}'.");
        }
        inserted
    }

    /// Build a [`Record`] from its fields and insert it.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not form a valid record (see
    /// [`Record::new`]); the catalog is left untouched in that case.
    pub fn insert_track(
        &mut self,
        title: &str,
        artist: &str,
        album: &str,
        genre: &str,
        duration: f64,
    ) -> Result<bool> {
        let record = Record::new(title, artist, album, genre, duration)?;
        Ok(self.insert(record))
    }

    /// Insert every record, in whatever order they arrive.
    /// Returns how many of them were new titles.
    pub fn bulk_load<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        records
            .into_iter()
            .map(|record| self.insert(record))
            .filter(|&inserted| inserted)
            .count()
    }

    /// Exact-match lookup by title.
    #[must_use]
    pub fn search(&self, title: &str) -> Option<&Record> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match title.cmp(node.title()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.record),
            }
        }
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 0 when empty.
    #[must_use]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    #[must_use]
    pub fn root_title(&self) -> Option<&str> {
        self.root.as_deref().map(Node::title)
    }

    /// Records in ascending title order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height() as usize),
            remaining: self.len,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Titles in ascending order.
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(Record::title)
    }

    /// Walk the whole tree and verify ordering, height bookkeeping and
    /// balance at every node.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first node found to break an invariant.
    pub fn check_invariants(&self) -> Result<()> {
        let count = check_subtree(self.root.as_deref(), None, None)?.1;
        if count != self.len {
            anyhow::bail!("catalog reports {} records but the tree holds {count}", self.len);
        }
        Ok(())
    }

    /// Pre-order `(title, height)` pairs, used to compare tree shapes.
    #[cfg(test)]
    fn shape(&self) -> Vec<(String, u32)> {
        fn walk(link: Option<&Node>, out: &mut Vec<(String, u32)>) {
            if let Some(node) = link {
                out.push((node.title().to_owned(), node.height));
                walk(node.left.as_deref(), out);
                walk(node.right.as_deref(), out);
            }
        }
        let mut out = Vec::new();
        walk(self.root.as_deref(), &mut out);
        out
    }
}

/// Returns `(height, node count)` of a valid subtree whose titles must lie
/// strictly between `lower` and `upper`.
fn check_subtree(
    link: Option<&Node>,
    lower: Option<&str>,
    upper: Option<&str>,
) -> Result<(u32, usize)> {
    let Some(node) = link else {
        return Ok((0, 0));
    };
    let title = node.title();

    if lower.is_some_and(|lower| title <= lower) || upper.is_some_and(|upper| title >= upper) {
        anyhow::bail!("`{title}' is out of order (bounds {lower:?}..{upper:?})");
    }

    let (left_height, left_count) = check_subtree(node.left.as_deref(), lower, Some(title))?;
    let (right_height, right_count) = check_subtree(node.right.as_deref(), Some(title), upper)?;

    let expected = 1 + left_height.max(right_height);
    if node.height != expected {
        anyhow::bail!("`{title}' stores height {} but its subtree is {expected} high", node.height);
    }
    if left_height.abs_diff(right_height) > 1 {
        anyhow::bail!("`{title}' is unbalanced: left {left_height}, right {right_height}");
    }

    Ok((expected, left_count + right_count + 1))
}

/// In-order iterator over a [`Catalog`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Record> for Catalog {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, records: I) {
        self.bulk_load(records);
    }
}

impl FromIterator<Record> for Catalog {
    fn from_iter<I: IntoIterator<Item = Record>>(records: I) -> Self {
        let mut catalog = Self::new();
        catalog.bulk_load(records);
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn record(title: &str) -> Record {
        Record::new(title, "Artist", "Album", "Genre", 3.5).unwrap()
    }

    fn catalog_of(titles: &[&str]) -> Catalog {
        titles.iter().map(|title| record(title)).collect()
    }

    fn node(title: &str, height: u32) -> (String, u32) {
        (title.to_string(), height)
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.height(), 0);
        assert_eq!(catalog.root_title(), None);
        assert_eq!(catalog.iter().next(), None);
        assert!(catalog.search("").is_none());
        assert!(catalog.check_invariants().is_ok());
    }

    #[test]
    fn test_rotation_scenario_ends_with_mosaic_root() {
        let catalog = catalog_of(&["Zephyr", "Aurora", "Mosaic", "Echo"]);

        assert_eq!(catalog.root_title(), Some("Mosaic"));
        assert_eq!(catalog.height(), 3);
        assert_eq!(
            catalog.shape(),
            vec![node("Mosaic", 3), node("Aurora", 2), node("Echo", 1), node("Zephyr", 1)]
        );
        catalog.check_invariants().unwrap();
    }

    #[test]
    fn test_search_after_scenario() {
        let catalog = catalog_of(&["Zephyr", "Aurora", "Mosaic", "Echo"]);
        assert_eq!(catalog.search("Echo").map(Record::title), Some("Echo"));
        assert!(catalog.search("Nocturne").is_none());
    }

    #[test]
    fn test_left_left_case() {
        let catalog = catalog_of(&["C", "B", "A"]);
        assert_eq!(catalog.shape(), vec![node("B", 2), node("A", 1), node("C", 1)]);
    }

    #[test]
    fn test_right_right_case() {
        let catalog = catalog_of(&["A", "B", "C"]);
        assert_eq!(catalog.shape(), vec![node("B", 2), node("A", 1), node("C", 1)]);
    }

    #[test]
    fn test_left_right_case() {
        let catalog = catalog_of(&["C", "A", "B"]);
        assert_eq!(catalog.shape(), vec![node("B", 2), node("A", 1), node("C", 1)]);
    }

    #[test]
    fn test_right_left_case() {
        let catalog = catalog_of(&["A", "C", "B"]);
        assert_eq!(catalog.shape(), vec![node("B", 2), node("A", 1), node("C", 1)]);
    }

    #[test]
    fn test_duplicate_insert_keeps_first_record_and_shape() {
        let mut catalog = catalog_of(&["Zephyr", "Aurora", "Mosaic", "Echo"]);
        let shape_before = catalog.shape();

        let inserted = catalog
            .insert_track("Echo", "Someone Else", "Other", "Noise", 9.0)
            .unwrap();

        assert!(!inserted);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.shape(), shape_before);
        let echo = catalog.search("Echo").unwrap();
        assert_eq!(echo.artist(), "Artist");
        assert_eq!(echo.duration(), 3.5);
    }

    #[test]
    fn test_invalid_track_is_not_inserted() {
        let mut catalog = Catalog::new();
        assert!(catalog.insert_track("Bad", "A", "B", "C", f64::NAN).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_titles_compare_byte_exactly() {
        let catalog = catalog_of(&["echo", "Echo", "Echo ", ""]);
        assert_eq!(catalog.len(), 4);
        assert!(catalog.search("ECHO").is_none());
        assert!(catalog.search(" Echo").is_none());
        assert_eq!(catalog.search("").map(Record::title), Some(""));
        assert_eq!(catalog.titles().collect::<Vec<_>>(), vec!["", "Echo", "Echo ", "echo"]);
    }

    #[test]
    fn test_invariants_hold_after_every_insert() {
        let mut titles: Vec<String> = (0..500).map(|i| format!("Track {i:03}")).collect();
        titles.shuffle(&mut StdRng::seed_from_u64(7));

        let mut catalog = Catalog::new();
        for (count, title) in titles.iter().enumerate() {
            assert!(catalog.insert(record(title)));
            catalog.check_invariants().unwrap();
            assert_eq!(catalog.len(), count + 1);
        }

        // 1.44 * log2(501) is a little under 13.
        assert!(catalog.height() <= 12, "height {}", catalog.height());
    }

    #[test]
    fn test_sorted_input_stays_logarithmic() {
        let catalog: Catalog = (0..1024).map(|i| record(&format!("{i:05}"))).collect();
        catalog.check_invariants().unwrap();
        assert_eq!(catalog.height(), 11);
    }

    #[test]
    fn test_in_order_iteration_is_strictly_increasing() {
        let catalog = catalog_of(&["m", "c", "x", "a", "e", "z", "b", "d", "y", "w"]);
        let titles: Vec<&str> = catalog.titles().collect();
        assert!(titles.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(catalog.iter().len(), 10);
    }

    #[test]
    fn test_bulk_load_counts_new_titles() {
        let mut catalog = Catalog::new();
        let added = catalog.bulk_load(["B", "A", "B", "C", "A"].into_iter().map(record));
        assert_eq!(added, 3);
        assert_eq!(catalog.len(), 3);

        catalog.extend([record("D"), record("C")]);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_check_invariants_detects_bad_height() {
        let mut catalog = catalog_of(&["A", "B", "C"]);
        if let Some(root) = catalog.root.as_mut() {
            root.height = 5;
        }
        assert!(catalog.check_invariants().is_err());
    }
}
