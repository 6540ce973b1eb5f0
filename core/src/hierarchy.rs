//! Resolution of human-readable topic paths such as `"Engineering/Services/App 1"`.
//!
//! # Design
//! The topic tree is never materialized as linked objects. `TopicIndex` groups
//! a flat topic list by parent identifier once, and the walk looks up each
//! level's siblings in that index. Names match case-insensitively; the first
//! match in list order wins when siblings share a name.
//!
//! As soon as one level is missing, the remaining segments are created as a
//! straight chain under the last match. Deeper segments are not searched for
//! after a miss. Creation is not atomic: topics created before a failing
//! create stay in place.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::types::Topic;

/// Flat topic list grouped by parent identifier, preserving list order.
#[derive(Debug)]
pub struct TopicIndex<'a> {
    roots: Vec<&'a Topic>,
    children: HashMap<&'a str, Vec<&'a Topic>>,
}

impl<'a> TopicIndex<'a> {
    pub fn new(topics: &'a [Topic]) -> Self {
        let mut roots = Vec::new();
        let mut children: HashMap<&'a str, Vec<&'a Topic>> = HashMap::new();
        for topic in topics {
            match topic.parent_id() {
                None => roots.push(topic),
                Some(parent) => children.entry(parent).or_default().push(topic),
            }
        }
        Self { roots, children }
    }

    /// Direct children of `parent`, or the top-level topics for `None`.
    pub fn children_of(&self, parent: Option<&str>) -> &[&'a Topic] {
        match parent {
            None => &self.roots,
            Some(id) => self.children.get(id).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// First child of `parent` whose name equals `name`, ignoring case.
    pub fn find(&self, parent: Option<&str>, name: &str) -> Option<&'a Topic> {
        let wanted = name.to_lowercase();
        self.children_of(parent)
            .iter()
            .copied()
            .find(|topic| topic.name.to_lowercase() == wanted)
    }
}

/// A validated, non-empty sequence of topic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyPath<'p> {
    segments: Vec<&'p str>,
}

impl<'p> HierarchyPath<'p> {
    /// Split `path` on `separator`.
    ///
    /// An empty path, an empty separator, or any blank segment (as in
    /// `"a//b"` or a trailing separator) is rejected. Segment text is kept
    /// verbatim.
    pub fn parse(path: &'p str, separator: &str) -> Result<Self, ApiError> {
        if separator.is_empty() {
            return Err(ApiError::InvalidArgument(
                "topic path separator is empty".to_string(),
            ));
        }
        if path.trim().is_empty() {
            return Err(ApiError::InvalidArgument("topic path is empty".to_string()));
        }
        let segments: Vec<&str> = path.split(separator).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(ApiError::InvalidArgument(format!(
                "topic path {path:?} has an empty segment"
            )));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[&'p str] {
        &self.segments
    }

    /// Walk `topics` level by level and return the leaf's identifier.
    ///
    /// `create(name, parent_id)` is called for each missing level, in order,
    /// and must return the created topic. Its first error aborts the walk.
    pub fn resolve<F>(&self, topics: &[Topic], mut create: F) -> Result<String, ApiError>
    where
        F: FnMut(&str, Option<&str>) -> Result<Topic, ApiError>,
    {
        let index = TopicIndex::new(topics);
        let mut parent: Option<&str> = None;
        let mut remaining = self.segments.iter().copied();

        while let Some(segment) = remaining.next() {
            match index.find(parent, segment) {
                Some(topic) => parent = Some(topic.id.as_str()),
                None => {
                    let mut id = create(segment, parent)?.id;
                    for segment in remaining {
                        id = create(segment, Some(id.as_str()))?.id;
                    }
                    return Ok(id);
                }
            }
        }

        parent
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidArgument("topic path is empty".to_string()))
    }
}
