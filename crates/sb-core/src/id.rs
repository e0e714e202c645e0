use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A lightweight identifier for element nodes on the canvas.
///
/// Ids are handed out by the owning [`CanvasTree`](crate::model::CanvasTree)
/// from a per-session counter: monotonically increasing, never reused after
/// deletion. Rendered as `el-N`, the same shape the host UI uses in its
/// `data-id` attributes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// The implicit canvas root. Never allocated to an element.
    pub const CANVAS: NodeId = NodeId(0);

    pub const fn from_raw(raw: u64) -> Self {
        NodeId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_canvas(self) -> bool {
        self.0 == 0
    }

    /// Parse the `el-N` form (or `canvas` for the root).
    pub fn parse(s: &str) -> Option<Self> {
        if s == "canvas" {
            return Some(Self::CANVAS);
        }
        let n: u64 = s.strip_prefix("el-")?.parse().ok()?;
        (n != 0).then_some(NodeId(n))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{self}")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_canvas() {
            f.write_str("canvas")
        } else {
            write!(f, "el-{}", self.0)
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NodeId::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid node id `{s}`")))
    }
}

/// Session-scoped id counter. Starts at 1; 0 is the canvas.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_ids_are_monotonic() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(a.to_string(), "el-1");
        assert_eq!(b.to_string(), "el-2");
    }

    #[test]
    fn parse_accepts_display_form() {
        assert_eq!(NodeId::parse("el-42"), Some(NodeId::from_raw(42)));
        assert_eq!(NodeId::parse("canvas"), Some(NodeId::CANVAS));
        assert_eq!(NodeId::parse("el-0"), None);
        assert_eq!(NodeId::parse("42"), None);
        assert_eq!(NodeId::parse("el-x"), None);
    }
}
