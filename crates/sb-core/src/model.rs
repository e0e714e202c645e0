//! Canvas element tree.
//!
//! The tree is an arena: a `StableDiGraph` whose nodes are [`ElementNode`]
//! records and whose edges go parent → child. Child order is not taken from
//! the graph; each node keeps an ordered list of [`Segment`]s interleaving
//! literal text with child element ids, and that list is the source of truth
//! for both content and child order. Parents are looked up through the
//! single incoming containment edge.

use crate::catalog::ElementType;
use crate::error::{EditError, EditResult};
use crate::id::{IdAllocator, NodeId};
use crate::property::{Properties, PropertyName};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::Dfs;
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Nodes ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The implicit canvas root: no template, no parent, always a container.
    Canvas,
    Element(ElementType),
}

/// One piece of a node's content, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text (may hold inline markup such as a list's `<li>` items).
    Text(String),
    /// A nested element node.
    Element(NodeId),
}

pub type Segments = SmallVec<[Segment; 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub segments: Segments,
    pub properties: Properties,
}

impl ElementNode {
    fn canvas() -> Self {
        Self {
            id: NodeId::CANVAS,
            kind: NodeKind::Canvas,
            segments: SmallVec::new(),
            properties: Properties::default(),
        }
    }

    fn new(id: NodeId, element: ElementType) -> Self {
        let mut segments = SmallVec::new();
        let default_content = element.template().default_content;
        if !default_content.is_empty() {
            segments.push(Segment::Text(default_content.to_string()));
        }
        Self {
            id,
            kind: NodeKind::Element(element),
            segments,
            properties: Properties::default(),
        }
    }

    pub fn element(&self) -> Option<ElementType> {
        match self.kind {
            NodeKind::Canvas => None,
            NodeKind::Element(ty) => Some(ty),
        }
    }

    pub fn can_contain(&self) -> bool {
        match self.kind {
            NodeKind::Canvas => true,
            NodeKind::Element(ty) => ty.can_contain(),
        }
    }

    /// Child element ids in order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Element(id) => Some(*id),
            Segment::Text(_) => None,
        })
    }

    /// Concatenated literal text, ignoring child elements.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Text(t) => Some(t.as_str()),
                Segment::Element(_) => None,
            })
            .collect()
    }
}

// ─── Edit results ────────────────────────────────────────────────────────

/// Where an insert landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: NodeId,
    pub parent: NodeId,
    /// The requested target could not hold children and the node went
    /// somewhere else instead. Informational, not a failure.
    pub redirected: bool,
}

/// A removed subtree, detached with enough context to put it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedSubtree {
    pub parent: NodeId,
    /// Index into the parent's segment list.
    pub position: usize,
    pub root: NodeId,
    nodes: Vec<ElementNode>,
}

impl DetachedSubtree {
    /// Every removed id, subtree root included.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A field-level change. `before`/`after` are what history needs to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Property {
        id: NodeId,
        name: PropertyName,
        before: Option<String>,
        after: Option<String>,
    },
    Content {
        id: NodeId,
        before: Segments,
        after: Segments,
    },
}

impl Edit {
    pub fn target(&self) -> NodeId {
        match self {
            Self::Property { id, .. } | Self::Content { id, .. } => *id,
        }
    }

    pub fn is_noop(&self) -> bool {
        match self {
            Self::Property { before, after, .. } => before == after,
            Self::Content { before, after, .. } => before == after,
        }
    }
}

/// Flattened view of one node, used to compare whole-tree states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub id: NodeId,
    pub parent: NodeId,
    pub depth: usize,
    pub element: ElementType,
    pub segments: Segments,
    pub properties: Properties,
}

// ─── Tree ────────────────────────────────────────────────────────────────

/// The live canvas document.
#[derive(Debug, Clone)]
pub struct CanvasTree {
    /// The underlying containment graph.
    pub graph: StableDiGraph<ElementNode, ()>,
    /// The canvas root index.
    pub root: NodeIndex,
    id_index: HashMap<NodeId, NodeIndex>,
    ids: IdAllocator,
}

impl Default for CanvasTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasTree {
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(ElementNode::canvas());
        let mut id_index = HashMap::new();
        id_index.insert(NodeId::CANVAS, root);
        Self {
            graph,
            root,
            id_index,
            ids: IdAllocator::default(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Number of element nodes (the canvas root is not counted).
    pub fn len(&self) -> usize {
        self.graph.node_count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&ElementNode> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        let idx = self.index_of(id)?;
        self.graph.node_weight_mut(idx)
    }

    /// Look up an element node; the canvas root does not count.
    fn element(&self, id: NodeId) -> EditResult<&ElementNode> {
        match self.get(id) {
            Some(node) if node.element().is_some() => Ok(node),
            _ => Err(EditError::NodeNotFound(id)),
        }
    }

    pub fn element_type(&self, id: NodeId) -> Option<ElementType> {
        self.get(id).and_then(ElementNode::element)
    }

    /// Parent of `id`: `Some(NodeId::CANVAS)` for top-level nodes, `None`
    /// for the root and for unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.index_of(id)?;
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
            .map(|pidx| self.graph[pidx].id)
    }

    /// Child ids of `id` in insertion order (empty for unknown ids).
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|n| n.children().collect())
            .unwrap_or_default()
    }

    /// Top-level elements, in insertion order.
    pub fn top_level(&self) -> Vec<NodeId> {
        self.children(NodeId::CANVAS)
    }

    /// Walk upward from `candidate` (inclusive) to the nearest node that can
    /// hold children. `None` means the canvas root is the container, which
    /// is also the answer for unknown candidates.
    pub fn resolve_container_ancestor(&self, candidate: NodeId) -> Option<NodeId> {
        let mut current = candidate;
        loop {
            let node = self.get(current)?;
            match node.kind {
                NodeKind::Canvas => return None,
                NodeKind::Element(ty) if ty.can_contain() => return Some(current),
                NodeKind::Element(_) => current = self.parent(current)?,
            }
        }
    }

    /// Every node below `id`, depth-first pre-order, in child order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Depth-first pre-order listing of every element.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut out = Vec::with_capacity(self.len());
        self.outline_into(NodeId::CANVAS, 0, &mut out);
        out
    }

    fn outline_into(&self, parent: NodeId, depth: usize, out: &mut Vec<OutlineEntry>) {
        for child in self.children(parent) {
            let Some(node) = self.get(child) else {
                continue;
            };
            let Some(element) = node.element() else {
                continue;
            };
            out.push(OutlineEntry {
                id: child,
                parent,
                depth,
                element,
                segments: node.segments.clone(),
                properties: node.properties.clone(),
            });
            self.outline_into(child, depth + 1, out);
        }
    }

    /// Style declarations for the live canvas preview of `id`.
    pub fn preview_declarations(&self, id: NodeId) -> EditResult<Vec<String>> {
        Ok(self.element(id)?.properties.declarations())
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Append a new `element` as the last child of `target`. Falls back to
    /// the canvas root when `target` is absent, unknown, or cannot contain.
    pub fn insert(&mut self, element: ElementType, target: Option<NodeId>) -> Placement {
        let (parent, redirected) = match target {
            Some(t) if self.get(t).is_some_and(ElementNode::can_contain) => (t, false),
            Some(_) => (NodeId::CANVAS, true),
            None => (NodeId::CANVAS, false),
        };
        let id = self.ids.next_id();
        let parent_idx = self.index_of(parent).unwrap_or(self.root);
        let idx = self.graph.add_node(ElementNode::new(id, element));
        self.graph.add_edge(parent_idx, idx, ());
        self.id_index.insert(id, idx);
        self.graph[parent_idx].segments.push(Segment::Element(id));
        log::debug!("inserted {element} {id} into {parent}");
        Placement {
            id,
            parent,
            redirected,
        }
    }

    /// Detach and discard the subtree rooted at `id`.
    pub fn remove(&mut self, id: NodeId) -> EditResult<DetachedSubtree> {
        self.element(id)?;
        let idx = self.index_of(id).ok_or(EditError::NodeNotFound(id))?;
        let parent = self.parent(id).ok_or(EditError::NodeNotFound(id))?;
        let parent_idx = self.index_of(parent).ok_or(EditError::NodeNotFound(parent))?;
        let position = self.graph[parent_idx]
            .segments
            .iter()
            .position(|s| *s == Segment::Element(id))
            .ok_or(EditError::NodeNotFound(id))?;

        let mut doomed = Vec::new();
        let mut dfs = Dfs::new(&self.graph, idx);
        while let Some(nx) = dfs.next(&self.graph) {
            doomed.push(nx);
        }

        self.graph[parent_idx].segments.remove(position);
        let mut nodes = Vec::with_capacity(doomed.len());
        for nx in doomed {
            if let Some(node) = self.graph.remove_node(nx) {
                self.id_index.remove(&node.id);
                nodes.push(node);
            }
        }
        log::debug!("removed {id} ({} nodes) from {parent}", nodes.len());
        Ok(DetachedSubtree {
            parent,
            position,
            root: id,
            nodes,
        })
    }

    /// Reattach a subtree produced by [`remove`](Self::remove) at its
    /// original position, with its original ids. Used to reverse removals.
    pub fn restore(&mut self, subtree: DetachedSubtree) -> EditResult<()> {
        let parent_idx = self
            .index_of(subtree.parent)
            .ok_or(EditError::NodeNotFound(subtree.parent))?;

        let mut added = Vec::with_capacity(subtree.nodes.len());
        for node in subtree.nodes {
            let id = node.id;
            let idx = self.graph.add_node(node);
            self.id_index.insert(id, idx);
            added.push(idx);
        }
        for &idx in &added {
            let children: Vec<NodeId> = self.graph[idx].children().collect();
            for child in children {
                if let Some(cidx) = self.index_of(child) {
                    self.graph.add_edge(idx, cidx, ());
                }
            }
        }

        let root_idx = self
            .index_of(subtree.root)
            .ok_or(EditError::NodeNotFound(subtree.root))?;
        self.graph.add_edge(parent_idx, root_idx, ());
        let segments = &mut self.graph[parent_idx].segments;
        let position = subtree.position.min(segments.len());
        segments.insert(position, Segment::Element(subtree.root));
        log::debug!("restored {} into {}", subtree.root, subtree.parent);
        Ok(())
    }

    // ─── Properties & content ────────────────────────────────────────────

    /// Validate and store a property value; an empty value clears it.
    /// `content` is routed to [`set_content`](Self::set_content).
    pub fn set_property(&mut self, id: NodeId, name: PropertyName, value: &str) -> EditResult<Edit> {
        if name == PropertyName::Content {
            return self.set_content(id, value);
        }
        self.element(id)?;
        name.validate(value)?;
        let after = (!value.is_empty()).then(|| value.to_string());
        let before = self.write_property(id, name, after.clone())?;
        Ok(Edit::Property {
            id,
            name,
            before,
            after,
        })
    }

    /// Raw property write without validation, returning the previous value.
    pub fn write_property(
        &mut self,
        id: NodeId,
        name: PropertyName,
        value: Option<String>,
    ) -> EditResult<Option<String>> {
        self.element(id)?;
        let node = self.get_mut(id).ok_or(EditError::NodeNotFound(id))?;
        Ok(node.properties.put(name, value))
    }

    /// Replace the node's literal text. The new text takes the place of the
    /// first existing text segment (or goes first when there is none); other
    /// text segments are dropped and child elements keep their order.
    pub fn set_content(&mut self, id: NodeId, text: &str) -> EditResult<Edit> {
        let node = self.element(id)?;
        let before = node.segments.clone();

        let mut after = Segments::new();
        let mut placed = text.is_empty();
        for segment in &before {
            match segment {
                Segment::Text(_) if !placed => {
                    after.push(Segment::Text(text.to_string()));
                    placed = true;
                }
                Segment::Text(_) => {}
                Segment::Element(child) => after.push(Segment::Element(*child)),
            }
        }
        if !placed {
            after.insert(0, Segment::Text(text.to_string()));
        }

        self.replace_segments(id, after.clone())?;
        Ok(Edit::Content { id, before, after })
    }

    /// Swap in a previously captured segment list. The child elements it
    /// names must be the ones currently attached.
    pub fn replace_segments(&mut self, id: NodeId, segments: Segments) -> EditResult<()> {
        self.element(id)?;
        let node = self.get_mut(id).ok_or(EditError::NodeNotFound(id))?;
        node.segments = segments;
        Ok(())
    }
}
