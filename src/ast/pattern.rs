//! Graph pattern IR: nodes, relationships, chains, and paths.
//!
//! Patterns describe graph shape to match or construct. Two chain forms
//! exist:
//!
//! - [`Chain`] is the explicit form. Every relationship carries its own
//!   direction and the alternating node/relationship shape is guaranteed
//!   by construction, so mixed directions are allowed.
//! - [`StepChain`] is the step-fold form, built by appending elements with
//!   binary step operators (`>>`, `<<`, `--`). Its shape and direction
//!   consistency are checked when the pattern is compiled.
//!
//! # Examples
//!
//! ```text
//! (p:Person)
//! (a:Person)-[:KNOWS]->(b:Person)<-[:WORKS_AT]-(c:Company)
//! (a)-[r:KNOWS*1..3]-(b)
//! path = (a)-[:ROAD*]->(b)
//! ```

use crate::ast::expression::Expression;
use smol_str::SmolStr;

/// Inline property map attached to a node or relationship.
pub type PropertyMap = Vec<(SmolStr, Expression)>;

// ============================================================================
// Nodes and relationships
// ============================================================================

/// A node reference: `(name:Label {props})`.
///
/// Both the binding name and the label are optional. A node with neither
/// renders as `()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeRef {
    /// Binding variable.
    pub name: Option<SmolStr>,
    /// Single node label.
    pub label: Option<SmolStr>,
    /// Inline property constraints or initial values.
    pub properties: PropertyMap,
}

impl NodeRef {
    /// Creates a node with both a binding name and a label.
    pub fn new(name: impl Into<SmolStr>, label: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            label: Some(label.into()),
            properties: Vec::new(),
        }
    }

    /// Creates an anonymous, unlabeled node `()`.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a node with only a binding name.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a node with only a label.
    pub fn labeled(label: impl Into<SmolStr>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Adds an inline property.
    pub fn with_property(mut self, key: impl Into<SmolStr>, value: Expression) -> Self {
        self.properties.push((key.into(), value));
        self
    }

    /// Returns true if the node carries no name, label, or properties.
    pub fn is_bare(&self) -> bool {
        self.name.is_none() && self.label.is_none() && self.properties.is_empty()
    }
}

/// Variable-length hop specification for a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopRange {
    /// Exactly `n` hops: `*n`.
    Exact(u32),
    /// Bounded or unbounded range: `*`, `*min..`, `*..max`, `*min..max`.
    Range { min: Option<u32>, max: Option<u32> },
}

impl HopRange {
    /// Exactly `n` hops.
    pub const fn exact(n: u32) -> Self {
        HopRange::Exact(n)
    }

    /// Between `min` and `max` hops inclusive.
    pub const fn between(min: u32, max: u32) -> Self {
        HopRange::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    /// At least `min` hops.
    pub const fn at_least(min: u32) -> Self {
        HopRange::Range {
            min: Some(min),
            max: None,
        }
    }

    /// At most `max` hops.
    pub const fn at_most(max: u32) -> Self {
        HopRange::Range {
            min: None,
            max: Some(max),
        }
    }

    /// Any number of hops: `*`.
    pub const fn any() -> Self {
        HopRange::Range {
            min: None,
            max: None,
        }
    }
}

/// A relationship reference: `[name:TYPE*hops {props}]`.
///
/// Direction is not stored here; it belongs to the chain position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelRef {
    /// Binding variable.
    pub name: Option<SmolStr>,
    /// Relationship type.
    pub rel_type: Option<SmolStr>,
    /// Variable-length hop range.
    pub hops: Option<HopRange>,
    /// Inline property constraints or initial values.
    pub properties: PropertyMap,
}

impl RelRef {
    /// Creates a relationship with a binding name and a type.
    pub fn new(name: impl Into<SmolStr>, rel_type: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            rel_type: Some(rel_type.into()),
            ..Self::default()
        }
    }

    /// Creates an anonymous typed relationship `[:TYPE]`.
    pub fn typed(rel_type: impl Into<SmolStr>) -> Self {
        Self {
            rel_type: Some(rel_type.into()),
            ..Self::default()
        }
    }

    /// Creates an untyped relationship bound to `name`.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates an anonymous, untyped relationship `[]`.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Sets the hop range.
    pub fn with_hops(mut self, hops: HopRange) -> Self {
        self.hops = Some(hops);
        self
    }

    /// Adds an inline property.
    pub fn with_property(mut self, key: impl Into<SmolStr>, value: Expression) -> Self {
        self.properties.push((key.into(), value));
        self
    }
}

/// Direction of a relationship within a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left to right: `-[r]->`.
    #[default]
    Forward,
    /// Right to left: `<-[r]-`.
    Backward,
    /// Either direction: `-[r]-`.
    Undirected,
}

impl Direction {
    /// Step-operator spelling used in diagnostics.
    pub fn step_symbol(self) -> &'static str {
        match self {
            Direction::Forward => ">>",
            Direction::Backward => "<<",
            Direction::Undirected => "--",
        }
    }
}

// ============================================================================
// Explicit chains
// ============================================================================

/// One `-[rel]->(node)` hop of an explicit chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Direction of the relationship.
    pub direction: Direction,
    /// The relationship.
    pub rel: RelRef,
    /// The node the hop arrives at.
    pub node: NodeRef,
}

/// An explicit chain `(n0)-[r0]-(n1)-[r1]-(n2)...`.
///
/// The element sequence is always odd-length and alternating because each
/// segment contributes exactly one relationship and one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    /// The first node.
    pub start: NodeRef,
    /// Subsequent relationship/node hops.
    pub segments: Vec<Segment>,
}

impl Chain {
    /// Starts a chain at `start`.
    pub fn new(start: NodeRef) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    /// Appends a hop with an explicit direction.
    pub fn hop(mut self, direction: Direction, rel: RelRef, node: NodeRef) -> Self {
        self.segments.push(Segment {
            direction,
            rel,
            node,
        });
        self
    }

    /// Appends `-[rel]->(node)`.
    pub fn forward(self, rel: RelRef, node: NodeRef) -> Self {
        self.hop(Direction::Forward, rel, node)
    }

    /// Appends `<-[rel]-(node)`.
    pub fn backward(self, rel: RelRef, node: NodeRef) -> Self {
        self.hop(Direction::Backward, rel, node)
    }

    /// Appends `-[rel]-(node)`.
    pub fn undirected(self, rel: RelRef, node: NodeRef) -> Self {
        self.hop(Direction::Undirected, rel, node)
    }

    /// Number of elements (nodes plus relationships).
    pub fn element_count(&self) -> usize {
        1 + 2 * self.segments.len()
    }
}

// ============================================================================
// Step-fold chains
// ============================================================================

/// An element appended to a [`StepChain`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepElement {
    /// Node position.
    Node(NodeRef),
    /// Relationship position.
    Rel(RelRef),
}

impl From<NodeRef> for StepElement {
    fn from(node: NodeRef) -> Self {
        StepElement::Node(node)
    }
}

impl From<RelRef> for StepElement {
    fn from(rel: RelRef) -> Self {
        StepElement::Rel(rel)
    }
}

/// A chain built by left-folding binary step operators.
///
/// `Person >> KNOWS >> Person` is written
/// `StepChain::start(person).forward(knows).forward(person)`. Each
/// relationship is flanked by two step operators, which must agree.
#[derive(Debug, Clone, PartialEq)]
pub struct StepChain {
    /// The leftmost element.
    pub head: StepElement,
    /// Each step operator with the element on its right.
    pub steps: Vec<(Direction, StepElement)>,
}

impl StepChain {
    /// Starts a fold at `head`.
    pub fn start(head: impl Into<StepElement>) -> Self {
        Self {
            head: head.into(),
            steps: Vec::new(),
        }
    }

    /// Appends `element` with the given step operator.
    pub fn step(mut self, direction: Direction, element: impl Into<StepElement>) -> Self {
        self.steps.push((direction, element.into()));
        self
    }

    /// Appends with `>>`.
    pub fn forward(self, element: impl Into<StepElement>) -> Self {
        self.step(Direction::Forward, element)
    }

    /// Appends with `<<`.
    pub fn backward(self, element: impl Into<StepElement>) -> Self {
        self.step(Direction::Backward, element)
    }

    /// Appends with `--`.
    pub fn undirected(self, element: impl Into<StepElement>) -> Self {
        self.step(Direction::Undirected, element)
    }

    /// Iterates over all elements, head first.
    pub fn elements(&self) -> impl Iterator<Item = &StepElement> {
        std::iter::once(&self.head).chain(self.steps.iter().map(|(_, element)| element))
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// A top-level pattern as accepted by MATCH, CREATE, MERGE, and friends.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// A single node.
    Node(NodeRef),
    /// An explicit chain.
    Chain(Chain),
    /// A step-fold chain, validated during compilation.
    Steps(StepChain),
    /// A named path: `name = pattern`.
    Path { name: SmolStr, pattern: Box<Pattern> },
}

impl Pattern {
    /// Wraps this pattern in a named path.
    pub fn named_path(self, name: impl Into<SmolStr>) -> Self {
        Pattern::Path {
            name: name.into(),
            pattern: Box::new(self),
        }
    }
}

impl From<NodeRef> for Pattern {
    fn from(node: NodeRef) -> Self {
        Pattern::Node(node)
    }
}

impl From<Chain> for Pattern {
    fn from(chain: Chain) -> Self {
        Pattern::Chain(chain)
    }
}

impl From<StepChain> for Pattern {
    fn from(steps: StepChain) -> Self {
        Pattern::Steps(steps)
    }
}
