//! Pattern rendering and step-chain validation.
//!
//! Explicit [`Chain`]s are well formed by construction and render directly.
//! Step-folded [`StepChain`]s are validated first:
//!
//! 1. Shape: nodes at even positions, relationships at odd positions, and
//!    a node at both ends.
//! 2. Relationship flanks: the step entering a relationship and the step
//!    leaving it must have the same direction.
//! 3. Shared nodes (strict mode): the steps on either side of an interior
//!    node must also agree, so a chain cannot silently change direction.
//!
//! Errors carry a sketch of the whole chain with the offending element
//! labelled.

use super::CompilePass;
use crate::ast::pattern::{
    Chain, Direction, HopRange, NodeRef, Pattern, RelRef, StepChain, StepElement,
};
use crate::diag::CompileError;
use log::trace;

impl CompilePass<'_> {
    /// Renders a single pattern.
    pub(crate) fn pattern(&mut self, pattern: &Pattern) -> Result<String, CompileError> {
        match pattern {
            Pattern::Node(node) => self.node(node),
            Pattern::Chain(chain) => self.chain(chain),
            Pattern::Steps(steps) => self.step_chain(steps),
            Pattern::Path { name, pattern } => {
                if let Pattern::Path { name: inner, .. } = pattern.as_ref() {
                    return Err(CompileError::malformed_pattern(format!(
                        "named path `{name}` wraps another named path `{inner}`"
                    )));
                }
                let name = self.ident(name, "path")?;
                Ok(format!("{name} = {}", self.pattern(pattern)?))
            }
        }
    }

    /// Renders a comma-joined pattern list.
    pub(crate) fn pattern_list(&mut self, patterns: &[Pattern]) -> Result<String, CompileError> {
        let parts = patterns
            .iter()
            .map(|pattern| self.pattern(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(", "))
    }

    pub(crate) fn node(&mut self, node: &NodeRef) -> Result<String, CompileError> {
        let mut inner = String::new();
        if let Some(name) = &node.name {
            inner.push_str(&self.ident(name, "variable")?);
        }
        if let Some(label) = &node.label {
            inner.push(':');
            inner.push_str(&self.ident(label, "label")?);
        }
        if !node.properties.is_empty() {
            if !inner.is_empty() {
                inner.push(' ');
            }
            inner.push_str(&self.property_map(&node.properties)?);
        }
        Ok(format!("({inner})"))
    }

    fn rel(&mut self, rel: &RelRef) -> Result<String, CompileError> {
        let mut inner = String::new();
        if let Some(name) = &rel.name {
            inner.push_str(&self.ident(name, "variable")?);
        }
        if let Some(rel_type) = &rel.rel_type {
            inner.push(':');
            inner.push_str(&self.ident(rel_type, "relationship type")?);
        }
        if let Some(hops) = rel.hops {
            inner.push_str(&render_hops(hops)?);
        }
        if !rel.properties.is_empty() {
            if !inner.is_empty() {
                inner.push(' ');
            }
            inner.push_str(&self.property_map(&rel.properties)?);
        }
        Ok(format!("[{inner}]"))
    }

    fn segment(
        &mut self,
        direction: Direction,
        rel: &RelRef,
        node: &NodeRef,
    ) -> Result<String, CompileError> {
        let rel = self.rel(rel)?;
        let node = self.node(node)?;
        Ok(match direction {
            Direction::Forward => format!("-{rel}->{node}"),
            Direction::Backward => format!("<-{rel}-{node}"),
            Direction::Undirected => format!("-{rel}-{node}"),
        })
    }

    fn chain(&mut self, chain: &Chain) -> Result<String, CompileError> {
        let mut text = self.node(&chain.start)?;
        for segment in &chain.segments {
            text.push_str(&self.segment(segment.direction, &segment.rel, &segment.node)?);
        }
        Ok(text)
    }

    fn step_chain(&mut self, steps: &StepChain) -> Result<String, CompileError> {
        validate_step_chain(steps, self.config.strict_step_chains)?;

        let StepElement::Node(start) = &steps.head else {
            return Err(CompileError::malformed_pattern("step chain must start with a node"));
        };
        let mut text = self.node(start)?;
        for pair in steps.steps.chunks(2) {
            match pair {
                [(direction, StepElement::Rel(rel)), (_, StepElement::Node(node))] => {
                    text.push_str(&self.segment(*direction, rel, node)?);
                }
                _ => {
                    return Err(CompileError::malformed_pattern(
                        "step chain must alternate nodes and relationships",
                    ));
                }
            }
        }
        trace!("step chain folded into {text}");
        Ok(text)
    }
}

fn render_hops(hops: HopRange) -> Result<String, CompileError> {
    match hops {
        HopRange::Exact(n) => Ok(format!("*{n}")),
        HopRange::Range { min: None, max: None } => Ok("*".to_string()),
        HopRange::Range { min: Some(min), max: None } => Ok(format!("*{min}..")),
        HopRange::Range { min: None, max: Some(max) } => Ok(format!("*..{max}")),
        HopRange::Range { min: Some(min), max: Some(max) } => {
            if min > max {
                Err(CompileError::malformed_pattern(format!(
                    "hop range *{min}..{max} has a lower bound above its upper bound"
                )))
            } else {
                Ok(format!("*{min}..{max}"))
            }
        }
    }
}

/// Checks shape and direction consistency of a step-folded chain.
pub(crate) fn validate_step_chain(steps: &StepChain, strict: bool) -> Result<(), CompileError> {
    let elements: Vec<&StepElement> = steps.elements().collect();
    let ops: Vec<Direction> = steps.steps.iter().map(|(direction, _)| *direction).collect();

    for (index, element) in elements.iter().enumerate() {
        let expects_node = index % 2 == 0;
        let is_node = matches!(element, StepElement::Node(_));
        if expects_node != is_node {
            let expected = if expects_node { "a node" } else { "a relationship" };
            return Err(CompileError::malformed_pattern(format!(
                "step chain element {index} should be {expected}"
            ))
            .with_sketch(&elements, &ops, index, "out of place")
            .with_help("step chains alternate node, relationship, node, ..."));
        }
    }
    if elements.len() % 2 == 0 {
        let last = elements.len() - 1;
        return Err(CompileError::malformed_pattern("step chain ends with a relationship")
            .with_sketch(&elements, &ops, last, "needs a node after it"));
    }

    for index in (1..elements.len()).step_by(2) {
        let (entering, leaving) = (ops[index - 1], ops[index]);
        if entering != leaving {
            return Err(CompileError::inconsistent_direction(format!(
                "relationship is entered with `{}` but left with `{}`",
                entering.step_symbol(),
                leaving.step_symbol()
            ))
            .with_sketch(&elements, &ops, index, "ambiguous direction"));
        }
    }

    if strict {
        for index in (2..elements.len().saturating_sub(1)).step_by(2) {
            let (entering, leaving) = (ops[index - 1], ops[index]);
            if entering != leaving {
                return Err(CompileError::inconsistent_direction(format!(
                    "direction changes from `{}` to `{}` at shared node",
                    entering.step_symbol(),
                    leaving.step_symbol()
                ))
                .with_sketch(&elements, &ops, index, "shared node")
                .with_help("build the pattern as an explicit Chain to mix directions"));
            }
        }
    }

    Ok(())
}

trait WithSketch {
    fn with_sketch(
        self,
        elements: &[&StepElement],
        ops: &[Direction],
        focus: usize,
        label: &str,
    ) -> Self;
}

impl WithSketch for CompileError {
    fn with_sketch(
        self,
        elements: &[&StepElement],
        ops: &[Direction],
        focus: usize,
        label: &str,
    ) -> Self {
        let mut text = String::new();
        let mut span = 0..0;
        for (index, element) in elements.iter().enumerate() {
            if index > 0 {
                text.push_str(&format!(" {} ", ops[index - 1].step_symbol()));
            }
            let start = text.len();
            text.push_str(&sketch_element(element));
            if index == focus {
                span = start..text.len();
            }
        }
        self.with_fragment(text, span, label)
    }
}

/// Unvalidated short form of an element, used only in diagnostics.
fn sketch_element(element: &StepElement) -> String {
    let (open, close, name, tag, has_props) = match element {
        StepElement::Node(node) => ("(", ")", &node.name, &node.label, !node.properties.is_empty()),
        StepElement::Rel(rel) => ("[", "]", &rel.name, &rel.rel_type, !rel.properties.is_empty()),
    };
    let mut text = String::from(open);
    if let Some(name) = name {
        text.push_str(name);
    }
    if let Some(tag) = tag {
        text.push(':');
        text.push_str(tag);
    }
    if has_props {
        text.push_str(" {..}");
    }
    text.push_str(close);
    text
}
