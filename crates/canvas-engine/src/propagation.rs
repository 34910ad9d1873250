//! Cross-node data propagation
//!
//! Nodes with incoming edges carry *derived* payload fields: an image
//! generator's prompt comes from the text node feeding it, its style from a
//! style node, and so on. [`propagate`] recomputes those fields for a graph
//! snapshot from a static rule table.
//!
//! The pass is pure. It visits nodes in topological order so a chain such as
//! `prompt-builder -> text -> image` settles in one call, and repeats until
//! nothing changes. A rule only writes when the derived value differs, which
//! makes the pass idempotent and lets callers detect "nothing to do" without
//! allocating.
//!
//! When several edges feed the same input, the first edge in edge order
//! whose source kind the rule accepts wins. Derived fields are never
//! cleared: removing an edge leaves the last derived value in place, and a
//! source with nothing to offer (empty prompt, no output yet, inline `data:`
//! URL) leaves the target untouched.

use std::borrow::Cow;

use crate::catalog;
use crate::index::GraphIndex;
use crate::payload::{is_resolved_reference, NodeData, OutputStatus};
use crate::plan;
use crate::types::{CanvasEdge, CanvasNode, NodeId, NodeKind};

/// Copies derived data from `source` into `target`; true if `target` changed
type ApplyFn = fn(source: &NodeData, source_handle: &str, target: &mut NodeData) -> bool;

/// One row of the rule table
struct DerivationRule {
    /// Target kinds this rule applies to
    targets: &'static [NodeKind],
    /// Input handle on the target
    port: &'static str,
    /// Source kinds whose data the rule knows how to read
    sources: &'static [NodeKind],
    apply: ApplyFn,
}

static RULES: &[DerivationRule] = &[
    DerivationRule {
        targets: &[NodeKind::Image, NodeKind::Video],
        port: "prompt",
        sources: &[NodeKind::Text, NodeKind::PromptBuilder],
        apply: derive_prompt,
    },
    DerivationRule {
        targets: &[NodeKind::Image, NodeKind::Variants],
        port: "style",
        sources: &[NodeKind::Style, NodeKind::StyleReference],
        apply: derive_style,
    },
    DerivationRule {
        targets: &[NodeKind::Image],
        port: "material",
        sources: &[NodeKind::Material],
        apply: derive_materials,
    },
    DerivationRule {
        targets: &[NodeKind::Variants],
        port: "materials",
        sources: &[NodeKind::Material],
        apply: derive_materials,
    },
    DerivationRule {
        targets: &[NodeKind::Image, NodeKind::Video],
        port: "baseImage",
        sources: &[NodeKind::ImageInput, NodeKind::Image, NodeKind::Output],
        apply: derive_base_image,
    },
    DerivationRule {
        targets: &[NodeKind::Variants],
        port: "sourceImage",
        sources: &[NodeKind::Image, NodeKind::ImageInput, NodeKind::Output],
        apply: derive_source_image,
    },
    DerivationRule {
        targets: &[NodeKind::Output],
        port: "image",
        sources: &[
            NodeKind::Image,
            NodeKind::Video,
            NodeKind::Output,
            NodeKind::ImageInput,
        ],
        apply: derive_output_image,
    },
    DerivationRule {
        targets: &[NodeKind::Output],
        port: "variants",
        sources: &[NodeKind::Variants],
        apply: derive_output_variant,
    },
    DerivationRule {
        targets: &[NodeKind::Text],
        port: "text",
        sources: &[NodeKind::PromptBuilder],
        apply: derive_text,
    },
];

/// Result of a propagation pass
#[derive(Debug)]
pub struct Propagation<'a> {
    /// The input slice if nothing changed, otherwise the updated copy
    pub nodes: Cow<'a, [CanvasNode]>,
    /// Ids of nodes whose payload changed, in first-change order
    pub changed: Vec<NodeId>,
}

impl Propagation<'_> {
    /// Whether the pass left every node as it was
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn into_nodes(self) -> Vec<CanvasNode> {
        self.nodes.into_owned()
    }
}

/// Recompute derived fields for every node with incoming edges
pub fn propagate<'a>(nodes: &'a [CanvasNode], edges: &[CanvasEdge]) -> Propagation<'a> {
    let (order, cyclic) = plan::topological_indices(nodes, edges);
    if cyclic {
        log::warn!("Propagating over a cyclic graph; results may not settle");
    }

    let index = GraphIndex::build(nodes, edges);

    let mut working: Option<Vec<CanvasNode>> = None;
    let mut changed: Vec<NodeId> = Vec::new();

    // Each round settles at least one more level of any chain
    for _ in 0..=nodes.len() {
        let mut dirty = false;

        for &target in &order {
            let current: &[CanvasNode] = working.as_deref().unwrap_or(nodes);
            let Some(data) = derive_node(current, target, &index) else {
                continue;
            };

            let updated = working.get_or_insert_with(|| nodes.to_vec());
            let node = &mut updated[target];
            node.data = data;
            if !changed.contains(&node.id) {
                changed.push(node.id.clone());
            }
            dirty = true;
        }

        if !dirty {
            break;
        }
    }

    if !changed.is_empty() {
        log::debug!("Propagated derived data into {} node(s)", changed.len());
    }

    Propagation {
        nodes: working.map_or(Cow::Borrowed(nodes), Cow::Owned),
        changed,
    }
}

/// Apply every rule to one node; `Some` only if its payload changed
fn derive_node(
    nodes: &[CanvasNode],
    target: usize,
    index: &GraphIndex<'_>,
) -> Option<NodeData> {
    let node = &nodes[target];
    let kind = node.kind();
    let mut data: Option<NodeData> = None;

    for rule in RULES.iter().filter(|r| r.targets.contains(&kind)) {
        let winner = index
            .edges_by_target(&node.id)
            .iter()
            .filter(|e| e.target_handle == rule.port)
            .find_map(|e| {
                let source = &nodes[index.position_of(&e.source)?];
                rule.sources.contains(&source.kind()).then_some((source, e))
            });

        let Some((source, edge)) = winner else {
            continue;
        };

        let mut candidate = data.take().unwrap_or_else(|| node.data.clone());
        let wrote = (rule.apply)(&source.data, &edge.source_handle, &mut candidate);
        if wrote || candidate != node.data {
            data = Some(candidate);
        }
    }

    data.filter(|d| *d != node.data)
}

fn assign_str(slot: &mut String, value: &str) -> bool {
    if slot.as_str() == value {
        return false;
    }
    value.clone_into(slot);
    true
}

fn assign_url(slot: &mut Option<String>, value: &str) -> bool {
    if slot.as_deref() == Some(value) {
        return false;
    }
    *slot = Some(value.to_string());
    true
}

fn assign_clone<T: Clone + PartialEq>(slot: &mut Option<T>, value: &T) -> bool {
    if slot.as_ref() == Some(value) {
        return false;
    }
    *slot = Some(value.clone());
    true
}

/// Resolved image reference a node offers on its image-typed output
fn resolved_image_url(source: &NodeData) -> Option<&str> {
    let url = match source {
        NodeData::ImageInput(d) => d.image_url.as_deref(),
        NodeData::Image(d) => d.output_url.as_deref(),
        NodeData::Video(d) => d.output_url.as_deref(),
        NodeData::Output(d) => d.image_url.as_deref().or(d.variant_url.as_deref()),
        _ => None,
    }?;
    is_resolved_reference(url).then_some(url)
}

fn derive_prompt(source: &NodeData, _: &str, target: &mut NodeData) -> bool {
    let text = match source {
        NodeData::Text(d) => d.text.as_str(),
        NodeData::PromptBuilder(d) => d.generated_prompt.as_str(),
        _ => return false,
    };
    if text.trim().is_empty() {
        return false;
    }

    match target {
        NodeData::Image(d) => assign_str(&mut d.prompt, text),
        NodeData::Video(d) => assign_str(&mut d.prompt, text),
        _ => false,
    }
}

fn derive_style(source: &NodeData, _: &str, target: &mut NodeData) -> bool {
    let style = match source {
        NodeData::Style(settings) => settings,
        NodeData::StyleReference(d) => match &d.extracted_style {
            Some(extracted) => extracted,
            None => return false,
        },
        _ => return false,
    };

    match target {
        NodeData::Image(d) => assign_clone(&mut d.style_settings, style),
        NodeData::Variants(d) => assign_clone(&mut d.style_settings, style),
        _ => false,
    }
}

fn derive_materials(source: &NodeData, _: &str, target: &mut NodeData) -> bool {
    let NodeData::Material(materials) = source else {
        return false;
    };

    match target {
        NodeData::Image(d) => assign_clone(&mut d.material_settings, materials),
        NodeData::Variants(d) => assign_clone(&mut d.material_settings, materials),
        _ => false,
    }
}

fn derive_base_image(source: &NodeData, _: &str, target: &mut NodeData) -> bool {
    let Some(url) = resolved_image_url(source) else {
        return false;
    };

    match target {
        NodeData::Image(d) => assign_url(&mut d.base_image_url, url),
        NodeData::Video(d) => assign_url(&mut d.base_image_url, url),
        _ => false,
    }
}

fn derive_source_image(source: &NodeData, _: &str, target: &mut NodeData) -> bool {
    let (Some(url), NodeData::Variants(d)) = (resolved_image_url(source), target) else {
        return false;
    };
    assign_url(&mut d.source_image_url, url)
}

fn derive_output_image(source: &NodeData, _: &str, target: &mut NodeData) -> bool {
    let (Some(url), NodeData::Output(d)) = (resolved_image_url(source), target) else {
        return false;
    };

    let mut wrote = assign_url(&mut d.image_url, url);
    if d.status != OutputStatus::Ready {
        d.status = OutputStatus::Ready;
        wrote = true;
    }
    wrote
}

fn derive_output_variant(source: &NodeData, source_handle: &str, target: &mut NodeData) -> bool {
    let (NodeData::Variants(variants), NodeData::Output(d)) = (source, target) else {
        return false;
    };

    let indexed = catalog::definition(NodeKind::Variants)
        .indexed_outputs
        .and_then(|family| family.index_of(source_handle));
    let variant = match indexed {
        Some(index) => variants.variants.get(index),
        None => variants.selected_variant(),
    };
    let Some(variant) = variant.filter(|v| is_resolved_reference(&v.url)) else {
        return false;
    };

    let mut wrote = assign_url(&mut d.variant_url, &variant.url);
    wrote |= assign_url(&mut d.variant_id, &variant.id);
    if d.status != OutputStatus::Ready {
        d.status = OutputStatus::Ready;
        wrote = true;
    }
    wrote
}

fn derive_text(source: &NodeData, _: &str, target: &mut NodeData) -> bool {
    let (NodeData::PromptBuilder(builder), NodeData::Text(d)) = (source, target) else {
        return false;
    };
    let prompt = builder.generated_prompt.as_str();
    if prompt.trim().is_empty() || d.synced_prompt.as_deref() == Some(prompt) {
        return false;
    }
    let wrote = assign_str(&mut d.text, prompt);
    assign_url(&mut d.synced_prompt, prompt) || wrote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{
        ImageInputData, MaterialData, MaterialEntry, PromptBuilderData, StyleSettings, TextData,
        Variant, VariantsData,
    };
    use crate::types::{Connection, Position};

    fn text_node(id: &str, text: &str) -> CanvasNode {
        CanvasNode::new(
            id,
            Position::default(),
            NodeData::Text(TextData {
                text: text.to_string(),
                placeholder: None,
                synced_prompt: None,
            }),
        )
    }

    fn node(id: &str, kind: NodeKind) -> CanvasNode {
        CanvasNode::with_defaults(id, kind, Position::default())
    }

    fn edge(id: &str, source: &str, sh: &str, target: &str, th: &str) -> CanvasEdge {
        CanvasEdge::from_connection(id, Connection::new(source, sh, target, th))
    }

    fn find<'a>(nodes: &'a [CanvasNode], id: &str) -> &'a NodeData {
        &nodes.iter().find(|n| n.id == id).unwrap().data
    }

    #[test]
    fn test_rules_target_declared_compatible_ports() {
        for rule in RULES {
            for &target in rule.targets {
                let input = catalog::definition(target)
                    .input_port(rule.port)
                    .unwrap_or_else(|| panic!("{} has no input {}", target, rule.port));
                for &source in rule.sources {
                    let def = catalog::definition(source);
                    assert!(
                        def.outputs
                            .iter()
                            .any(|o| o.port_type.is_compatible_with(&input.port_type)),
                        "{} cannot feed {}.{}",
                        source,
                        target,
                        rule.port
                    );
                }
            }
        }
    }

    #[test]
    fn test_text_feeds_image_prompt() {
        let nodes = vec![text_node("n1", "a red chair"), node("n2", NodeKind::Image)];
        let edges = vec![edge("e1", "n1", "text", "n2", "prompt")];

        let result = propagate(&nodes, &edges);
        assert_eq!(result.changed, vec!["n2"]);
        match find(&result.nodes, "n2") {
            NodeData::Image(d) => assert_eq!(d.prompt, "a red chair"),
            other => panic!("Expected image payload, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_keeps_prompt() {
        let mut image = node("n2", NodeKind::Image);
        if let NodeData::Image(d) = &mut image.data {
            d.prompt = "kept".to_string();
        }
        let nodes = vec![text_node("n1", "   "), image];
        let edges = vec![edge("e1", "n1", "text", "n2", "prompt")];

        let result = propagate(&nodes, &edges);
        assert!(result.is_unchanged());
        assert!(matches!(result.nodes, Cow::Borrowed(_)));
    }

    #[test]
    fn test_chain_settles_in_one_call() {
        let builder = CanvasNode::new(
            "pb",
            Position::default(),
            NodeData::PromptBuilder(PromptBuilderData {
                generated_prompt: "modern loft at dusk".to_string(),
                ..PromptBuilderData::default()
            }),
        );
        // Listed downstream-first so node order alone would not settle the chain
        let nodes = vec![node("img", NodeKind::Image), text_node("txt", ""), builder];
        let edges = vec![
            edge("e2", "txt", "text", "img", "prompt"),
            edge("e1", "pb", "prompt", "txt", "text"),
        ];

        let result = propagate(&nodes, &edges);
        match find(&result.nodes, "img") {
            NodeData::Image(d) => assert_eq!(d.prompt, "modern loft at dusk"),
            other => panic!("Expected image payload, got {:?}", other),
        }
        assert_eq!(result.changed.len(), 2);

        let again = propagate(&result.nodes, &edges);
        assert!(again.is_unchanged());
    }

    #[test]
    fn test_first_edge_wins() {
        let nodes = vec![
            text_node("a", "first"),
            text_node("b", "second"),
            node("img", NodeKind::Image),
        ];
        let edges = vec![
            edge("e1", "a", "text", "img", "prompt"),
            edge("e2", "b", "text", "img", "prompt"),
        ];

        let result = propagate(&nodes, &edges);
        match find(&result.nodes, "img") {
            NodeData::Image(d) => assert_eq!(d.prompt, "first"),
            other => panic!("Expected image payload, got {:?}", other),
        }
    }

    #[test]
    fn test_style_and_materials() {
        let materials = MaterialData {
            materials: vec![MaterialEntry {
                id: "m1".to_string(),
                name: "Floor".to_string(),
                surface: "floor".to_string(),
                material: "oak".to_string(),
                ..MaterialEntry::default()
            }],
        };
        let nodes = vec![
            node("s", NodeKind::Style),
            CanvasNode::new("m", Position::default(), NodeData::Material(materials.clone())),
            node("img", NodeKind::Image),
            node("var", NodeKind::Variants),
        ];
        let edges = vec![
            edge("e1", "s", "style", "img", "style"),
            edge("e2", "m", "materials", "img", "material"),
            edge("e3", "m", "materials", "var", "materials"),
        ];

        let result = propagate(&nodes, &edges);
        match find(&result.nodes, "img") {
            NodeData::Image(d) => {
                assert_eq!(d.style_settings, Some(StyleSettings::default()));
                assert_eq!(d.material_settings.as_ref(), Some(&materials));
            }
            other => panic!("Expected image payload, got {:?}", other),
        }
        match find(&result.nodes, "var") {
            NodeData::Variants(d) => assert_eq!(d.material_settings.as_ref(), Some(&materials)),
            other => panic!("Expected variants payload, got {:?}", other),
        }
    }

    #[test]
    fn test_style_reference_without_extraction_is_unresolved() {
        let nodes = vec![node("r", NodeKind::StyleReference), node("img", NodeKind::Image)];
        let edges = vec![edge("e1", "r", "style", "img", "style")];
        assert!(propagate(&nodes, &edges).is_unchanged());
    }

    #[test]
    fn test_inline_data_urls_never_propagate() {
        let upload = CanvasNode::new(
            "up",
            Position::default(),
            NodeData::ImageInput(ImageInputData {
                image_url: Some("data:image/png;base64,AAAA".to_string()),
                image_data: Some("AAAA".to_string()),
                ..ImageInputData::default()
            }),
        );
        let nodes = vec![upload, node("img", NodeKind::Image)];
        let edges = vec![edge("e1", "up", "image", "img", "baseImage")];
        assert!(propagate(&nodes, &edges).is_unchanged());
    }

    #[test]
    fn test_image_output_feeds_variants_and_output() {
        let mut image = node("img", NodeKind::Image);
        if let NodeData::Image(d) = &mut image.data {
            d.output_url = Some("https://cdn.example.com/render.png".to_string());
        }
        let nodes = vec![image, node("var", NodeKind::Variants), node("out", NodeKind::Output)];
        let edges = vec![
            edge("e1", "img", "image", "var", "sourceImage"),
            edge("e2", "img", "image", "out", "image"),
        ];

        let result = propagate(&nodes, &edges);
        match find(&result.nodes, "var") {
            NodeData::Variants(d) => assert_eq!(
                d.source_image_url.as_deref(),
                Some("https://cdn.example.com/render.png")
            ),
            other => panic!("Expected variants payload, got {:?}", other),
        }
        match find(&result.nodes, "out") {
            NodeData::Output(d) => {
                assert_eq!(d.status, OutputStatus::Ready);
                assert_eq!(d.image_url.as_deref(), Some("https://cdn.example.com/render.png"));
            }
            other => panic!("Expected output payload, got {:?}", other),
        }
    }

    #[test]
    fn test_output_picks_indexed_or_selected_variant() {
        let variants = VariantsData {
            variants: (0..3)
                .map(|i| Variant {
                    id: format!("v{}", i),
                    url: format!("https://cdn.example.com/v{}.png", i),
                    ..Variant::default()
                })
                .collect(),
            selected_variant_id: Some("v1".to_string()),
            ..VariantsData::default()
        };
        let nodes = vec![
            CanvasNode::new("var", Position::default(), NodeData::Variants(variants)),
            node("sel", NodeKind::Output),
            node("idx", NodeKind::Output),
        ];
        let edges = vec![
            edge("e1", "var", "variants", "sel", "variants"),
            edge("e2", "var", "variant-2", "idx", "variants"),
        ];

        let result = propagate(&nodes, &edges);
        match find(&result.nodes, "sel") {
            NodeData::Output(d) => assert_eq!(d.variant_id.as_deref(), Some("v1")),
            other => panic!("Expected output payload, got {:?}", other),
        }
        match find(&result.nodes, "idx") {
            NodeData::Output(d) => {
                assert_eq!(d.variant_id.as_deref(), Some("v2"));
                assert_eq!(d.variant_url.as_deref(), Some("https://cdn.example.com/v2.png"));
            }
            other => panic!("Expected output payload, got {:?}", other),
        }
    }

    #[test]
    fn test_text_edit_survives_until_new_prompt() {
        let mut builder = CanvasNode::new(
            "pb",
            Position::default(),
            NodeData::PromptBuilder(PromptBuilderData {
                generated_prompt: "gen".to_string(),
                ..PromptBuilderData::default()
            }),
        );
        let edges = vec![edge("e1", "pb", "prompt", "txt", "text")];

        let mut nodes = propagate(&[builder.clone(), text_node("txt", "")], &edges).into_nodes();
        match find(&nodes, "txt") {
            NodeData::Text(d) => assert_eq!(d.text, "gen"),
            other => panic!("Expected text payload, got {:?}", other),
        }

        if let NodeData::Text(d) = &mut nodes[1].data {
            d.text = "user edit".to_string();
        }
        assert!(propagate(&nodes, &edges).is_unchanged());

        if let NodeData::PromptBuilder(d) = &mut builder.data {
            d.generated_prompt = "second".to_string();
        }
        nodes[0] = builder;
        let result = propagate(&nodes, &edges);
        assert_eq!(result.changed, vec!["txt"]);
        match find(&result.nodes, "txt") {
            NodeData::Text(d) => assert_eq!(d.text, "second"),
            other => panic!("Expected text payload, got {:?}", other),
        }
    }

    #[test]
    fn test_disconnect_keeps_derived_value() {
        let nodes = vec![text_node("n1", "a red chair"), node("n2", NodeKind::Image)];
        let edges = vec![edge("e1", "n1", "text", "n2", "prompt")];
        let connected = propagate(&nodes, &edges).into_nodes();

        let disconnected = propagate(&connected, &[]);
        assert!(disconnected.is_unchanged());
        match find(&disconnected.nodes, "n2") {
            NodeData::Image(d) => assert_eq!(d.prompt, "a red chair"),
            other => panic!("Expected image payload, got {:?}", other),
        }
    }
}
