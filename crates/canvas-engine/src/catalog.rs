//! Compiled-in port catalog
//!
//! One [`NodeDefinition`] per [`NodeKind`]: its ordered input and output
//! ports, palette label and description, category and default size.
//! The catalog is fixed; [`crate::registry::NodeRegistry`] is the query
//! surface over it.

use serde::Serialize;

use crate::types::{NodeKind, PortType};

/// Category of a node kind for palette grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Input,
    Processing,
    Output,
    Utility,
}

/// A declared port of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDefinition {
    /// Handle id used by edges
    pub id: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Data type tag
    pub port_type: PortType,
    /// Whether the node expects this input to be connected
    pub required: bool,
}

impl PortDefinition {
    /// A required port
    pub const fn required(id: &'static str, label: &'static str, port_type: PortType) -> Self {
        Self {
            id,
            label,
            port_type,
            required: true,
        }
    }

    /// An optional port
    pub const fn optional(id: &'static str, label: &'static str, port_type: PortType) -> Self {
        Self {
            id,
            label,
            port_type,
            required: false,
        }
    }
}

/// A family of numbered output handles (`variant-0`, `variant-1`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedPorts {
    pub prefix: &'static str,
    pub label: &'static str,
    pub port_type: PortType,
    /// Exclusive upper bound on the index
    pub max: usize,
}

impl IndexedPorts {
    /// Parse the index out of a handle belonging to this family
    pub fn index_of(&self, handle: &str) -> Option<usize> {
        let digits = handle.strip_prefix(self.prefix)?;
        // Reject "+1", "01" and friends so each index has exactly one handle
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
        {
            return None;
        }
        digits.parse::<usize>().ok().filter(|i| *i < self.max)
    }

    fn port(&self) -> PortDefinition {
        PortDefinition::optional(self.prefix, self.label, self.port_type)
    }
}

/// Static description of a node kind
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub kind: NodeKind,
    pub label: &'static str,
    pub description: &'static str,
    pub category: NodeCategory,
    pub inputs: &'static [PortDefinition],
    pub outputs: &'static [PortDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexed_outputs: Option<IndexedPorts>,
    /// Default rendered size (width, height)
    pub size: (f64, f64),
}

impl NodeDefinition {
    /// Look up an input port by handle
    pub fn input_port(&self, handle: &str) -> Option<PortDefinition> {
        self.inputs.iter().find(|p| p.id == handle).copied()
    }

    /// Look up an output port by handle, including indexed handles
    pub fn output_port(&self, handle: &str) -> Option<PortDefinition> {
        self.outputs
            .iter()
            .find(|p| p.id == handle)
            .copied()
            .or_else(|| {
                self.indexed_outputs
                    .filter(|family| family.index_of(handle).is_some())
                    .map(|family| family.port())
            })
    }

    /// Required inputs in declaration order
    pub fn required_inputs(&self) -> impl Iterator<Item = &PortDefinition> {
        self.inputs.iter().filter(|p| p.required)
    }
}

const NODE_SIZE: (f64, f64) = (320.0, 200.0);

static TEXT: NodeDefinition = NodeDefinition {
    kind: NodeKind::Text,
    label: "Text Prompt",
    description: "Enter text prompts for image generation",
    category: NodeCategory::Input,
    inputs: &[PortDefinition::optional("text", "Text", PortType::Text)],
    outputs: &[PortDefinition::optional("text", "Text", PortType::Text)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static IMAGE: NodeDefinition = NodeDefinition {
    kind: NodeKind::Image,
    label: "Image Generator",
    description: "Generate images from prompts",
    category: NodeCategory::Processing,
    inputs: &[
        PortDefinition::optional("prompt", "Prompt", PortType::Text),
        PortDefinition::optional("baseImage", "Base Image", PortType::Image),
        PortDefinition::optional("style", "Style", PortType::Style),
        PortDefinition::optional("material", "Material", PortType::Material),
    ],
    outputs: &[PortDefinition::optional("image", "Image", PortType::Image)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static IMAGE_INPUT: NodeDefinition = NodeDefinition {
    kind: NodeKind::ImageInput,
    label: "Image Input",
    description: "Upload base image for image-to-image generation",
    category: NodeCategory::Input,
    inputs: &[],
    outputs: &[PortDefinition::optional("image", "Image", PortType::Image)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static STYLE: NodeDefinition = NodeDefinition {
    kind: NodeKind::Style,
    label: "Style Settings",
    description: "Configure rendering style and camera settings",
    category: NodeCategory::Utility,
    inputs: &[],
    outputs: &[PortDefinition::optional("style", "Style", PortType::Style)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static STYLE_REFERENCE: NodeDefinition = NodeDefinition {
    kind: NodeKind::StyleReference,
    label: "Style Reference",
    description: "Extract style from uploaded image",
    category: NodeCategory::Utility,
    inputs: &[],
    outputs: &[PortDefinition::optional("style", "Style", PortType::Style)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static MATERIAL: NodeDefinition = NodeDefinition {
    kind: NodeKind::Material,
    label: "Material Settings",
    description: "Configure material properties",
    category: NodeCategory::Utility,
    inputs: &[],
    outputs: &[PortDefinition::optional("materials", "Materials", PortType::Material)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static VARIANTS: NodeDefinition = NodeDefinition {
    kind: NodeKind::Variants,
    label: "Variants",
    description: "Generate multiple variations of an image",
    category: NodeCategory::Processing,
    inputs: &[
        PortDefinition::required("sourceImage", "Source Image", PortType::Image),
        PortDefinition::optional("style", "Style", PortType::Style),
        PortDefinition::optional("materials", "Materials", PortType::Material),
    ],
    outputs: &[PortDefinition::optional("variants", "Variants", PortType::Variants)],
    indexed_outputs: Some(IndexedPorts {
        prefix: "variant-",
        label: "Variant",
        port_type: PortType::Variants,
        max: 16,
    }),
    size: NODE_SIZE,
};

static OUTPUT: NodeDefinition = NodeDefinition {
    kind: NodeKind::Output,
    label: "Output",
    description: "Final output node for images and variants. Can output image for iterative workflows.",
    category: NodeCategory::Output,
    inputs: &[
        PortDefinition::optional("image", "Image", PortType::Image),
        PortDefinition::optional("variants", "Variants", PortType::Variants),
    ],
    outputs: &[PortDefinition::optional("image", "Image", PortType::Image)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static PROMPT_BUILDER: NodeDefinition = NodeDefinition {
    kind: NodeKind::PromptBuilder,
    label: "Prompt Builder",
    description: "AI-powered prompt generator using dropdowns",
    category: NodeCategory::Input,
    inputs: &[],
    outputs: &[PortDefinition::optional("prompt", "Generated Prompt", PortType::Text)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

static VIDEO: NodeDefinition = NodeDefinition {
    kind: NodeKind::Video,
    label: "Video Generator",
    description: "Generate videos from text or animate images",
    category: NodeCategory::Processing,
    inputs: &[
        PortDefinition::optional("prompt", "Prompt", PortType::Text),
        PortDefinition::optional("baseImage", "Base Image", PortType::Image),
    ],
    outputs: &[PortDefinition::optional("video", "Video", PortType::Image)],
    indexed_outputs: None,
    size: NODE_SIZE,
};

/// The definition of a node kind
pub fn definition(kind: NodeKind) -> &'static NodeDefinition {
    match kind {
        NodeKind::Text => &TEXT,
        NodeKind::Image => &IMAGE,
        NodeKind::ImageInput => &IMAGE_INPUT,
        NodeKind::Style => &STYLE,
        NodeKind::StyleReference => &STYLE_REFERENCE,
        NodeKind::Material => &MATERIAL,
        NodeKind::Variants => &VARIANTS,
        NodeKind::Output => &OUTPUT,
        NodeKind::PromptBuilder => &PROMPT_BUILDER,
        NodeKind::Video => &VIDEO,
    }
}
