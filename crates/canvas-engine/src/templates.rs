//! Compiled-in workflow templates
//!
//! A template is a list of node kinds plus index-based connections between
//! them. [`crate::factory::NodeFactory::create_nodes_from_template`] turns
//! one into concrete nodes and edges.

use serde::{Deserialize, Serialize};

use crate::types::NodeKind;
use crate::types::NodeKind::*;

/// Direction a batch of nodes is laid out in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateLayout {
    #[default]
    Horizontal,
    Vertical,
}

/// One connection between template nodes, by node index and handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLink {
    pub from: (usize, &'static str),
    pub to: (usize, &'static str),
}

const fn link(from: usize, from_handle: &'static str, to: usize, to_handle: &'static str) -> TemplateLink {
    TemplateLink {
        from: (from, from_handle),
        to: (to, to_handle),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NodeTemplate {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub nodes: &'static [NodeKind],
    pub connections: &'static [TemplateLink],
    pub layout: TemplateLayout,
}

static TEMPLATES: &[NodeTemplate] = &[
    NodeTemplate {
        name: "basic",
        label: "Basic Workflow",
        description: "Simple text to image generation",
        nodes: &[Text, Image, Output],
        connections: &[link(0, "text", 1, "prompt"), link(1, "image", 2, "image")],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "styled",
        label: "Styled Generation",
        description: "Text to image with style settings",
        nodes: &[Text, Style, Image, Output],
        connections: &[
            link(0, "text", 2, "prompt"),
            link(1, "style", 2, "style"),
            link(2, "image", 3, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "variants",
        label: "Variants Workflow",
        description: "Generate image and create variants",
        nodes: &[Text, Image, Variants, Output],
        connections: &[
            link(0, "text", 1, "prompt"),
            link(1, "image", 2, "sourceImage"),
            link(2, "variants", 3, "variants"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "complete",
        label: "Complete Workflow",
        description: "Full workflow with all settings and variants",
        nodes: &[Text, Style, Material, Image, Variants, Output],
        connections: &[
            link(0, "text", 3, "prompt"),
            link(1, "style", 3, "style"),
            link(2, "materials", 3, "material"),
            link(3, "image", 4, "sourceImage"),
            link(4, "variants", 5, "variants"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "image-to-image",
        label: "Image-to-Image",
        description: "Modify an existing image with text guidance",
        nodes: &[ImageInput, Text, Image, Output],
        connections: &[
            link(0, "image", 2, "baseImage"),
            link(1, "text", 2, "prompt"),
            link(2, "image", 3, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "image-to-image-styled",
        label: "Image-to-Image with Style",
        description: "Iterative editing with style guidance",
        nodes: &[ImageInput, Text, Style, Image, Output],
        connections: &[
            link(0, "image", 3, "baseImage"),
            link(1, "text", 3, "prompt"),
            link(2, "style", 3, "style"),
            link(3, "image", 4, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "text-to-video",
        label: "Text-to-Video",
        description: "Generate video from text prompt",
        nodes: &[Text, Video, Output],
        connections: &[link(0, "text", 1, "prompt"), link(1, "video", 2, "image")],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "image-to-video",
        label: "Image-to-Video",
        description: "Animate an uploaded image into video",
        nodes: &[ImageInput, Text, Video, Output],
        connections: &[
            link(0, "image", 2, "baseImage"),
            link(1, "text", 2, "prompt"),
            link(2, "video", 3, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "image-to-video-animated",
        label: "Image to Video (Animated)",
        description: "Generate image first, then animate it into video",
        nodes: &[Text, Image, Video, Output],
        connections: &[
            link(0, "text", 1, "prompt"),
            link(1, "image", 2, "baseImage"),
            link(2, "video", 3, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "style-reference",
        label: "Style Reference",
        description: "Extract style from reference image and apply to new generation",
        nodes: &[StyleReference, Text, Image, Output],
        connections: &[
            link(0, "style", 2, "style"),
            link(1, "text", 2, "prompt"),
            link(2, "image", 3, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "prompt-builder",
        label: "AI Prompt Builder",
        description: "Use AI to generate prompts, then create images",
        nodes: &[PromptBuilder, Image, Output],
        connections: &[link(0, "prompt", 1, "prompt"), link(1, "image", 2, "image")],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "prompt-builder-styled",
        label: "AI Prompt Builder with Style",
        description: "AI-generated prompts with style settings",
        nodes: &[PromptBuilder, Style, Image, Output],
        connections: &[
            link(0, "prompt", 2, "prompt"),
            link(1, "style", 2, "style"),
            link(2, "image", 3, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "prompt-builder-editable",
        label: "AI Prompt Builder (Editable)",
        description: "Generate a prompt, refine it as text, then create images",
        nodes: &[PromptBuilder, Text, Image, Output],
        connections: &[
            link(0, "prompt", 1, "text"),
            link(1, "text", 2, "prompt"),
            link(2, "image", 3, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "architectural",
        label: "Architectural Visualization",
        description: "Complete pipeline for architectural rendering with variants",
        nodes: &[Text, Style, Material, Image, Variants, Output],
        connections: &[
            link(0, "text", 3, "prompt"),
            link(1, "style", 3, "style"),
            link(2, "materials", 3, "material"),
            link(3, "image", 4, "sourceImage"),
            link(4, "variants", 5, "variants"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "interior",
        label: "Interior Design",
        description: "Interior design visualization workflow",
        nodes: &[Text, Style, Image, Variants, Output],
        connections: &[
            link(0, "text", 2, "prompt"),
            link(1, "style", 2, "style"),
            link(2, "image", 3, "sourceImage"),
            link(3, "variants", 4, "variants"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "exterior",
        label: "Exterior Architecture",
        description: "Exterior architectural rendering workflow",
        nodes: &[Text, Style, Material, Image, Output],
        connections: &[
            link(0, "text", 3, "prompt"),
            link(1, "style", 3, "style"),
            link(2, "materials", 3, "material"),
            link(3, "image", 4, "image"),
        ],
        layout: TemplateLayout::Horizontal,
    },
    NodeTemplate {
        name: "product",
        label: "Product Visualization",
        description: "Product rendering and visualization with variants",
        nodes: &[Text, Style, Image, Variants, Output],
        connections: &[
            link(0, "text", 2, "prompt"),
            link(1, "style", 2, "style"),
            link(2, "image", 3, "sourceImage"),
            link(3, "variants", 4, "variants"),
        ],
        layout: TemplateLayout::Horizontal,
    },
];

/// Look up a template by name
pub fn template(name: &str) -> Option<&'static NodeTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// All templates in palette order
pub fn all_templates() -> &'static [NodeTemplate] {
    TEMPLATES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_names_unique() {
        let mut names: Vec<_> = all_templates().iter().map(|t| t.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 17);
    }

    #[test]
    fn test_links_in_range() {
        for t in all_templates() {
            for l in t.connections {
                assert!(l.from.0 < t.nodes.len(), "{}: bad source index", t.name);
                assert!(l.to.0 < t.nodes.len(), "{}: bad target index", t.name);
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(template("basic").unwrap().nodes, &[Text, Image, Output]);
        assert!(template("missing").is_none());
    }
}
