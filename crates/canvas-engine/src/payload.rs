//! Kind-specific node payloads
//!
//! Every node kind has exactly one payload struct, and [`NodeData`] is the
//! tagged union over them. Payloads are camelCase on the wire and every
//! field falls back to the kind's default when absent, so documents written
//! by older clients still load.
//!
//! Fields fall in two groups: those the user edits directly, and *derived*
//! fields that [`crate::propagation`] fills from upstream nodes
//! (`styleSettings`, `baseImageUrl`, `sourceImageUrl`, ...).

use serde::{Deserialize, Serialize};

use crate::types::NodeKind;

/// Lifecycle of a generation request as recorded in a payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Completed,
    Error,
}

/// Render quality preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    High,
    Ultra,
}

/// Text prompt node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextData {
    /// Editable prompt text (older documents call it `prompt`)
    #[serde(alias = "prompt")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Last generated prompt copied in from a prompt builder
    ///
    /// `text` is only overwritten when the builder offers something else,
    /// so edits made after a prompt arrives are kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced_prompt: Option<String>,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            text: String::new(),
            placeholder: Some("Enter your prompt...".to_string()),
            synced_prompt: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSettings {
    pub style: String,
    pub quality: Quality,
    pub aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            style: "architectural".to_string(),
            quality: Quality::Standard,
            aspect_ratio: "16:9".to_string(),
            negative_prompt: None,
            seed: None,
        }
    }
}

/// Image generator node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageData {
    pub prompt: String,
    pub settings: ImageSettings,
    /// Derived from a connected style or style-reference node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_settings: Option<StyleSettings>,
    /// Derived from a connected material node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_settings: Option<MaterialData>,
    /// Derived: resolved URL of the image-to-image base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_image_url: Option<String>,
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_id: Option<String>,
}

/// Uploaded image node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageInputData {
    /// Preview URL; may be an inline `data:` URL before upload completes
    pub image_url: Option<String>,
    /// Raw base64 bytes for the generation API. Never propagated.
    pub image_data: Option<String>,
    pub image_type: Option<String>,
    pub image_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraSettings {
    /// 18-200mm
    pub focal_length: f64,
    /// f/1.4 - f/22
    pub f_stop: f64,
    pub position: String,
    pub angle: String,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            focal_length: 35.0,
            f_stop: 5.6,
            position: "eye-level".to_string(),
            angle: "three-quarter".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentSettings {
    pub scene: String,
    pub weather: String,
    pub time_of_day: String,
    pub season: String,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            scene: "exterior".to_string(),
            weather: "sunny".to_string(),
            time_of_day: "afternoon".to_string(),
            season: "summer".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LightingSettings {
    /// 0-100
    pub intensity: f64,
    pub direction: String,
    pub color: String,
    pub shadows: String,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            intensity: 70.0,
            direction: "side".to_string(),
            color: "warm".to_string(),
            shadows: "soft".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtmosphereSettings {
    pub mood: String,
    /// 0-100
    pub contrast: f64,
    /// 0-100
    pub saturation: f64,
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            mood: "professional".to_string(),
            contrast: 50.0,
            saturation: 50.0,
        }
    }
}

/// Style node payload, also the shape of an extracted reference style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSettings {
    pub camera: CameraSettings,
    pub environment: EnvironmentSettings,
    pub lighting: LightingSettings,
    pub atmosphere: AtmosphereSettings,
}

/// Which aspects to pull out of a style reference image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleExtraction {
    pub extract_camera: bool,
    pub extract_lighting: bool,
    pub extract_atmosphere: bool,
    pub extract_environment: bool,
    pub extract_colors: bool,
    pub extract_composition: bool,
}

impl Default for StyleExtraction {
    fn default() -> Self {
        Self {
            extract_camera: true,
            extract_lighting: true,
            extract_atmosphere: true,
            extract_environment: true,
            extract_colors: true,
            extract_composition: true,
        }
    }
}

/// Style reference node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleReferenceData {
    pub image_url: Option<String>,
    /// Raw base64 bytes of the reference. Never propagated.
    pub image_data: Option<String>,
    pub image_type: Option<String>,
    pub image_name: Option<String>,
    pub style_extraction: StyleExtraction,
    /// Style extracted by the analysis service, once available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_style: Option<StyleSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_style_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialEntry {
    pub id: String,
    pub name: String,
    /// Surface the material applies to (wall, floor, furniture, ...)
    #[serde(rename = "type")]
    pub surface: String,
    /// e.g. concrete, wood, glass
    pub material: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
}

impl Default for MaterialEntry {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            surface: "other".to_string(),
            material: String::new(),
            color: None,
            texture: None,
            finish: None,
        }
    }
}

/// Material node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialData {
    pub materials: Vec<MaterialEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantType {
    MultiAngle,
    DesignOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantSettings {
    pub variation_strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub quality: Quality,
}

impl Default for VariantSettings {
    fn default() -> Self {
        Self {
            variation_strength: 0.5,
            style: None,
            quality: Quality::Standard,
        }
    }
}

/// A single generated variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub url: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub settings: serde_json::Value,
    pub render_id: String,
}

/// Variant generator node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantsData {
    /// Derived: resolved URL of the image to vary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_type: Option<VariantType>,
    pub settings: VariantSettings,
    /// Derived from a connected style or style-reference node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_settings: Option<StyleSettings>,
    /// Derived from a connected material node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_settings: Option<MaterialData>,
    pub status: GenerationStatus,
    pub variants: Vec<Variant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Default for VariantsData {
    fn default() -> Self {
        Self {
            source_image_url: None,
            prompt: None,
            count: 4,
            variant_type: None,
            settings: VariantSettings::default(),
            style_settings: None,
            material_settings: None,
            status: GenerationStatus::Idle,
            variants: Vec::new(),
            selected_variant_id: None,
            error_message: None,
        }
    }
}

impl VariantsData {
    /// The variant picked by the user, or the first one
    pub fn selected_variant(&self) -> Option<&Variant> {
        self.selected_variant_id
            .as_deref()
            .and_then(|id| self.variants.iter().find(|v| v.id == id))
            .or_else(|| self.variants.first())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStatus {
    #[default]
    Idle,
    Ready,
}

/// Output display node. Every field is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub status: OutputStatus,
}

/// AI prompt builder node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptBuilderData {
    pub scene_type: String,
    pub style: String,
    pub mood: String,
    pub subject: String,
    pub additional_details: String,
    pub generated_prompt: String,
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Default for PromptBuilderData {
    fn default() -> Self {
        Self {
            scene_type: "interior".to_string(),
            style: "modern".to_string(),
            mood: "bright".to_string(),
            subject: "architecture".to_string(),
            additional_details: String::new(),
            generated_prompt: String::new(),
            status: GenerationStatus::Idle,
            error_message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoSettings {
    /// Seconds: 4, 6 or 8
    pub duration: u8,
    pub aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            duration: 8,
            aspect_ratio: "16:9".to_string(),
            model: Some("veo-3.1-generate-preview".to_string()),
        }
    }
}

/// Video generator node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoData {
    pub prompt: String,
    pub settings: VideoSettings,
    /// Derived: resolved URL of the image to animate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_image_url: Option<String>,
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_id: Option<String>,
}

/// Payload of a node, one variant per [`NodeKind`]
///
/// Serializes as the bare payload object; the kind travels next to it as the
/// node's `type`, and [`NodeData::from_value`] decodes against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeData {
    Text(TextData),
    Image(ImageData),
    ImageInput(ImageInputData),
    Style(StyleSettings),
    StyleReference(StyleReferenceData),
    Material(MaterialData),
    Variants(VariantsData),
    Output(OutputData),
    PromptBuilder(PromptBuilderData),
    Video(VideoData),
}

impl NodeData {
    /// The kind this payload belongs to
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Image(_) => NodeKind::Image,
            NodeData::ImageInput(_) => NodeKind::ImageInput,
            NodeData::Style(_) => NodeKind::Style,
            NodeData::StyleReference(_) => NodeKind::StyleReference,
            NodeData::Material(_) => NodeKind::Material,
            NodeData::Variants(_) => NodeKind::Variants,
            NodeData::Output(_) => NodeKind::Output,
            NodeData::PromptBuilder(_) => NodeKind::PromptBuilder,
            NodeData::Video(_) => NodeKind::Video,
        }
    }

    /// The declared default payload of a kind
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Text => NodeData::Text(TextData::default()),
            NodeKind::Image => NodeData::Image(ImageData::default()),
            NodeKind::ImageInput => NodeData::ImageInput(ImageInputData::default()),
            NodeKind::Style => NodeData::Style(StyleSettings::default()),
            NodeKind::StyleReference => NodeData::StyleReference(StyleReferenceData::default()),
            NodeKind::Material => NodeData::Material(MaterialData::default()),
            NodeKind::Variants => NodeData::Variants(VariantsData::default()),
            NodeKind::Output => NodeData::Output(OutputData::default()),
            NodeKind::PromptBuilder => NodeData::PromptBuilder(PromptBuilderData::default()),
            NodeKind::Video => NodeData::Video(VideoData::default()),
        }
    }

    /// Decode a raw JSON payload as the payload of `kind`
    ///
    /// `null` yields the kind's default payload.
    pub fn from_value(kind: NodeKind, value: serde_json::Value) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(Self::default_for(kind));
        }

        Ok(match kind {
            NodeKind::Text => NodeData::Text(serde_json::from_value(value)?),
            NodeKind::Image => NodeData::Image(serde_json::from_value(value)?),
            NodeKind::ImageInput => NodeData::ImageInput(serde_json::from_value(value)?),
            NodeKind::Style => NodeData::Style(serde_json::from_value(value)?),
            NodeKind::StyleReference => NodeData::StyleReference(serde_json::from_value(value)?),
            NodeKind::Material => NodeData::Material(serde_json::from_value(value)?),
            NodeKind::Variants => NodeData::Variants(serde_json::from_value(value)?),
            NodeKind::Output => NodeData::Output(serde_json::from_value(value)?),
            NodeKind::PromptBuilder => NodeData::PromptBuilder(serde_json::from_value(value)?),
            NodeKind::Video => NodeData::Video(serde_json::from_value(value)?),
        })
    }

    /// Generation status recorded in the payload, for kinds that generate
    pub fn generation_status(&self) -> Option<GenerationStatus> {
        match self {
            NodeData::Image(d) => Some(d.status),
            NodeData::Variants(d) => Some(d.status),
            NodeData::PromptBuilder(d) => Some(d.status),
            NodeData::Video(d) => Some(d.status),
            _ => None,
        }
    }
}

/// Whether `url` is a resolved reference that may be propagated
///
/// Inline `data:` URLs carry the binary payload itself and are rejected.
pub fn is_resolved_reference(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && !url.starts_with("data:")
}
