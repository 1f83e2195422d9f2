//! Scene elements as produced by the drawing surface.
//!
//! This is an adapter over the drawing engine's element schema: only the
//! documented subset of fields is read, anything else in the incoming JSON
//! (frame references, update timestamps, fractional indices) is ignored.

use serde::{Deserialize, Serialize};

/// Stable element identifier assigned by the drawing surface.
pub type ElementId = String;

/// An ordered list of scene elements at one point in time.
pub type Snapshot = Vec<SceneElement>;

/// Stroke color written when an element carries none.
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
/// Background color meaning "no fill".
pub const TRANSPARENT: &str = "transparent";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_ROUGHNESS: f64 = 1.0;
/// Fully opaque, on the engine's 0-100 scale.
pub const DEFAULT_OPACITY: f64 = 100.0;
pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const DEFAULT_FONT_FAMILY: u32 = 1;
/// Binding gap used when a binding is rebuilt from a bare `{id}` reference.
pub const DEFAULT_BINDING_GAP: f64 = 1.0;

/// Element type tag.
///
/// Tags the adapter does not know are kept verbatim in [`ElementType::Other`]
/// so they survive a save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Rectangle,
    Ellipse,
    Diamond,
    Arrow,
    Line,
    Text,
    Freedraw,
    Image,
    Frame,
    #[serde(untagged)]
    Other(String),
}

impl ElementType {
    /// Connectors bind to other elements at each end.
    pub fn is_connector(&self) -> bool {
        matches!(self, ElementType::Arrow)
    }

    /// Linear elements are drawn through a list of relative points.
    pub fn is_linear(&self) -> bool {
        matches!(self, ElementType::Arrow | ElementType::Line | ElementType::Freedraw)
    }
}

/// Fill pattern for closed shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    Hachure,
    CrossHatch,
    #[default]
    Solid,
    Zigzag,
    #[serde(untagged)]
    Other(String),
}

/// Stroke dash style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    #[serde(untagged)]
    Other(String),
}

/// Arrowhead drawn at one end of a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    Arrow,
    Bar,
    Dot,
    Triangle,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
    #[serde(untagged)]
    Other(String),
}

/// Corner-roundness descriptor (`{ "type": 3 }` for adaptive radius).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roundness {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A connector's attachment to another element.
///
/// `focus` and `gap` are geometric attachment metadata the engine recomputes
/// on load; only `element_id` is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: ElementId,
    #[serde(default)]
    pub focus: f64,
    #[serde(default = "default_binding_gap")]
    pub gap: f64,
}

impl Binding {
    /// Binding to `element_id` with neutral attachment metadata.
    pub fn to_element(element_id: impl Into<ElementId>) -> Self {
        Self {
            element_id: element_id.into(),
            focus: 0.0,
            gap: DEFAULT_BINDING_GAP,
        }
    }
}

/// Reverse reference from a shape to a connector or text bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
}

/// Text label carried by a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// One drawing-surface object.
///
/// Only `id` and `type` are required on input; every other field falls back
/// to the engine default so partially populated elements still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,

    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub angle: f64,

    /// Bumped by the engine on every edit.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub version_nonce: u64,
    #[serde(default)]
    pub seed: u64,
    /// Tombstone flag; deleted elements stay in the snapshot until compaction.
    #[serde(default)]
    pub is_deleted: bool,

    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default)]
    pub fill_style: FillStyle,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub roundness: Option<Roundness>,

    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub link: Option<String>,

    /// Connectors and labels attached to this element.
    #[serde(default)]
    pub bound_elements: Option<Vec<BoundElement>>,

    #[serde(default)]
    pub start_binding: Option<Binding>,
    #[serde(default)]
    pub end_binding: Option<Binding>,
    #[serde(default)]
    pub start_arrowhead: Option<Arrowhead>,
    #[serde(default)]
    pub end_arrowhead: Option<Arrowhead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,

    /// Offsets from `(x, y)` for linear elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<[f64; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ElementId>,
}

fn default_stroke_color() -> String {
    DEFAULT_STROKE_COLOR.to_string()
}

fn default_background_color() -> String {
    TRANSPARENT.to_string()
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_roughness() -> f64 {
    DEFAULT_ROUGHNESS
}

fn default_opacity() -> f64 {
    DEFAULT_OPACITY
}

fn default_binding_gap() -> f64 {
    DEFAULT_BINDING_GAP
}

impl SceneElement {
    /// Create an element with engine defaults and zero geometry.
    pub fn new(id: impl Into<ElementId>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            version: 1,
            version_nonce: 0,
            seed: 0,
            is_deleted: false,
            stroke_color: default_stroke_color(),
            background_color: default_background_color(),
            fill_style: FillStyle::default(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_style: StrokeStyle::default(),
            roughness: DEFAULT_ROUGHNESS,
            opacity: DEFAULT_OPACITY,
            roundness: None,
            locked: false,
            link: None,
            bound_elements: None,
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: None,
            label: None,
            points: Vec::new(),
            text: None,
            font_size: None,
            font_family: None,
            text_align: None,
            vertical_align: None,
            container_id: None,
        }
    }

    /// Set position and size.
    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Points implied by the geometry alone: a straight segment from the
    /// origin to the far corner.
    pub fn straight_points(&self) -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [self.width, self.height]]
    }
}
