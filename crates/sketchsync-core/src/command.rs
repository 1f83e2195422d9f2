//! Canonical command representation of scene elements.
//!
//! A command is what gets persisted: the mandatory identity and geometry of
//! an element plus only those optional fields whose value differs from the
//! documented default. Absent keys mean "default", no sentinel is written.

use crate::element::{
    Arrowhead, BoundElement, ElementId, ElementType, FillStyle, Label, Roundness, StrokeStyle,
    TextAlign, VerticalAlign,
};
use serde::{Deserialize, Serialize};

/// Bare reference from a connector end to the element it binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    pub id: ElementId,
}

/// Minimal, default-elided element record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub id: ElementId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<FillStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roundness: Option<Roundness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Non-connectors only; never empty when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_elements: Option<Vec<BoundElement>>,

    // Connector ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ElementRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ElementRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_arrowhead: Option<Arrowhead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_arrowhead: Option<Arrowhead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,

    /// Linear elements only; absent when the element is a straight segment
    /// spanning its own width and height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,

    // Text elements.
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

impl Command {
    /// A command with only the mandatory fields set.
    pub fn new(
        element_type: ElementType,
        id: impl Into<ElementId>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            element_type,
            id: id.into(),
            x,
            y,
            width,
            height,
            angle: None,
            stroke_color: None,
            background_color: None,
            fill_style: None,
            stroke_width: None,
            stroke_style: None,
            roughness: None,
            opacity: None,
            roundness: None,
            locked: None,
            link: None,
            bound_elements: None,
            start: None,
            end: None,
            start_arrowhead: None,
            end_arrowhead: None,
            label: None,
            points: None,
            text: None,
            font_size: None,
            font_family: None,
            text_align: None,
            vertical_align: None,
            container_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_rectangle() {
        let json = r##"{ "type": "rectangle", "id": "r1", "x": 10, "y": 20, "width": 150, "height": 100,
            "strokeColor": "#1e1e1e", "backgroundColor": "#c0eb75" }"##;
        let command: Command = serde_json::from_str(json).unwrap();

        assert_eq!(command.element_type, ElementType::Rectangle);
        assert_eq!(command.stroke_color.as_deref(), Some("#1e1e1e"));
        assert_eq!(command.background_color.as_deref(), Some("#c0eb75"));
        assert!(command.opacity.is_none());
    }

    #[test]
    fn test_wire_shape_arrow() {
        let json = r#"{ "type": "arrow", "id": "a1", "x": 0, "y": 0, "width": 100, "height": 2,
            "start": { "id": "r1" }, "end": { "id": "e1" }, "endArrowhead": "arrow" }"#;
        let command: Command = serde_json::from_str(json).unwrap();

        assert_eq!(command.start, Some(ElementRef { id: "r1".to_string() }));
        assert_eq!(command.end, Some(ElementRef { id: "e1".to_string() }));
        assert_eq!(command.end_arrowhead, Some(Arrowhead::Arrow));
    }

    #[test]
    fn test_bare_command_serializes_mandatory_keys_only() {
        let command = Command::new(ElementType::Ellipse, "e1", 1.0, 2.0, 3.0, 4.0);
        let value = serde_json::to_value(&command).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["height", "id", "type", "width", "x", "y"]);
    }
}
