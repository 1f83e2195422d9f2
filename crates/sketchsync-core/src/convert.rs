//! Conversion between scene elements and canonical commands.
//!
//! The forward pass drops tombstones, flattens connector bindings to bare
//! `{id}` references and elides every field that holds its default. The
//! reverse pass re-applies those defaults and regenerates the engine's
//! bookkeeping (version, seed, nonce) while keeping identifiers verbatim.

use crate::command::{Command, ElementRef};
use crate::element::{
    Binding, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_OPACITY, DEFAULT_ROUGHNESS,
    DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, ElementType, SceneElement, Snapshot, TRANSPARENT,
    TextAlign, VerticalAlign,
};
use uuid::Uuid;

/// Version assigned to every element expanded from a command.
pub const INITIAL_VERSION: u64 = 1;

/// Convert a snapshot into the commands that get persisted.
///
/// Deleted elements are skipped; the output keeps the input's drawing order.
pub fn to_commands(elements: &[SceneElement]) -> Vec<Command> {
    elements
        .iter()
        .filter(|element| !element.is_deleted)
        .map(to_command)
        .collect()
}

/// Convert a single element, regardless of its deletion flag.
pub fn to_command(element: &SceneElement) -> Command {
    let mut command = Command::new(
        element.element_type.clone(),
        element.id.clone(),
        element.x,
        element.y,
        element.width,
        element.height,
    );

    command.angle = unless_default(element.angle, 0.0);
    command.stroke_color = unless_default_str(&element.stroke_color, DEFAULT_STROKE_COLOR);
    command.background_color = unless_default_str(&element.background_color, TRANSPARENT);
    command.fill_style =
        Some(element.fill_style.clone()).filter(|style| *style != Default::default());
    command.stroke_width = unless_default(element.stroke_width, DEFAULT_STROKE_WIDTH);
    command.stroke_style =
        Some(element.stroke_style.clone()).filter(|style| *style != Default::default());
    command.roughness = unless_default(element.roughness, DEFAULT_ROUGHNESS);
    command.opacity = unless_default(element.opacity, DEFAULT_OPACITY);
    command.roundness = element.roundness.clone();
    command.locked = element.locked.then_some(true);
    command.link = element.link.clone().filter(|link| !link.is_empty());

    if element.element_type.is_connector() {
        // Focus and gap are recomputed by the engine when the scene loads.
        command.start = element.start_binding.as_ref().map(|binding| ElementRef {
            id: binding.element_id.clone(),
        });
        command.end = element.end_binding.as_ref().map(|binding| ElementRef {
            id: binding.element_id.clone(),
        });
        command.start_arrowhead = element.start_arrowhead.clone();
        command.end_arrowhead = element.end_arrowhead.clone();
        command.label = element.label.clone();
    } else {
        command.bound_elements = element
            .bound_elements
            .as_ref()
            .filter(|bound| !bound.is_empty())
            .cloned();
    }

    if element.element_type.is_linear()
        && !element.points.is_empty()
        && element.points != element.straight_points()
    {
        command.points = Some(element.points.clone());
    }

    if element.element_type == ElementType::Text {
        command.text = element.text.clone().filter(|text| !text.is_empty());
        command.font_size = element
            .font_size
            .and_then(|size| unless_default(size, DEFAULT_FONT_SIZE));
        command.font_family = element.font_family.filter(|family| *family != DEFAULT_FONT_FAMILY);
        command.text_align = element
            .text_align
            .clone()
            .filter(|align| *align != TextAlign::default());
        command.vertical_align = element
            .vertical_align
            .clone()
            .filter(|align| *align != VerticalAlign::default());
        command.container_id = element.container_id.clone();
    }

    command
}

/// Expand stored commands into a scene for the drawing surface.
pub fn from_commands(commands: &[Command]) -> Snapshot {
    commands.iter().map(from_command).collect()
}

/// Expand one command, keeping its identifier.
pub fn from_command(command: &Command) -> SceneElement {
    let mut element = SceneElement::new(command.id.clone(), command.element_type.clone())
        .with_geometry(command.x, command.y, command.width, command.height);

    element.version = INITIAL_VERSION;
    element.seed = random_seed();
    element.version_nonce = random_seed();

    element.angle = command.angle.unwrap_or(0.0);
    if let Some(color) = &command.stroke_color {
        element.stroke_color = color.clone();
    }
    if let Some(color) = &command.background_color {
        element.background_color = color.clone();
    }
    element.fill_style = command.fill_style.clone().unwrap_or_default();
    element.stroke_width = command.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH);
    element.stroke_style = command.stroke_style.clone().unwrap_or_default();
    element.roughness = command.roughness.unwrap_or(DEFAULT_ROUGHNESS);
    element.opacity = command.opacity.unwrap_or(DEFAULT_OPACITY);
    element.roundness = command.roundness.clone();
    element.locked = command.locked.unwrap_or(false);
    element.link = command.link.clone();
    element.bound_elements = command.bound_elements.clone();

    if command.element_type.is_connector() {
        element.start_binding = command
            .start
            .as_ref()
            .map(|end| Binding::to_element(end.id.clone()));
        element.end_binding = command
            .end
            .as_ref()
            .map(|end| Binding::to_element(end.id.clone()));
        element.start_arrowhead = command.start_arrowhead.clone();
        element.end_arrowhead = command.end_arrowhead.clone();
        element.label = command.label.clone();
    }

    if command.element_type.is_linear() {
        element.points = command
            .points
            .clone()
            .unwrap_or_else(|| element.straight_points());
    }

    if command.element_type == ElementType::Text {
        element.text = Some(command.text.clone().unwrap_or_default());
        element.font_size = Some(command.font_size.unwrap_or(DEFAULT_FONT_SIZE));
        element.font_family = Some(command.font_family.unwrap_or(DEFAULT_FONT_FAMILY));
        element.text_align = Some(command.text_align.clone().unwrap_or_default());
        element.vertical_align = Some(command.vertical_align.clone().unwrap_or_default());
        element.container_id = command.container_id.clone();
    }

    element
}

fn unless_default(value: f64, default: f64) -> Option<f64> {
    (value != default).then_some(value)
}

fn unless_default_str(value: &str, default: &str) -> Option<String> {
    (value != default).then(|| value.to_string())
}

/// Random seed in the engine's positive 31-bit range.
fn random_seed() -> u64 {
    (Uuid::new_v4().as_u128() as u64) & 0x7FFF_FFFF
}
