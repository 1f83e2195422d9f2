//! Boards as owned by the persistence layer.

use crate::command::Command;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unique identifier for boards.
pub type BoardId = Uuid;

/// A persisted board: metadata plus its ordered element commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub owner_id: String,
    /// Commands in drawing order (back to front).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub elements: Vec<Command>,
}

impl Board {
    /// Create an empty board with a fresh identifier.
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            owner_id: owner_id.into(),
            elements: Vec::new(),
        }
    }

    /// Apply an update. Fields absent from the request are left as they are;
    /// a present element list replaces the current one wholesale.
    pub fn apply(&mut self, request: &SaveRequest) {
        if let Some(elements) = &request.elements {
            self.elements = elements.clone();
        }
        if let Some(name) = &request.name {
            self.name = name.clone();
        }
    }

    /// Serialize the board to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a board from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Command>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Update payload handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Command>>,
}

impl SaveRequest {
    pub fn elements(elements: Vec<Command>) -> Self {
        Self {
            name: None,
            elements: Some(elements),
        }
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            elements: None,
        }
    }

    /// Number of element commands carried, zero when absent.
    pub fn element_count(&self) -> usize {
        self.elements.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    #[test]
    fn test_board_json_shape() {
        let mut board = Board::new("Roadmap", "user-7");
        board.elements.push(Command::new(ElementType::Diamond, "d1", 0.0, 0.0, 10.0, 10.0));

        let value: serde_json::Value = serde_json::from_str(&board.to_json().unwrap()).unwrap();
        assert_eq!(value["ownerId"], "user-7");
        assert_eq!(value["elements"][0]["type"], "diamond");

        let loaded = Board::from_json(&board.to_json().unwrap()).unwrap();
        assert_eq!(loaded, board);
    }

    const BOARD_ID: &str = "0191d5c0-8c4e-7e3a-9d1b-3f1e2a4b5c6d";

    #[test]
    fn test_board_without_elements_loads_empty() {
        let json = format!(r#"{{ "id": "{BOARD_ID}", "name": "b", "ownerId": "u" }}"#);
        let board = Board::from_json(&json).unwrap();
        assert!(board.elements.is_empty());
    }

    #[test]
    fn test_board_with_null_elements_loads_empty() {
        let json = format!(
            r#"{{ "id": "{BOARD_ID}", "name": "b", "ownerId": "u", "elements": null }}"#
        );
        let board = Board::from_json(&json).unwrap();
        assert!(board.elements.is_empty());
        assert_eq!(board.name, "b");
    }

    #[test]
    fn test_apply_replaces_elements_and_keeps_name() {
        let mut board = Board::new("Roadmap", "user-7");
        board
            .elements
            .push(Command::new(ElementType::Text, "old", 0.0, 0.0, 1.0, 1.0));

        let update = SaveRequest::elements(vec![Command::new(
            ElementType::Ellipse,
            "new",
            0.0,
            0.0,
            1.0,
            1.0,
        )]);
        board.apply(&update);
        assert_eq!(board.elements.len(), 1);
        assert_eq!(board.elements[0].id, "new");
        assert_eq!(board.name, "Roadmap");

        board.apply(&SaveRequest {
            name: Some("Cleared".to_string()),
            elements: Some(Vec::new()),
        });
        assert_eq!(board.name, "Cleared");
        assert!(board.elements.is_empty());
    }

    #[test]
    fn test_rename_keeps_elements() {
        let mut board = Board::new("Roadmap", "user-7");
        board
            .elements
            .push(Command::new(ElementType::Diamond, "d1", 0.0, 0.0, 10.0, 10.0));

        let update: SaveRequest = serde_json::from_str(r#"{ "name": "Renamed" }"#).unwrap();
        assert_eq!(update, SaveRequest::rename("Renamed"));
        board.apply(&update);

        assert_eq!(board.name, "Renamed");
        assert_eq!(board.elements.len(), 1);
        assert_eq!(board.elements[0].id, "d1");
    }

    #[test]
    fn test_save_request_wire_shape() {
        let value = serde_json::to_value(SaveRequest::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));

        let value = serde_json::to_value(SaveRequest::elements(Vec::new())).unwrap();
        assert_eq!(value, serde_json::json!({ "elements": [] }));
        assert_eq!(SaveRequest::default().element_count(), 0);
    }
}
