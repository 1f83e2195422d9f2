//! SketchSync Core Library
//!
//! Scene-change detection and canonical serialization between a whiteboard
//! drawing surface and board persistence.

pub mod board;
pub mod command;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod detect;
pub mod element;
pub mod session;
pub mod storage;

pub use board::{Board, BoardId, SaveRequest};
pub use command::{Command, ElementRef};
pub use config::{SessionConfig, DEFAULT_DEBOUNCE_MS};
pub use convert::{from_commands, to_commands};
pub use debounce::Debouncer;
pub use detect::{has_changed, has_changed_with_tolerance, GEOMETRY_TOLERANCE};
pub use element::{ElementId, ElementType, SceneElement, Snapshot};
pub use session::{AppState, PendingSave, WhiteboardSession};
pub use storage::{BoardStorage, MemoryStorage, StorageError, StorageResult};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
