//! Whiteboard session: change detection plus debounced persistence.
//!
//! The drawing surface calls [`WhiteboardSession::on_change`] on every scene
//! mutation and the host drives [`WhiteboardSession::tick`] from its event
//! loop. Everything runs on the host's thread; the only asynchronous part is
//! the save future handed back to the host, which is fire-and-forget.

use crate::board::{Board, BoardId, SaveRequest};
use crate::config::SessionConfig;
use crate::convert::{from_commands, to_commands};
use crate::debounce::Debouncer;
use crate::detect::has_changed_with_tolerance;
use crate::element::{SceneElement, Snapshot};
use crate::storage::{BoardStorage, BoxFuture};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Drawing-surface UI state; carried through untouched.
pub type AppState = serde_json::Value;

struct StateChange {
    elements: Snapshot,
    app_state: AppState,
}

/// A save that is due, built from the last state before quiescence.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub board_id: BoardId,
    pub request: SaveRequest,
    pub app_state: AppState,
}

/// Tracks one open board on the drawing surface.
pub struct WhiteboardSession<S: BoardStorage> {
    board_id: BoardId,
    storage: Arc<S>,
    config: SessionConfig,
    /// Scene as of the last change notification.
    previous: Snapshot,
    debouncer: Debouncer<StateChange>,
}

impl<S: BoardStorage + 'static> WhiteboardSession<S> {
    /// Start a session over an empty scene.
    pub fn new(board_id: BoardId, storage: Arc<S>, config: SessionConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            board_id,
            storage,
            config,
            previous: Vec::new(),
            debouncer,
        }
    }

    /// Start a session on a loaded board.
    ///
    /// Returns the session together with the expanded scene, which the
    /// drawing surface should use verbatim as its initial elements.
    pub fn open(board: &Board, storage: Arc<S>, config: SessionConfig) -> (Self, Snapshot) {
        let scene = from_commands(&board.elements);
        let mut session = Self::new(board.id, storage, config);
        session.previous = scene.clone();
        log::info!(
            "Opened board {} ({} elements)",
            board.id,
            board.elements.len()
        );
        (session, scene)
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The scene as of the last notification.
    pub fn previous(&self) -> &[SceneElement] {
        &self.previous
    }

    /// Whether a save is waiting for the debounce interval to pass.
    pub fn is_dirty(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Handle a change notification from the drawing surface.
    ///
    /// Returns true when the scene changed materially and a save was armed.
    pub fn on_change(&mut self, elements: &[SceneElement], app_state: AppState) -> bool {
        self.on_change_at(Instant::now(), elements, app_state)
    }

    /// [`WhiteboardSession::on_change`] against an explicit clock reading.
    pub fn on_change_at(
        &mut self,
        now: Instant,
        elements: &[SceneElement],
        app_state: AppState,
    ) -> bool {
        let changed =
            has_changed_with_tolerance(&self.previous, elements, self.config.geometry_tolerance);
        // The baseline moves on every notification, changed or not.
        self.previous = elements.to_vec();

        if changed {
            self.debouncer.call_at(
                now,
                StateChange {
                    elements: elements.to_vec(),
                    app_state,
                },
            );
        }
        changed
    }

    /// Take the due save, if the scene has been quiet long enough.
    pub fn poll(&mut self) -> Option<PendingSave> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<PendingSave> {
        let change = self.debouncer.poll_at(now)?;
        Some(PendingSave {
            board_id: self.board_id,
            request: SaveRequest::elements(to_commands(&change.elements)),
            app_state: change.app_state,
        })
    }

    /// Send a save to storage.
    ///
    /// The returned future never fails: errors are logged and dropped, and
    /// the local scene stays the source of truth until the next save.
    pub fn dispatch(&self, pending: PendingSave) -> BoxFuture<'static, ()> {
        let storage = Arc::clone(&self.storage);
        Box::pin(async move {
            let PendingSave {
                board_id, request, ..
            } = pending;
            match storage.save(board_id, &request).await {
                Ok(()) => log::info!(
                    "Saved board {} ({} elements)",
                    board_id,
                    request.element_count()
                ),
                Err(e) => log::error!("Failed to save board {}: {}", board_id, e),
            }
        })
    }

    /// Poll and, if a save is due, return its dispatch future.
    pub fn tick(&mut self) -> Option<BoxFuture<'static, ()>> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<BoxFuture<'static, ()>> {
        self.poll_at(now).map(|pending| self.dispatch(pending))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::element::ElementType;
    use crate::storage::{MemoryStorage, StorageError, StorageResult, block_on};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn config() -> SessionConfig {
        SessionConfig::default().with_debounce_ms(200)
    }

    fn rect(id: &str, version: u64, x: f64) -> SceneElement {
        let mut element =
            SceneElement::new(id, ElementType::Rectangle).with_geometry(x, 0.0, 50.0, 50.0);
        element.version = version;
        element
    }

    fn session_with_board() -> (WhiteboardSession<MemoryStorage>, Arc<MemoryStorage>, Board) {
        let board = Board::new("Test", "owner");
        let storage = Arc::new(MemoryStorage::with_boards([board.clone()]));
        let session = WhiteboardSession::new(board.id, Arc::clone(&storage), config());
        (session, storage, board)
    }

    #[test]
    fn test_open_seeds_previous_snapshot() {
        let mut board = Board::new("Test", "owner");
        board.elements = vec![
            Command::new(ElementType::Rectangle, "r1", 0.0, 0.0, 10.0, 10.0),
            Command::new(ElementType::Ellipse, "e1", 30.0, 0.0, 10.0, 10.0),
        ];
        let storage = Arc::new(MemoryStorage::with_boards([board.clone()]));

        let (mut session, scene) = WhiteboardSession::open(&board, storage, config());
        assert_eq!(scene.len(), 2);
        assert_eq!(session.previous(), scene.as_slice());

        // The surface echoes the initial scene back on mount.
        assert!(!session.on_change(&scene, json!({})));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_jitter_does_not_arm_a_save() {
        let (mut session, _, _) = session_with_board();
        let start = Instant::now();

        assert!(session.on_change_at(start, &[rect("r1", 1, 0.0)], json!(null)));
        let _ = session.poll_at(start + Duration::from_secs(1));

        assert!(!session.on_change_at(start, &[rect("r1", 1, 0.004)], json!(null)));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_baseline_follows_every_notification() {
        let (mut session, _, _) = session_with_board();
        let start = Instant::now();
        session.on_change_at(start, &[rect("r1", 1, 0.0)], json!(null));

        assert!(!session.on_change_at(start, &[rect("r1", 1, 0.006)], json!(null)));
        assert!(!session.on_change_at(start, &[rect("r1", 1, 0.012)], json!(null)));
        assert!((session.previous()[0].x - 0.012).abs() < f64::EPSILON);
    }

    #[test]
    fn test_save_fires_after_quiet_interval() {
        let (mut session, storage, board) = session_with_board();
        let start = Instant::now();

        assert!(session.on_change_at(start, &[rect("r1", 1, 0.0)], json!({ "zoom": 1 })));
        assert!(session.is_dirty());
        assert!(session.tick_at(start + Duration::from_millis(199)).is_none());

        let save = session
            .tick_at(start + Duration::from_millis(200))
            .expect("save should be due");
        block_on(save);

        let stored = block_on(storage.load(board.id)).unwrap();
        assert_eq!(stored.elements.len(), 1);
        assert_eq!(stored.elements[0].id, "r1");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_last_state_before_quiescence_wins() {
        let (mut session, _, board) = session_with_board();
        let start = Instant::now();

        session.on_change_at(start, &[rect("r1", 1, 0.0)], json!({ "n": 1 }));
        session.on_change_at(
            start + Duration::from_millis(100),
            &[rect("r1", 2, 40.0)],
            json!({ "n": 2 }),
        );
        let mut gone = rect("r2", 1, 80.0);
        gone.is_deleted = true;
        session.on_change_at(
            start + Duration::from_millis(150),
            &[rect("r1", 3, 90.0), gone],
            json!({ "n": 3 }),
        );

        assert!(session.poll_at(start + Duration::from_millis(300)).is_none());
        let pending = session.poll_at(start + Duration::from_millis(350)).unwrap();

        assert_eq!(pending.board_id, board.id);
        assert_eq!(pending.app_state, json!({ "n": 3 }));
        let elements = pending.request.elements.expect("session saves always carry elements");
        assert_eq!(elements.len(), 1);
        assert!((elements[0].x - 90.0).abs() < f64::EPSILON);
        assert!(session.poll_at(start + Duration::from_secs(5)).is_none());
    }

    struct FailingStorage {
        attempts: AtomicUsize,
    }

    impl BoardStorage for FailingStorage {
        fn save(&self, id: BoardId, _request: &SaveRequest) -> BoxFuture<'_, StorageResult<()>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Err(StorageError::NotFound(id)) })
        }

        fn load(&self, id: BoardId) -> BoxFuture<'_, StorageResult<Board>> {
            Box::pin(async move { Err(StorageError::NotFound(id)) })
        }

        fn insert(&self, _board: &Board) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Other("read-only".to_string())) })
        }

        fn delete(&self, _id: BoardId) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn exists(&self, _id: BoardId) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_failed_save_is_not_retried() {
        let storage = Arc::new(FailingStorage {
            attempts: AtomicUsize::new(0),
        });
        let mut session = WhiteboardSession::new(BoardId::new_v4(), Arc::clone(&storage), config());
        let start = Instant::now();

        session.on_change_at(start, &[rect("r1", 1, 0.0)], json!(null));
        block_on(session.tick_at(start + Duration::from_secs(1)).unwrap());

        assert_eq!(storage.attempts.load(Ordering::SeqCst), 1);
        assert!(!session.is_dirty());
        assert!(session.tick_at(start + Duration::from_secs(2)).is_none());
        // Local state is untouched by the failure.
        assert_eq!(session.previous().len(), 1);
    }
}
