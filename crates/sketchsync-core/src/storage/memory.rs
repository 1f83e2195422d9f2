//! In-memory board storage.

use super::{BoxFuture, BoardStorage, StorageError, StorageResult};
use crate::board::{Board, BoardId, SaveRequest};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<BoardId, Board>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with `boards`.
    pub fn with_boards(boards: impl IntoIterator<Item = Board>) -> Self {
        Self {
            boards: RwLock::new(boards.into_iter().map(|board| (board.id, board)).collect()),
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl BoardStorage for MemoryStorage {
    fn save(&self, id: BoardId, request: &SaveRequest) -> BoxFuture<'_, StorageResult<()>> {
        let request = request.clone();
        Box::pin(async move {
            let mut boards = self.boards.write().map_err(lock_error)?;
            let board = boards.get_mut(&id).ok_or(StorageError::NotFound(id))?;
            board.apply(&request);
            Ok(())
        })
    }

    fn load(&self, id: BoardId) -> BoxFuture<'_, StorageResult<Board>> {
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            boards.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn insert(&self, board: &Board) -> BoxFuture<'_, StorageResult<()>> {
        let board = board.clone();
        Box::pin(async move {
            let mut boards = self.boards.write().map_err(lock_error)?;
            boards.insert(board.id, board);
            Ok(())
        })
    }

    fn delete(&self, id: BoardId) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut boards = self.boards.write().map_err(lock_error)?;
            boards.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>> {
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            Ok(boards.keys().copied().collect())
        })
    }

    fn exists(&self, id: BoardId) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            Ok(boards.contains_key(&id))
        })
    }
}
