//! Persistence collaborator for boards.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::board::{Board, BoardId, SaveRequest};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(BoardId),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for board storage backends.
///
/// `save` is the only call a whiteboard session makes while editing; the
/// rest exist for loading and managing boards around it.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait BoardStorage: Send + Sync {
    /// Apply an update to an existing board.
    fn save(&self, id: BoardId, request: &SaveRequest) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a board.
    fn load(&self, id: BoardId) -> BoxFuture<'_, StorageResult<Board>>;

    /// Create or replace a board.
    fn insert(&self, board: &Board) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a board.
    fn delete(&self, id: BoardId) -> BoxFuture<'_, StorageResult<()>>;

    /// List all board IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>>;

    /// Check if a board exists.
    fn exists(&self, id: BoardId) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for board storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait BoardStorage {
    /// Apply an update to an existing board.
    fn save(&self, id: BoardId, request: &SaveRequest) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a board.
    fn load(&self, id: BoardId) -> BoxFuture<'_, StorageResult<Board>>;

    /// Create or replace a board.
    fn insert(&self, board: &Board) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a board.
    fn delete(&self, id: BoardId) -> BoxFuture<'_, StorageResult<()>>;

    /// List all board IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>>;

    /// Check if a board exists.
    fn exists(&self, id: BoardId) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
