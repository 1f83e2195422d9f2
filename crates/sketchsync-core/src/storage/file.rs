//! File-based board storage for native platforms.

use super::{BoxFuture, BoardStorage, StorageError, StorageResult};
use crate::board::{Board, BoardId, SaveRequest};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage for native platforms.
///
/// Stores each board as a pretty-printed JSON file named after its ID.
pub struct FileStorage {
    /// Base directory for board storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/sketchsync/boards/`
    /// On Windows: `%LOCALAPPDATA%\sketchsync\boards\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("sketchsync").join("boards"))
    }

    fn board_path(&self, id: BoardId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn read_board(path: &Path, id: BoardId) -> StorageResult<Board> {
    if !path.exists() {
        return Err(StorageError::NotFound(id));
    }

    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    Board::from_json(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn write_board(path: &Path, board: &Board) -> StorageResult<()> {
    let json = board
        .to_json()
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    fs::write(path, json)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

impl BoardStorage for FileStorage {
    fn save(&self, id: BoardId, request: &SaveRequest) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(id);
        let request = request.clone();

        Box::pin(async move {
            let mut board = read_board(&path, id)?;
            board.apply(&request);
            write_board(&path, &board)
        })
    }

    fn load(&self, id: BoardId) -> BoxFuture<'_, StorageResult<Board>> {
        let path = self.board_path(id);
        Box::pin(async move { read_board(&path, id) })
    }

    fn insert(&self, board: &Board) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(board.id);
        let board = board.clone();
        Box::pin(async move { write_board(&path, &board) })
    }

    fn delete(&self, id: BoardId) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| {
                    let stem = path.file_stem()?.to_str()?;
                    BoardId::parse_str(stem).ok()
                })
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: BoardId) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.board_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::element::ElementType;
    use crate::storage::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_insert_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let board = Board::new("Test Board", "owner");
        block_on(storage.insert(&board)).unwrap();
        let loaded = block_on(storage.load(board.id)).unwrap();

        assert_eq!(loaded.name, "Test Board");
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load(BoardId::new_v4()));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_save_updates_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let board = Board::new("Test Board", "owner");
        block_on(storage.insert(&board)).unwrap();

        let update = SaveRequest::elements(vec![Command::new(
            ElementType::Arrow,
            "a1",
            0.0,
            0.0,
            100.0,
            2.0,
        )]);
        block_on(storage.save(board.id, &update)).unwrap();

        let raw = fs::read_to_string(dir.path().join(format!("{}.json", board.id))).unwrap();
        assert!(raw.contains("\"a1\""));
        let loaded = block_on(storage.load(board.id)).unwrap();
        assert_eq!(loaded.elements.len(), 1);
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let id = BoardId::new_v4();
        fs::write(dir.path().join(format!("{}.json", id)), "{ not json").unwrap();

        let result = block_on(storage.load(id));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_ignores_foreign_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let a = Board::new("a", "owner");
        let b = Board::new("b", "owner");
        block_on(storage.insert(&a)).unwrap();
        block_on(storage.insert(&b)).unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        fs::write(dir.path().join("not-a-uuid.json"), "{}").unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&a.id));
        assert!(list.contains(&b.id));
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let board = Board::new("a", "owner");
        block_on(storage.insert(&board)).unwrap();
        assert!(block_on(storage.exists(board.id)).unwrap());

        block_on(storage.delete(board.id)).unwrap();
        assert!(!block_on(storage.exists(board.id)).unwrap());
    }
}
