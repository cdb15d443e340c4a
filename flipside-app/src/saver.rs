//! A [`GameStore`] over any medium that can hold a few bytes.

use crate::delegate::GameStore;
use crate::saved_state::{FormatError, SavedState};
use derive_more::{Display, Error};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Display, Error)]
pub enum SaveError {
    #[display(fmt = "no saved game")]
    Missing,
    #[display(fmt = "cannot access the saved game: {}", source)]
    Io { source: io::Error },
    #[display(fmt = "cannot read the saved game: {}", source)]
    Format { source: FormatError },
}

impl From<io::Error> for SaveError {
    fn from(source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            SaveError::Missing
        } else {
            SaveError::Io { source }
        }
    }
}

impl From<FormatError> for SaveError {
    fn from(source: FormatError) -> Self {
        SaveError::Format { source }
    }
}

/// Byte storage for one saved game.
///
/// `read_data` reports a medium with nothing in it as [`io::ErrorKind::NotFound`].
pub trait SaveData {
    fn write_data(&self, data: &[u8]) -> io::Result<()>;

    fn read_data(&self) -> io::Result<Vec<u8>>;
}

/// Stores games in the text format of [`SavedState`].
#[derive(Debug)]
pub struct GameSaver<D> {
    data: D,
}

impl<D: SaveData> GameSaver<D> {
    pub fn new(data: D) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &D {
        &self.data
    }
}

impl<D: SaveData> GameStore for GameSaver<D> {
    fn save_game(&self, state: &SavedState) -> Result<(), SaveError> {
        self.data.write_data(&state.encode())?;
        Ok(())
    }

    fn load_game(&self) -> Result<SavedState, SaveError> {
        let data = self.data.read_data()?;
        Ok(SavedState::decode(&data)?)
    }
}

/// Keeps the saved game in a single file.
#[derive(Clone, Debug)]
pub struct FileData {
    path: PathBuf,
}

impl FileData {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveData for FileData {
    fn write_data(&self, data: &[u8]) -> io::Result<()> {
        debug!(path = %self.path.display(), bytes = data.len(), "writing saved game");
        fs::write(&self.path, data)
    }

    fn read_data(&self) -> io::Result<Vec<u8>> {
        debug!(path = %self.path.display(), "reading saved game");
        fs::read(&self.path)
    }
}
