//! Loads an installed level package for the gameplay executor.
//!
//! A package folder holds `level.json` at its root plus `Images/` and
//! `Sounds/` asset folders. [`load_from_local`] decodes the schema, lists
//! the images and hands the sound folder to a caller-supplied
//! [`SoundPlayerFactory`]. [`load_from_server`] synchronizes first and then
//! loads the first available package.

mod error;
mod loader;
mod sound;

pub use error::{LoaderError, LoaderResult};
pub use loader::{load_from_local, load_from_server, LoadedPackage, LEVEL_FILE};
pub use sound::{SilentSoundPlayer, SilentSoundPlayerFactory, SoundPlayer, SoundPlayerFactory};
