//! Sound playback seam.
//!
//! Playback itself lives outside this crate. The loader only binds a
//! player to the package's `Sounds` folder through a factory.

use levelpack_storage::Storage;
use tracing::debug;

/// Plays the sounds of one package.
pub trait SoundPlayer: Send + Sync {
    /// Starts playback of the named sound file.
    fn play(&self, name: &str);
}

/// Creates a [`SoundPlayer`] bound to a package's sound folder.
pub trait SoundPlayerFactory: Send + Sync {
    fn create(&self, sounds: Box<dyn Storage>) -> Box<dyn SoundPlayer>;
}

/// Player that only logs, for headless tools and tests.
pub struct SilentSoundPlayer {
    sounds: Box<dyn Storage>,
}

impl SilentSoundPlayer {
    pub fn sounds(&self) -> &dyn Storage {
        self.sounds.as_ref()
    }
}

impl SoundPlayer for SilentSoundPlayer {
    fn play(&self, name: &str) {
        debug!("Skipping playback of {} from {}", name, self.sounds.location());
    }
}

pub struct SilentSoundPlayerFactory;

impl SoundPlayerFactory for SilentSoundPlayerFactory {
    fn create(&self, sounds: Box<dyn Storage>) -> Box<dyn SoundPlayer> {
        Box::new(SilentSoundPlayer { sounds })
    }
}
