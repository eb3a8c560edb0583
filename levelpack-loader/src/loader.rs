//! Package loading.

use levelpack_archive::{IMAGES_FOLDER, SOUNDS_FOLDER};
use levelpack_storage::{Storage, StoragePath};
use levelpack_sync::{CatalogClient, SyncOrchestrator};
use levelpack_types::Level;
use tracing::info;

use crate::{LoaderError, LoaderResult, SoundPlayer, SoundPlayerFactory};

/// Schema file at the root of every package.
pub const LEVEL_FILE: &str = "level.json";

/// An installed package, decoded and ready for the gameplay executor.
pub struct LoadedPackage {
    /// Location of the package folder.
    pub location: StoragePath,
    pub level: Level,
    /// Locations of every file in the `Images` folder.
    pub image_files: Vec<StoragePath>,
    pub sound_player: Box<dyn SoundPlayer>,
}

impl std::fmt::Debug for LoadedPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPackage")
            .field("location", &self.location)
            .field("level", &self.level)
            .field("image_files", &self.image_files)
            .finish_non_exhaustive()
    }
}

impl LoadedPackage {
    /// Resolves an image file name to its full location.
    ///
    /// `None` passes through as `Ok(None)`. A name that matches no image
    /// fails with [`LoaderError::ImageNotFound`]. The first image whose
    /// location ends with `name` wins.
    pub fn get_image(&self, name: Option<&str>) -> LoaderResult<Option<&StoragePath>> {
        let Some(name) = name else {
            return Ok(None);
        };
        self.image_files
            .iter()
            .find(|path| path.ends_with(name))
            .map(Some)
            .ok_or_else(|| LoaderError::ImageNotFound(name.to_string()))
    }
}

/// Loads the package stored in `folder`.
pub async fn load_from_local(
    folder: &dyn Storage,
    factory: &dyn SoundPlayerFactory,
) -> LoaderResult<LoadedPackage> {
    let text = folder.read_text(LEVEL_FILE).await?;
    let level = Level::from_json(&text)?;

    let images = folder.subfolder(IMAGES_FOLDER).await?;
    let image_files = images.list_files().await?;

    let sounds = folder.subfolder(SOUNDS_FOLDER).await?;
    let sound_player = factory.create(sounds);

    info!(
        "Loaded level from {} ({} states, {} images)",
        folder.location(),
        level.states.len(),
        image_files.len()
    );

    Ok(LoadedPackage {
        location: folder.location().clone(),
        level,
        image_files,
        sound_player,
    })
}

/// Synchronizes `root` with the catalog, then loads one package.
///
/// The package is the first catalog entry available locally after the
/// pass. If none is, the first local package folder is used. There is no
/// user selection.
pub async fn load_from_server<C: CatalogClient>(
    sync: &SyncOrchestrator<C>,
    root: &dyn Storage,
    factory: &dyn SoundPlayerFactory,
) -> LoaderResult<LoadedPackage> {
    let report = sync.synchronize(root).await?;
    let local = root.list_subfolder_locations().await?;

    let chosen = report
        .available()
        .find_map(|name| {
            local
                .iter()
                .find(|loc| loc.file_name() == name)
                .or_else(|| local.iter().find(|loc| loc.file_name().ends_with(name)))
        })
        .or_else(|| local.first())
        .ok_or(LoaderError::NoPackages)?;

    let folder = root.subfolder_at(chosen).await?;
    load_from_local(folder.as_ref(), factory).await
}
