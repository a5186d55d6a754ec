//! Read-only lookup tables handed to a session.

use crate::color::ColorTable;
use crate::ports::PortRegistry;
use crate::sounds::SoundTable;

/// Port layouts, sensor colors, and sound names for a session.
///
/// Built once and moved into [`TrainSession`](crate::TrainSession); the
/// session never hands out a mutable reference to it.
#[derive(Clone, Debug)]
pub struct HubCatalog {
    /// Port layouts per hub generation.
    pub registry: PortRegistry,
    /// Known sensor colors.
    pub colors: ColorTable,
    /// Named speaker sounds.
    pub sounds: SoundTable,
}

impl HubCatalog {
    /// Catalog with the standard layouts and tables.
    pub fn standard() -> Self {
        Self {
            registry: PortRegistry::standard(),
            colors: ColorTable::standard(),
            sounds: SoundTable::standard(),
        }
    }

    /// Replace the port registry.
    pub fn with_registry(mut self, registry: PortRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the color table.
    pub fn with_colors(mut self, colors: ColorTable) -> Self {
        self.colors = colors;
        self
    }

    /// Replace the sound table.
    pub fn with_sounds(mut self, sounds: SoundTable) -> Self {
        self.sounds = sounds;
        self
    }
}

impl Default for HubCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
