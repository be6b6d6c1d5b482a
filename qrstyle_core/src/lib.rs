mod grid;
mod meta;

pub use grid::{Module, ModuleGrid, Neighbors, FINDER_SIZE};
pub use meta::{Ecl, Version, VersionError};

/// Encoded QR code: the module grid together with the parameters it was encoded with.
#[derive(Debug, Clone)]
pub struct QrCode {
    grid: ModuleGrid,
    version: Version,
    ecl: Ecl,
}

impl QrCode {
    /// Construct a new [QrCode]. Returns `None` if the grid size does not match `version`.
    pub fn new(grid: ModuleGrid, version: Version, ecl: Ecl) -> Option<Self> {
        if grid.size() == version.width() {
            Some(Self { grid, version, ecl })
        } else {
            None
        }
    }

    /// Get the underlying module grid.
    pub fn grid(&self) -> &ModuleGrid {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ecl(&self) -> Ecl {
        self.ecl
    }
}

impl AsRef<ModuleGrid> for QrCode {
    fn as_ref(&self) -> &ModuleGrid {
        self.grid()
    }
}

impl AsRef<ModuleGrid> for ModuleGrid {
    fn as_ref(&self) -> &ModuleGrid {
        self
    }
}

impl From<QrCode> for ModuleGrid {
    fn from(value: QrCode) -> Self {
        value.grid
    }
}
