//! Choice of the bitmap pasted on each part of a module, given the activity of its neighbors.

use qrstyle_core::Neighbors;

/// Which corners of a module are rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corners {
    pub nw: bool,
    pub ne: bool,
    pub se: bool,
    pub sw: bool,
}

/// Which ends of a bar segment are rounded. `start` is north or west, `end` is south or east.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caps {
    pub start: bool,
    pub end: bool,
}

/// A corner is rounded only where the module is locally convex, i.e. both modules adjacent to that corner are
/// inactive.
/// # Example
/// ```
/// use qrstyle_core::Neighbors;
/// use qrstyle_render::select::{rounded_corners, Corners};
/// assert_eq!(rounded_corners(Neighbors::SURROUNDED), Corners::default());
/// let west_only = Neighbors { west: true, ..Neighbors::ISOLATED };
/// assert_eq!(rounded_corners(west_only), Corners { nw: false, ne: true, se: true, sw: false });
/// ```
pub fn rounded_corners(neighbors: Neighbors) -> Corners {
    let Neighbors {
        north,
        south,
        east,
        west,
    } = neighbors;
    Corners {
        nw: !north && !west,
        ne: !north && !east,
        se: !south && !east,
        sw: !south && !west,
    }
}

pub fn vertical_caps(neighbors: Neighbors) -> Caps {
    Caps {
        start: !neighbors.north,
        end: !neighbors.south,
    }
}

pub fn horizontal_caps(neighbors: Neighbors) -> Caps {
    Caps {
        start: !neighbors.west,
        end: !neighbors.east,
    }
}
