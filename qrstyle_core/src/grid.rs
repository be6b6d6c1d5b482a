use bitvec::vec::BitVec;

/// Side of a finder pattern, in modules.
pub const FINDER_SIZE: usize = 7;

/// Module (aka, a cell) of a QR code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Module {
    Light,
    Dark,
}

impl Module {
    /// Whether the module is active, i.e. drawn in the foreground.
    /// # Example
    /// ```
    /// use qrstyle_core::Module;
    /// assert!(Module::Dark.is_dark());
    /// assert!(!Module::Light.is_dark());
    /// ```
    pub fn is_dark(self) -> bool {
        self == Module::Dark
    }
}

impl From<bool> for Module {
    fn from(value: bool) -> Self {
        match value {
            true => Module::Dark,
            false => Module::Light,
        }
    }
}

impl From<Module> for bool {
    fn from(value: Module) -> Self {
        value.is_dark()
    }
}

/// A square matrix of bits.
#[derive(Clone, PartialEq, Eq)]
struct BitMatrix {
    data: BitVec,
    size: usize,
}

impl BitMatrix {
    /// Return a matrix of size `size` filled with `value`.
    fn filled(size: usize, value: bool) -> Self {
        Self {
            data: BitVec::repeat(value, size * size),
            size,
        }
    }

    /// Get the 1D index of the data array corresponding to position `(i, j)`, checking for validity.
    #[inline]
    fn linearized_index(&self, i: usize, j: usize) -> Option<usize> {
        if i < self.size && j < self.size {
            Some(self.size * i + j)
        } else {
            None
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> Option<bool> {
        self.data.get(self.linearized_index(i, j)?).map(|bit| *bit)
    }

    /// # Panics
    /// Panics if position `(i, j)` is out of bounds.
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: bool) {
        let index = self.linearized_index(i, j).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the size is {} but the index is ({}, {})",
                self.size, i, j
            )
        });
        self.data.set(index, value)
    }
}

/// Activity of the four direct neighbors of a module. Positions outside the grid are inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Neighbors {
    /// A module whose four neighbors are all inactive.
    pub const ISOLATED: Self = Self {
        north: false,
        south: false,
        east: false,
        west: false,
    };

    /// A module whose four neighbors are all active.
    pub const SURROUNDED: Self = Self {
        north: true,
        south: true,
        east: true,
        west: true,
    };
}

/// The square grid of modules of an encoded symbol, without any quiet zone. Positions are `(i, j)`, i.e. row and
/// column.
#[derive(Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    matrix: BitMatrix,
}

impl ModuleGrid {
    /// Return a grid of size `size` filled with `module`.
    #[inline]
    pub fn filled(size: usize, module: Module) -> Self {
        Self {
            matrix: BitMatrix::filled(size, module.into()),
        }
    }

    /// Build a grid of size `size` by calling `f(i, j)` for every position.
    /// # Example
    /// ```
    /// use qrstyle_core::{Module, ModuleGrid};
    /// let grid = ModuleGrid::from_fn(3, |i, j| Module::from(i == j));
    /// assert_eq!(grid.get(1, 1), Some(Module::Dark));
    /// assert_eq!(grid.get(0, 2), Some(Module::Light));
    /// ```
    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Module,
    {
        let mut grid = Self::filled(size, Module::Light);
        for i in 0..size {
            for j in 0..size {
                grid.set(i, j, f(i, j));
            }
        }
        grid
    }

    /// Build a grid of size `size` from modules in row-major order. Returns `None` if `modules` does not yield
    /// exactly `size * size` items.
    pub fn from_row_major<I>(size: usize, modules: I) -> Option<Self>
    where
        I: IntoIterator<Item = Module>,
    {
        let data: BitVec = modules.into_iter().map(bool::from).collect();
        if data.len() != size * size {
            return None;
        }
        Some(Self {
            matrix: BitMatrix { data, size },
        })
    }

    /// Get the size of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.matrix.size
    }

    /// Get the module at position `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<Module> {
        self.matrix.get(i, j).map(Module::from)
    }

    /// Set the module at position `(i, j)`.
    /// # Panics
    /// Panics if position `(i, j)` is out of bounds.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: Module) {
        self.matrix.set(i, j, value.into())
    }

    /// Whether the module at `(i, j)` exists and is dark.
    #[inline]
    pub fn is_dark(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j).unwrap_or(false)
    }

    /// Get the activity of the neighbors of `(i, j)`.
    /// # Example
    /// ```
    /// use qrstyle_core::{Module, ModuleGrid, Neighbors};
    /// let grid = ModuleGrid::from_fn(3, |i, _| Module::from(i == 1));
    /// let neighbors = grid.neighbors(1, 0);
    /// assert_eq!(neighbors, Neighbors { north: false, south: false, east: true, west: false });
    /// ```
    pub fn neighbors(&self, i: usize, j: usize) -> Neighbors {
        Neighbors {
            north: i.checked_sub(1).is_some_and(|i| self.is_dark(i, j)),
            south: self.is_dark(i + 1, j),
            east: self.is_dark(i, j + 1),
            west: j.checked_sub(1).is_some_and(|j| self.is_dark(i, j)),
        }
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.matrix.data.count_ones()
    }

    /// Upper-left positions of the three finder patterns.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.size().saturating_sub(FINDER_SIZE);
        [(0, 0), (0, far), (far, 0)]
    }

    /// Whether `(i, j)` belongs to one of the finder patterns.
    /// # Example
    /// ```
    /// use qrstyle_core::{Module, ModuleGrid};
    /// let grid = ModuleGrid::filled(21, Module::Light);
    /// assert!(grid.is_finder(6, 20));
    /// assert!(!grid.is_finder(7, 7));
    /// ```
    pub fn is_finder(&self, i: usize, j: usize) -> bool {
        self.finder_origins()
            .iter()
            .any(|&(fi, fj)| (fi..fi + FINDER_SIZE).contains(&i) && (fj..fj + FINDER_SIZE).contains(&j))
    }
}

impl std::fmt::Debug for ModuleGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ModuleGrid({}) {{", self.size())?;
        for i in 0..self.size() {
            write!(f, "    ")?;
            for j in 0..self.size() {
                write!(f, "{}", if self.is_dark(i, j) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn plus_sign() -> ModuleGrid {
        ModuleGrid::from_fn(3, |i, j| Module::from(i == 1 || j == 1))
    }

    #[test]
    fn test_neighbors_inside() {
        let grid = plus_sign();
        assert_eq!(grid.neighbors(1, 1), Neighbors::SURROUNDED);
        assert_eq!(
            grid.neighbors(0, 1),
            Neighbors {
                north: false,
                south: true,
                east: false,
                west: false
            }
        );
    }

    #[test]
    fn test_neighbors_outside_are_inactive() {
        let grid = ModuleGrid::filled(1, Module::Dark);
        assert_eq!(grid.neighbors(0, 0), Neighbors::ISOLATED);
    }

    #[test]
    fn test_from_row_major() {
        let modules = [true, false, false, true].map(Module::from);
        let grid = ModuleGrid::from_row_major(2, modules).unwrap();
        assert_eq!(grid.get(0, 0), Some(Module::Dark));
        assert_eq!(grid.get(0, 1), Some(Module::Light));
        assert_eq!(grid.get(1, 1), Some(Module::Dark));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.dark_count(), 2);
        assert!(ModuleGrid::from_row_major(3, modules).is_none());
    }

    #[test]
    fn test_finder_origins() {
        let grid = ModuleGrid::filled(25, Module::Light);
        assert_eq!(grid.finder_origins(), [(0, 0), (0, 18), (18, 0)]);
        assert!(grid.is_finder(24, 6));
        assert!(!grid.is_finder(24, 24));
    }

    #[test]
    #[should_panic(expected = "index out of bounds: the size is 3 but the index is (3, 0)")]
    fn test_set_out_of_bounds() {
        plus_sign().set(3, 0, Module::Dark);
    }
}
