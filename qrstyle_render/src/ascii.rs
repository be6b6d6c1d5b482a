use std::io::Write;

use qrstyle_core::{Module, ModuleGrid};

/// Renders a module grid as text, two characters per module.
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    light_pattern: Box<str>,
    dark_pattern: Box<str>,
    border: usize,
}

impl AsciiRenderer {
    /// Construct a new [AsciiRenderer] that uses "██" to render dark modules and "  " to print light ones, without
    /// a quiet zone.
    pub fn new() -> Self {
        Self {
            light_pattern: "  ".into(),
            dark_pattern: "██".into(),
            border: 0,
        }
    }

    /// Set the light module `pattern` to be used when rendering.
    pub fn with_light_pattern(mut self, pattern: &str) -> Self {
        self.light_pattern = pattern.into();
        self
    }

    /// Set the dark module `pattern` to be used when rendering.
    pub fn with_dark_pattern(mut self, pattern: &str) -> Self {
        self.dark_pattern = pattern.into();
        self
    }

    /// Surround the symbol with `border` light modules.
    pub fn with_border(mut self, border: usize) -> Self {
        self.border = border;
        self
    }

    /// Invert the light and dark patterns. Useful on terminals with a dark background.
    pub fn inverted(mut self) -> Self {
        std::mem::swap(&mut self.light_pattern, &mut self.dark_pattern);
        self
    }

    pub fn light_pattern(&self) -> &str {
        self.light_pattern.as_ref()
    }

    pub fn dark_pattern(&self) -> &str {
        self.dark_pattern.as_ref()
    }

    /// Render the `grid` into `output`.
    /// # Example
    /// ```
    /// use qrstyle_core::{Module, ModuleGrid};
    /// use qrstyle_render::AsciiRenderer;
    /// let grid = ModuleGrid::from_fn(2, |i, j| Module::from(i == j));
    /// let mut out = Vec::new();
    /// AsciiRenderer::new().with_dark_pattern("#").with_light_pattern(".").render(&mut out, &grid).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "#.\n.#\n");
    /// ```
    pub fn render<G, W>(&self, output: &mut W, grid: G) -> std::io::Result<()>
    where
        G: AsRef<ModuleGrid>,
        W: Write,
    {
        let grid = grid.as_ref();
        let border = self.border;
        let side = grid.size() + 2 * border;
        for row in 0..side {
            for col in 0..side {
                let module = row
                    .checked_sub(border)
                    .zip(col.checked_sub(border))
                    .and_then(|(i, j)| grid.get(i, j))
                    .unwrap_or(Module::Light);
                let pattern = match module {
                    Module::Dark => self.dark_pattern(),
                    Module::Light => self.light_pattern(),
                };
                write!(output, "{}", pattern)?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}
