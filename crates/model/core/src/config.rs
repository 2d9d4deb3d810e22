/// Render configuration: how the printable reconstruction is laid out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfig {
    /// Spaces added per open scenario block.
    pub indent_width: usize,
    /// Replace auto-companion commands with a synthesized `<command> Auto ! <comment>` line.
    pub auto_companion: bool,
    /// Part categories treated as auto-companion files.
    pub auto_categories: Vec<String>,
    /// Terminator appended to each line by [`crate::ModelFile::render_text`].
    pub line_ending: String,
}

impl RenderConfig {
    pub const DEFAULT_INDENT_WIDTH: usize = 4;
    pub const DEFAULT_AUTO_CATEGORY: &'static str = "ecf";
    pub const DEFAULT_LINE_ENDING: &'static str = "\n";

    pub fn new() -> Self {
        Self {
            indent_width: Self::DEFAULT_INDENT_WIDTH,
            auto_companion: false,
            auto_categories: vec![Self::DEFAULT_AUTO_CATEGORY.to_string()],
            line_ending: Self::DEFAULT_LINE_ENDING.to_string(),
        }
    }

    pub fn with_auto_companion(mut self, enabled: bool) -> Self {
        self.auto_companion = enabled;
        self
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Returns true if parts of `category` are rendered as auto-companion lines.
    pub fn is_auto_category(&self, category: &str) -> bool {
        self.auto_companion
            && self
                .auto_categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}
