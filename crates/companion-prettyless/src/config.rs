/// Layout of printed declarations.
///
/// Generated code is indented with spaces only; `max_width` decides when a
/// group may stay on one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Spaces per nesting level of a member block.
    pub tab_spaces: usize,
    pub max_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_spaces: 4,
            max_width: 120,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_tab_spaces(mut self, tab_spaces: usize) -> Self {
        self.tab_spaces = tab_spaces;
        self
    }
}
