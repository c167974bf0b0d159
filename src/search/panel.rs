use serde::{Deserialize, Serialize};

/// Viewport class, decides whether the panel toggle is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Mobile,
    #[default]
    Desktop,
}

impl Viewport {
    pub fn from_width(width_px: u32, mobile_breakpoint_px: u32) -> Self {
        if width_px < mobile_breakpoint_px {
            Viewport::Mobile
        } else {
            Viewport::Desktop
        }
    }
}

/// Open/closed state of the list next to the map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsPanel {
    open: bool,
    match_count: usize,
    viewport: Viewport,
}

impl ResultsPanel {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            open: false,
            match_count: 0,
            viewport,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// New results arrived; open exactly when there is something to show
    pub fn show_results(&mut self, match_count: usize) {
        self.match_count = match_count;
        self.open = match_count > 0;
    }

    /// Results were cleared
    pub fn reset(&mut self) {
        self.match_count = 0;
        self.open = false;
    }

    /// Manual show/hide, only offered on mobile with results present
    pub fn toggle(&mut self) -> bool {
        if self.toggle_visible() {
            self.open = !self.open;
        }
        self.open
    }

    pub fn toggle_visible(&self) -> bool {
        self.viewport == Viewport::Mobile && self.match_count > 0
    }
}
