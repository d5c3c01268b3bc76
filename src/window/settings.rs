//! Window settings
//!
//! Configuration for window creation.

/// Settings for creating a window.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    /// Window title.
    pub title: String,
    /// Initial window size (width, height) in logical pixels.
    pub size: (u32, u32),
    /// Whether the window is resizable.
    pub resizable: bool,
    /// Whether to enable vsync.
    pub vsync: bool,
    /// Color the view is cleared to each frame (RGBA).
    pub clear_color: [f32; 4],
    /// Whether to allocate a depth attachment.
    pub depth: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Bones".to_string(),
            size: (512, 512),
            resizable: false,
            vsync: true,
            clear_color: [1.0, 0.0, 0.0, 1.0],
            depth: true,
        }
    }
}

impl WindowSettings {
    /// Create new window settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set whether the window is resizable.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set whether to enable vsync.
    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Set the clear color.
    pub fn clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Set whether to allocate a depth attachment.
    pub fn depth(mut self, depth: bool) -> Self {
        self.depth = depth;
        self
    }

    /// Aspect ratio of the initial size.
    pub fn aspect(&self) -> f32 {
        self.size.0 as f32 / self.size.1.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = WindowSettings::default();
        assert_eq!(settings.size, (512, 512));
        assert_eq!(settings.clear_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(settings.aspect(), 1.0);
    }

    #[test]
    fn test_builder() {
        let settings = WindowSettings::new()
            .title("cube")
            .size(800, 400)
            .resizable(true)
            .vsync(false)
            .clear_color([0.0, 0.0, 0.0, 1.0])
            .depth(false);
        assert_eq!(settings.title, "cube");
        assert!(settings.resizable && !settings.vsync);
        assert_eq!(settings.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(settings.aspect(), 2.0);
        assert!(!settings.depth);
    }
}
