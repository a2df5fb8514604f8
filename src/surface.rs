//! Presentation surface seam.
//!
//! The surface owns the only cross-invocation state in the system: the
//! most recently displayed text. Copy-to-clipboard and show/hide belong
//! to the host surface implementation, not the core.

use tracing::info;

pub trait PresentationSurface: Send {
    /// Display a composed result or error message
    fn present(&mut self, text: &str);

    /// Most recently displayed text, if any
    fn last_text(&self) -> Option<&str>;
}

/// Console-backed surface used by the driver binary
#[derive(Default)]
pub struct ConsoleSurface {
    last: Option<String>,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSurface for ConsoleSurface {
    fn present(&mut self, text: &str) {
        println!("----------------------------------------");
        println!("{text}");
        println!("----------------------------------------");
        info!("Presented {} chars", text.chars().count());
        self.last = Some(text.to_string());
    }

    fn last_text(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_retains_last_text() {
        let mut surface = ConsoleSurface::new();
        assert!(surface.last_text().is_none());

        surface.present("first");
        surface.present("second");
        assert_eq!(surface.last_text(), Some("second"));
    }
}
