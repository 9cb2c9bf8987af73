//! Terminal rendering with optional rich output.
//!
//! Uses termimad for inline markdown (bold headings) when color is
//! enabled, falling back to plain text with markers stripped.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renderer that switches between rich inline markdown and plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.bold.set_fg(Color::Cyan);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));
        Self { rich_enabled, skin }
    }

    pub fn rich_enabled(&self) -> bool {
        self.rich_enabled
    }

    /// Prints one line, interpreting inline markdown when rich output
    /// is enabled.
    pub fn render_line(&self, line: &str) -> Result<()> {
        if self.rich_enabled {
            self.skin.print_inline(line);
            println!();
        } else {
            println!("{}", line.replace("**", ""));
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
