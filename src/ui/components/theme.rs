//! Color palettes for the search screen.
//!
//! Low-saturation bases with accents used sparingly: the search bar and
//! focused rows get the accent, selected rows get the selection tint, errors
//! and rate limits get their own status colors.

use ratatui::style::{Color, Modifier, Style};

pub mod colors {
    use ratatui::style::Color;

    // ═══════════════════════════════════════════════════════════════════════════
    // BASE COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Deep background - primary canvas color
    pub const BG_DEEP: Color = Color::Rgb(26, 27, 38); // #1a1b26

    /// Elevated surface - search bar, action row
    pub const BG_SURFACE: Color = Color::Rgb(36, 40, 59); // #24283b

    /// Cursor row
    pub const BG_HIGHLIGHT: Color = Color::Rgb(41, 46, 66); // #292e42

    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261
    pub const BORDER_FOCUS: Color = Color::Rgb(125, 145, 200); // #7d91c8

    // ═══════════════════════════════════════════════════════════════════════════
    // TEXT
    // ═══════════════════════════════════════════════════════════════════════════

    pub const TEXT_PRIMARY: Color = Color::Rgb(192, 202, 245); // #c0caf5
    /// Lightened from #565f89 to meet WCAG AA-large (3:1) contrast
    pub const TEXT_MUTED: Color = Color::Rgb(105, 114, 158); // #696e9e

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCENTS + STATUS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const ACCENT_PRIMARY: Color = Color::Rgb(122, 162, 247); // #7aa2f7

    pub const STATUS_SUCCESS: Color = Color::Rgb(115, 218, 202); // #73daca
    pub const STATUS_WARNING: Color = Color::Rgb(224, 175, 104); // #e0af68
    pub const STATUS_ERROR: Color = Color::Rgb(247, 118, 142); // #f7768e
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub accent: Color,
    pub bg: Color,
    pub fg: Color,
    pub surface: Color,
    pub hint: Color,
    pub border: Color,
    pub selected: Color,
    pub warning: Color,
    pub error: Color,
    /// Alternating stripe colors for zebra-striping results
    pub stripe_even: Color,
    pub stripe_odd: Color,
}

impl ThemePalette {
    /// Light theme - clean, minimal, professional
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(47, 107, 231),       // Rich blue
            bg: Color::Rgb(250, 250, 252),          // Off-white
            fg: Color::Rgb(36, 41, 46),             // Near-black
            surface: Color::Rgb(240, 241, 245),     // Light gray
            hint: Color::Rgb(125, 134, 144),        // Medium gray
            border: Color::Rgb(216, 222, 228),      // Border gray
            selected: Color::Rgb(45, 138, 72),      // Forest green
            warning: Color::Rgb(177, 133, 41),      // Amber
            error: Color::Rgb(200, 55, 80),         // Crimson
            stripe_even: Color::Rgb(250, 250, 252), // Same as bg
            stripe_odd: Color::Rgb(240, 241, 245),  // Slightly darker
        }
    }

    /// Dark theme - the default
    pub fn dark() -> Self {
        Self {
            accent: colors::ACCENT_PRIMARY,
            bg: colors::BG_DEEP,
            fg: colors::TEXT_PRIMARY,
            surface: colors::BG_SURFACE,
            hint: colors::TEXT_MUTED,
            border: colors::BORDER,
            selected: colors::STATUS_SUCCESS,
            warning: colors::STATUS_WARNING,
            error: colors::STATUS_ERROR,
            stripe_even: colors::BG_DEEP,       // #1a1b26
            stripe_odd: Color::Rgb(30, 32, 48), // #1e2030
        }
    }

    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint_style(self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focus_style(self) -> Style {
        Style::default().fg(colors::BORDER_FOCUS)
    }

    pub fn surface_style(self) -> Style {
        Style::default().bg(self.surface)
    }

    pub fn stripe(self, row: usize) -> Style {
        let bg = if row % 2 == 0 {
            self.stripe_even
        } else {
            self.stripe_odd
        };
        Style::default().bg(bg).fg(self.fg)
    }

    /// Cursor row
    pub fn highlight_style(self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(self) -> Style {
        Style::default().fg(self.warning)
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self::dark()
    }
}
