//! Parrot/neon theme tokens for the Bandscope TUI.
//!
//! Chart specs carry CSS-style color strings; [`chart_color`] maps them onto
//! terminal colors so the band keeps its green/blue/red/gold reading.

use ratatui::style::{Color, Modifier, Style};

use bandscope_core::{Severity, ValuationZone};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn severity(severity: Severity) -> Style {
    match severity {
        Severity::Error => negative().add_modifier(Modifier::BOLD),
        Severity::Warning => warning(),
    }
}

/// Cheap side reads as good news, expensive side as bad.
pub fn zone_color(zone: ValuationZone) -> Color {
    match zone {
        ValuationZone::BelowCheap => POSITIVE,
        ValuationZone::CheapToFair => ACCENT,
        ValuationZone::FairToExpensive => WARNING,
        ValuationZone::AboveExpensive => NEGATIVE,
    }
}

/// Map a named or `#rrggbb` color onto a terminal color.
pub fn chart_color(name: &str) -> Color {
    match name.trim().to_ascii_lowercase().as_str() {
        "green" => Color::Green,
        "blue" => Color::Blue,
        "red" => Color::Red,
        "yellow" | "gold" => Color::Yellow,
        hex => parse_hex(hex).unwrap_or(TEXT_SECONDARY),
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_chart_colors() {
        assert_eq!(chart_color("green"), Color::Green);
        assert_eq!(chart_color(" Red "), Color::Red);
    }

    #[test]
    fn hex_chart_colors() {
        assert_eq!(chart_color("#f1c40f"), Color::Rgb(0xf1, 0xc4, 0x0f));
        assert_eq!(chart_color("#FFFFFF"), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn unknown_colors_fall_back() {
        assert_eq!(chart_color("#12"), TEXT_SECONDARY);
        assert_eq!(chart_color("chartreuse"), TEXT_SECONDARY);
        assert_eq!(chart_color("#zzzzzz"), TEXT_SECONDARY);
    }

    #[test]
    fn zone_colors_run_cheap_to_expensive() {
        assert_eq!(zone_color(ValuationZone::BelowCheap), POSITIVE);
        assert_eq!(zone_color(ValuationZone::AboveExpensive), NEGATIVE);
    }

    #[test]
    fn panel_styles_follow_focus() {
        assert_eq!(panel_border(true), accent());
        assert_eq!(panel_border(false), muted());
    }
}
