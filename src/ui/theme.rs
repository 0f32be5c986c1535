//! Palettes for the KAAL console.
//!
//! A dark and a light palette; the terminal background picks one at startup.

use kaal_types::{HealthStatus, Mode, SubsystemStatus};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Colors and styles shared by every panel.
///
/// [`Theme::auto_detect()`] asks the terminal for its background; tests pin
/// [`Theme::dark()`] so rendered buffers are stable.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Focused panel borders and the selection marker.
    pub highlight: Color,
    /// ENGINEER badge and technical headings.
    pub engineer: Color,
    /// COMMANDER badge and strategic headings.
    pub commander: Color,
    /// Recovering faults, restarting watchdog, gauges near a threshold.
    pub warning: Color,
    /// Live faults, latched safety, readings over threshold.
    pub critical: Color,
    /// Nominal readings and switched-on devices.
    pub healthy: Color,
    /// Unfocused panel frames.
    pub border: Color,
    /// Panel titles.
    pub header: Style,
    /// Row under the device cursor.
    pub selected: Style,
    /// Tab of the mounted mode.
    pub tab_active: Style,
    /// Tab of the other mode.
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Palette for dark backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            engineer: Color::Cyan,
            commander: Color::Magenta,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Palette for light backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            engineer: Color::Blue,
            commander: Color::Magenta,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Light palette on a bright terminal, dark otherwise or when the query fails.
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn status_style(&self, status: HealthStatus) -> Style {
        match status {
            HealthStatus::Healthy => Style::default().fg(self.healthy),
            HealthStatus::Warning => Style::default().fg(self.warning),
            HealthStatus::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Strip readings: standby is a warning color without bold.
    pub fn subsystem_style(&self, status: SubsystemStatus) -> Style {
        match status {
            SubsystemStatus::Online | SubsystemStatus::Normal => Style::default().fg(self.healthy),
            SubsystemStatus::Standby => Style::default().fg(self.warning),
            SubsystemStatus::Warning => Style::default().fg(self.warning).add_modifier(Modifier::BOLD),
            SubsystemStatus::Offline => Style::default().fg(self.critical),
        }
    }

    pub fn mode_style(&self, mode: Mode) -> Style {
        let color = match mode {
            Mode::Engineer => self.engineer,
            Mode::Commander => self.commander,
        };
        Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
    }

    /// Border style for a panel, brighter when it has focus.
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.highlight)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn dim(&self) -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_is_bold() {
        let theme = Theme::dark();
        let style = theme.status_style(HealthStatus::Critical);
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_modes_have_distinct_badges() {
        let theme = Theme::light();
        assert_ne!(
            theme.mode_style(Mode::Engineer).bg,
            theme.mode_style(Mode::Commander).bg
        );
    }
}
