use ratatui::style::Color;

use crate::domain::models::Role;
use crate::domain::models::ThemeName;

/// Colours used to draw the chat view for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub user: Color,
    pub assistant: Color,
    pub system: Color,
    pub pinned: Color,
}

impl Palette {
    pub fn role_colour(&self, role: Role) -> Color {
        match role {
            Role::User => return self.user,
            Role::Assistant => return self.assistant,
            Role::System => return self.system,
        }
    }
}

#[derive(Default)]
pub struct Themes {}

impl Themes {
    pub fn get(name: ThemeName) -> Palette {
        match name {
            ThemeName::Light => {
                return Palette {
                    background: Color::Rgb(250, 250, 250),
                    foreground: Color::Rgb(40, 42, 54),
                    user: Color::Rgb(37, 99, 235),
                    assistant: Color::Rgb(22, 101, 52),
                    system: Color::Rgb(138, 85, 63), // Brown
                    pinned: Color::Rgb(180, 83, 9),
                };
            }
            ThemeName::Dark => {
                return Palette {
                    background: Color::Rgb(24, 24, 27),
                    foreground: Color::Rgb(228, 228, 231),
                    user: Color::Rgb(96, 165, 250),
                    assistant: Color::Rgb(134, 239, 172),
                    system: Color::Rgb(210, 160, 120),
                    pinned: Color::Rgb(251, 191, 36),
                };
            }
        }
    }
}
