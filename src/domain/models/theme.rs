#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;

use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    pub fn parse(text: &str) -> Option<ThemeName> {
        return ThemeName::iter().find(|e| return e.to_string() == text.trim());
    }

    pub fn toggle(&self) -> ThemeName {
        match self {
            ThemeName::Light => return ThemeName::Dark,
            ThemeName::Dark => return ThemeName::Light,
        }
    }

    /// Derives the preferred scheme from the `COLORFGBG` convention
    /// (`foreground;background`), where a background of 7 or 15 is a light
    /// terminal. Anything else, including an unset variable, is dark.
    pub fn from_colorfgbg(value: Option<&str>) -> ThemeName {
        let background = value
            .and_then(|e| return e.rsplit(';').next())
            .map(|e| return e.trim());

        if let Some("7") | Some("15") = background {
            return ThemeName::Light;
        }

        return ThemeName::Dark;
    }
}
