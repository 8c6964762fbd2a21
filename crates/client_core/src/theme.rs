const TEAL_PRIMARY: &str = "#4A969B";
const PURPLE_ACCENT: &str = "#A370A4";
const LIGHT_BACKGROUND: &str = "#E5F1F1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Named colors used by every screen, as `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub background: &'static str,
    pub tint: &'static str,
    pub tab_icon_default: &'static str,
    pub tab_icon_selected: &'static str,
    pub card_background: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub muted: &'static str,
    pub danger: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
}

static LIGHT: Palette = Palette {
    text: "#1f2937",
    background: LIGHT_BACKGROUND,
    tint: TEAL_PRIMARY,
    tab_icon_default: "#9ca3af",
    tab_icon_selected: TEAL_PRIMARY,
    card_background: "#ffffff",
    primary: TEAL_PRIMARY,
    secondary: PURPLE_ACCENT,
    muted: "#6b7280",
    danger: "#ef4444",
    success: "#10b981",
    warning: "#f59e0b",
};

static DARK: Palette = Palette {
    text: "#f9fafb",
    background: "#111827",
    tint: TEAL_PRIMARY,
    tab_icon_default: "#6b7280",
    tab_icon_selected: TEAL_PRIMARY,
    card_background: "#1f2937",
    primary: TEAL_PRIMARY,
    secondary: PURPLE_ACCENT,
    muted: "#9ca3af",
    danger: "#f87171",
    success: "#34d399",
    warning: "#fbbf24",
};

impl Theme {
    /// Resolves a light/dark preference; anything unrecognized is `Light`.
    pub fn from_preference(preference: Option<&str>) -> Self {
        match preference.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }
}

/// Splits `#rrggbb` into its channels.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_preference_falls_back_to_light() {
        assert_eq!(Theme::from_preference(None), Theme::Light);
        assert_eq!(Theme::from_preference(Some("sepia")), Theme::Light);
        assert_eq!(Theme::from_preference(Some(" Dark ")), Theme::Dark);
    }

    #[test]
    fn both_palettes_share_brand_colors() {
        let light = Theme::Light.palette();
        let dark = Theme::Dark.palette();
        assert_eq!(light.primary, dark.primary);
        assert_eq!(light.secondary, "#A370A4");
        assert_ne!(light.background, dark.background);
    }

    #[test]
    fn every_palette_color_is_valid_hex() {
        for theme in [Theme::Light, Theme::Dark] {
            let p = theme.palette();
            for color in [
                p.text,
                p.background,
                p.tint,
                p.tab_icon_default,
                p.tab_icon_selected,
                p.card_background,
                p.primary,
                p.secondary,
                p.muted,
                p.danger,
                p.success,
                p.warning,
            ] {
                assert!(hex_to_rgb(color).is_some(), "bad color {color}");
            }
        }
        assert_eq!(hex_to_rgb("#4A969B"), Some((0x4a, 0x96, 0x9b)));
        assert_eq!(hex_to_rgb("4A969B"), None);
    }
}
