mod layout;
mod render;

pub use layout::ReportDocument;
pub use render::{
    render_attendance, render_competitor, render_general, render_modality, render_ranking,
    render_training_hours,
};

use crate::models::PlatformSettings;

/// Branding applied to every generated document
#[derive(Debug, Clone)]
pub struct Theme {
    pub platform_name: String,
    pub primary: [f64; 3],
    pub secondary: [f64; 3],
    /// Raw logo bytes; decoding happens at render time and a decode failure
    /// just drops the logo from the header.
    pub logo: Option<Vec<u8>>,
}

impl Theme {
    pub fn from_settings(settings: &PlatformSettings, logo: Option<Vec<u8>>) -> Self {
        let fallback = Self::default();

        Self {
            platform_name: settings.platform_name.clone(),
            primary: parse_hex_color(&settings.primary_color).unwrap_or(fallback.primary),
            secondary: parse_hex_color(&settings.secondary_color).unwrap_or(fallback.secondary),
            logo,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            platform_name: "Competia".to_string(),
            primary: [0.12, 0.23, 0.37],
            secondary: [0.29, 0.44, 0.65],
            logo: None,
        }
    }
}

/// Parse a `#rrggbb` hex color into normalized RGB components
pub fn parse_hex_color(value: &str) -> Option<[f64; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    ])
}

/// Lowercase a display name into a filename-safe slug
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_sep = true;

    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }

    while slug.ends_with('_') {
        slug.pop();
    }

    slug
}
