use ratatui::style::Color;

use super::{ResolvedTheme, ThemeVariant};

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => monokai(),
        ThemeVariant::Light => default_light(),
    }
}

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

fn monokai() -> ResolvedTheme {
    ResolvedTheme {
        name: "monokai".to_string(),
        variant: ThemeVariant::Dark,
        foreground: hex(0xF8F8F2),
        foreground_dim: hex(0x75715E),
        border: hex(0x75715E),
        primary: hex(0xA6E22E),
        error: hex(0xF92672),
        input_active: hex(0xE6DB74),
        video_title: hex(0xF8F8F2),
        video_stats: hex(0xE6DB74),
        comment_author: hex(0x66D9EF),
        comment_time: hex(0x75715E),
        comment_likes: hex(0xA6E22E),
        comment_text: hex(0xF8F8F2),
        status_bar_bg: hex(0xA6E22E),
        status_bar_fg: hex(0x272822),
        spinner: hex(0xE6DB74),
    }
}

fn default_light() -> ResolvedTheme {
    ResolvedTheme {
        name: "default-light".to_string(),
        variant: ThemeVariant::Light,
        foreground: Color::Black,
        foreground_dim: Color::DarkGray,
        border: Color::DarkGray,
        primary: Color::Blue,
        error: Color::Red,
        input_active: Color::Blue,
        video_title: Color::Black,
        video_stats: Color::DarkGray,
        comment_author: Color::Blue,
        comment_time: Color::DarkGray,
        comment_likes: Color::Green,
        comment_text: Color::Black,
        status_bar_bg: Color::Blue,
        status_bar_fg: Color::White,
        spinner: Color::Blue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_splits_channels() {
        assert_eq!(hex(0xF92672), Color::Rgb(0xF9, 0x26, 0x72));
    }
}
