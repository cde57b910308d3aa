use tracing::debug;

use super::ThemeVariant;

/// Luma above which the terminal background counts as light.
const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

/// Guess the variant from the terminal background; dark when the terminal
/// doesn't answer.
pub fn detect_terminal_theme() -> ThemeVariant {
    match terminal_light::luma() {
        Ok(luma) if luma > LIGHT_LUMA_THRESHOLD => ThemeVariant::Light,
        Ok(_) => ThemeVariant::Dark,
        Err(e) => {
            debug!(error = %e, "terminal background detection failed");
            ThemeVariant::Dark
        }
    }
}
