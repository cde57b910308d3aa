use std::time::Instant;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_MS: u128 = 80;

/// Braille spinner frame for a load that began at `start`.
pub fn spinner_frame(start: Option<Instant>) -> &'static str {
    let Some(start) = start else {
        return FRAMES[0];
    };
    let idx = (start.elapsed().as_millis() / FRAME_MS) as usize % FRAMES.len();
    FRAMES[idx]
}
