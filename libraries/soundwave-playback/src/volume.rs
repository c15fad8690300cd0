//! Volume control
//!
//! The level is linear in `[0.0, 1.0]` and handed to the resource as-is.
//! Muting keeps the level so unmuting restores it.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume level (0.0 - 1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level`
    pub fn new(level: f32) -> Self {
        Self {
            level: clamp_level(level),
            muted: false,
        }
    }

    /// Set volume level (0.0 - 1.0)
    ///
    /// Does not unmute.
    pub fn set_level(&mut self, level: f32) {
        self.level = clamp_level(level);
    }

    /// Get current volume level (0.0 - 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set volume from a percentage (0 - 100)
    pub fn set_percent(&mut self, percent: u8) {
        self.set_level(f32::from(percent.min(100)) / 100.0);
    }

    /// Volume level as a percentage (0 - 100)
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores the previous level)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level to apply to the resource
    ///
    /// Returns 0.0 if muted.
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
