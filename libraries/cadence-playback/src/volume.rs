//! Volume control with lossless mute
//!
//! Volume is a linear level in `[0, 1]` handed straight to the engine.
//! Muting drops the level to zero and remembers the last audible level so
//! unmuting restores it exactly.

/// Clamp a requested volume into `[0, 1]`
///
/// NaN maps to silence.
pub fn clamp_volume(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

/// Volume controller with lossless mute
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Output level (0.0-1.0)
    level: f32,

    /// Last non-zero level, restored on unmute
    previous: f32,

    /// Mute flag
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (0.0-1.0, default: 0.7)
    pub fn new(level: f32) -> Self {
        let mut volume = Self {
            level: 0.0,
            previous: crate::types::DEFAULT_VOLUME,
            muted: false,
        };
        volume.set_level(level);
        volume
    }

    /// Create from a UI percentage (0-100)
    pub fn from_percent(percent: u8) -> Self {
        Self::new(percent_to_level(percent))
    }

    /// Set volume level
    ///
    /// Zero mutes, anything audible unmutes and becomes the restore level.
    pub fn set_level(&mut self, level: f32) {
        let level = clamp_volume(level);
        self.level = level;
        self.muted = level == 0.0;
        if level > 0.0 {
            self.previous = level;
        }
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Current level as a UI percentage
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    /// Level restored by the next unmute
    pub fn previous(&self) -> f32 {
        self.previous
    }

    /// Toggle mute state
    ///
    /// Calling this twice restores level and mute flag exactly.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.level = self.previous;
            self.muted = false;
        } else {
            self.previous = self.level;
            self.level = 0.0;
            self.muted = true;
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_VOLUME)
    }
}

/// Map a UI percentage (0-100, clamped) onto `[0, 1]`
pub fn percent_to_level(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}
