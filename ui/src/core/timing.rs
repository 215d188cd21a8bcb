//! Frame timing for animated exports.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSchedule {
    pub duration_secs: u32,
    pub fps: u32,
}

impl FrameSchedule {
    pub fn new(duration_secs: u32, fps: u32) -> Self {
        Self { duration_secs, fps }
    }

    pub fn total_frames(&self) -> u32 {
        self.duration_secs.saturating_mul(self.fps)
    }

    /// Display time of one frame, rounded to the nearest 10 ms since GIF
    /// delays are stored in centiseconds.
    pub fn frame_delay_ms(&self) -> u32 {
        if self.fps == 0 {
            0
        } else {
            (1000 + self.fps * 5) / (self.fps * 10) * 10
        }
    }
}

impl Default for FrameSchedule {
    fn default() -> Self {
        Self::new(2, 15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_thirty_frames() {
        let schedule = FrameSchedule::default();
        assert_eq!(schedule.total_frames(), 30);
        assert_eq!(schedule.frame_delay_ms(), 70);
    }

    #[test]
    fn delays_round_to_whole_centiseconds() {
        assert_eq!(FrameSchedule::new(1, 10).frame_delay_ms(), 100);
        assert_eq!(FrameSchedule::new(1, 24).frame_delay_ms(), 40);
        assert_eq!(FrameSchedule::new(1, 30).frame_delay_ms(), 30);
        assert_eq!(FrameSchedule::new(1, 3).frame_delay_ms(), 330);
    }

    #[test]
    fn zero_fps_yields_no_frames() {
        let schedule = FrameSchedule::new(3, 0);
        assert_eq!(schedule.total_frames(), 0);
        assert_eq!(schedule.frame_delay_ms(), 0);
    }
}
