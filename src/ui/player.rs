use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPhase {
    Idle,
    Prompted,
    Playing,
    Paused,
    Ended,
}

/// Instructions for the audio element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    Seek(f64),
}

/// Native events from the audio element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    Play,
    Pause,
    TimeUpdate { current: f64 },
    LoadedMetadata { duration: f64 },
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub phase: PlayerPhase,
    pub prompt_visible: bool,
    pub transport_visible: bool,
    pub icon: &'static str,
    /// Progress bar width, 0..=100.
    pub progress_pct: f64,
    pub elapsed: String,
    pub total: String,
}

/// Transport UI for the single audio clip on the page.
#[derive(Debug, Default)]
pub struct AudioPlayer {
    mounted: bool,
    transport_visible: bool,
    playing: bool,
    ended: bool,
    current: f64,
    duration: f64,
}

impl AudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The audio element and its prompt are on the page.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn phase(&self) -> PlayerPhase {
        if !self.mounted {
            PlayerPhase::Idle
        } else if !self.transport_visible {
            PlayerPhase::Prompted
        } else if self.ended {
            PlayerPhase::Ended
        } else if self.playing {
            PlayerPhase::Playing
        } else {
            PlayerPhase::Paused
        }
    }

    /// Click on the "listen" prompt: show the transport and start playing.
    pub fn click_prompt(&mut self) -> Vec<MediaCommand> {
        if !self.mounted || self.transport_visible {
            return vec![];
        }
        self.transport_visible = true;
        vec![MediaCommand::Play]
    }

    pub fn toggle(&mut self) -> Vec<MediaCommand> {
        if !self.transport_visible {
            return vec![];
        }
        if self.playing {
            vec![MediaCommand::Pause]
        } else {
            vec![MediaCommand::Play]
        }
    }

    /// Click on the progress track at `offset_x` of a track `width` wide.
    pub fn click_track(&mut self, offset_x: f64, width: f64) -> Vec<MediaCommand> {
        if !self.transport_visible || width <= 0.0 || !self.duration.is_finite() || self.duration <= 0.0 {
            return vec![];
        }
        let fraction = (offset_x / width).clamp(0.0, 1.0);
        let target = fraction * self.duration;
        self.current = target;
        vec![MediaCommand::Seek(target)]
    }

    /// Close the transport: pause and go back to the prompt.
    pub fn close(&mut self) -> Vec<MediaCommand> {
        if !self.transport_visible {
            return vec![];
        }
        self.transport_visible = false;
        vec![MediaCommand::Pause]
    }

    pub fn on_media(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Play => {
                self.playing = true;
                self.ended = false;
            }
            MediaEvent::Pause => self.playing = false,
            MediaEvent::TimeUpdate { current } => {
                if current.is_finite() && current >= 0.0 {
                    self.current = current;
                }
            }
            MediaEvent::LoadedMetadata { duration } => {
                if duration.is_finite() && duration >= 0.0 {
                    self.duration = duration;
                }
            }
            MediaEvent::Ended => {
                self.playing = false;
                self.ended = true;
                self.current = 0.0;
            }
        }
    }

    pub fn view(&self) -> PlayerView {
        let progress_pct = if self.duration > 0.0 {
            (self.current / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        PlayerView {
            phase: self.phase(),
            prompt_visible: self.mounted && !self.transport_visible,
            transport_visible: self.transport_visible,
            icon: if self.playing { "fa-pause" } else { "fa-play" },
            progress_pct,
            elapsed: format_time(self.current),
            total: format_time(self.duration),
        }
    }
}

/// `m:ss`, with non-finite or negative input shown as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
