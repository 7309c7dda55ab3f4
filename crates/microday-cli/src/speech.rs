//! Spoken cues through an external speech command (`say` on macOS).

use microday_core::storage::AnnounceConfig;
use microday_core::Cue;
use tracing::{debug, warn};

/// Something that can tell the user an item is about to start.
pub trait Announcer {
    fn announce(&mut self, cue: Cue, description: &str);
}

/// Announcer that does nothing, used when speech is disabled.
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&mut self, cue: Cue, description: &str) {
        debug!(?cue, description, "cue (silent)");
    }
}

/// Spawns the configured speech command without waiting for it.
pub struct SayAnnouncer {
    config: AnnounceConfig,
    failed: bool,
}

impl SayAnnouncer {
    pub fn new(config: AnnounceConfig) -> Self {
        Self {
            config,
            failed: false,
        }
    }

    fn phrase(&self, cue: Cue, description: &str) -> String {
        let template = match cue {
            Cue::OneMinute => &self.config.one_minute_template,
            Cue::Now => &self.config.now_template,
        };
        template.replace("{task}", description)
    }
}

impl Announcer for SayAnnouncer {
    fn announce(&mut self, cue: Cue, description: &str) {
        if self.failed {
            return;
        }

        let mut command = tokio::process::Command::new(&self.config.command);
        if !self.config.voice.is_empty() {
            command.arg("-v").arg(&self.config.voice);
        }
        command.arg(self.phrase(cue, description));

        match command.spawn() {
            Ok(_) => debug!(?cue, description, "spoke cue"),
            Err(e) => {
                // Only warn once; a missing binary will not appear mid-session.
                warn!(command = %self.config.command, error = %e, "speech command failed, muting");
                self.failed = true;
            }
        }
    }
}

/// Pick the announcer for the configuration.
pub fn announcer(config: &AnnounceConfig) -> Box<dyn Announcer> {
    if config.enabled {
        Box::new(SayAnnouncer::new(config.clone()))
    } else {
        Box::new(SilentAnnouncer)
    }
}
