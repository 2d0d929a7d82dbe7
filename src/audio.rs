//! Audio port
//!
//! The simulation records events; the session turns them into named cues and
//! hands them to a `CueSink`. Playback itself (samples, synthesis) belongs to
//! whatever sink the host plugs in.

use crate::sim::GameEvent;

/// Sound cue names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player fired
    Shoot,
    /// Alien destroyed
    AlienKilled,
    /// Player hit, bomb blast or mother ship destroyed
    Explosion,
    /// Formation step, low half of the beat
    AlienMoveLow,
    /// Formation step, high half of the beat
    AlienMoveHigh,
    /// Mother ship ambient hum
    MotherShipMove,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::AlienKilled => "alien-killed",
            SoundCue::Explosion => "explosion",
            SoundCue::AlienMoveLow => "alien-move-low",
            SoundCue::AlienMoveHigh => "alien-move-high",
            SoundCue::MotherShipMove => "mothership-move",
        }
    }

    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { .. } => Some(SoundCue::Shoot),
            // A bomb's kills share the one blast cue
            GameEvent::AlienKilled { by_bomb: false, .. } => Some(SoundCue::AlienKilled),
            GameEvent::BombDetonated { .. }
            | GameEvent::PlayerHit { .. }
            | GameEvent::MotherShipHit { .. } => Some(SoundCue::Explosion),
            GameEvent::FormationStep { high_pitch: true } => Some(SoundCue::AlienMoveHigh),
            GameEvent::FormationStep { high_pitch: false } => Some(SoundCue::AlienMoveLow),
            GameEvent::MotherShipHum => Some(SoundCue::MotherShipMove),
            _ => None,
        }
    }
}

/// Fire-and-forget playback target
pub trait CueSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Sink that only logs; used when no audio backend is attached
#[derive(Debug, Default)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::trace!("cue {} at {:.2}", cue.name(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn CueSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn CueSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue; silently dropped while muted or at zero volume
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol);
    }

    /// Play the cue for an event, if any
    pub fn play_event(&mut self, event: &GameEvent) {
        if let Some(cue) = SoundCue::for_event(event) {
            self.play(cue);
        }
    }
}
