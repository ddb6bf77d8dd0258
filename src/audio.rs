/// Cues emitted by the interactive surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    GestureComplete,
    OverlayClose,
    OverlayOpen,
    Toggle,
}

/// Playback seam. A sink that cannot produce audio simply does nothing;
/// cue delivery must never fail.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// The shipped sink: logs the cue instead of producing audio.
#[derive(Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("Audio cue: {:?}", cue);
    }
}

/// Gates every cue on the mute preference before it reaches the sink.
pub struct Sounds {
    sink: Box<dyn AudioSink>,
}

impl Sounds {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self { sink }
    }

    pub fn play(&mut self, cue: SoundCue, muted: bool) {
        if !muted {
            self.sink.play(cue);
        }
    }
}
