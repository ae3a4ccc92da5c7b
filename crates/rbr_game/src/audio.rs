/// Sound effects the simulation can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Shoot,
    BulletImpact,
    EnemyHit,
    EnemyDeath,
}

impl Sound {
    pub fn file_name(self) -> &'static str {
        match self {
            Sound::Shoot => "shoot.wav",
            Sound::BulletImpact => "shoot_hit.wav",
            Sound::EnemyHit => "enemy_hit.wav",
            Sound::EnemyDeath => "monster_die.wav",
        }
    }
}

/// Fire-and-forget playback. Implementations must not block the tick.
pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

/// Records every request; used by tests to assert on effects.
impl AudioSink for Vec<Sound> {
    fn play(&mut self, sound: Sound) {
        self.push(sound);
    }
}

/// Headless sink that logs each request and keeps a tally.
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: usize,
}

impl AudioSink for LogAudio {
    fn play(&mut self, sound: Sound) {
        self.played += 1;
        log::debug!("Play sound {}", sound.file_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<Sound> = Vec::new();
        sink.play(Sound::Shoot);
        sink.play(Sound::EnemyDeath);
        assert_eq!(sink, vec![Sound::Shoot, Sound::EnemyDeath]);
    }

    #[test]
    fn log_sink_counts_requests() {
        let mut sink = LogAudio::default();
        sink.play(Sound::BulletImpact);
        sink.play(Sound::BulletImpact);
        assert_eq!(sink.played, 2);
    }
}
