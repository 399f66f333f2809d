use log::debug;

/// Smallest merge value with a dedicated audio cue.
pub const MIN_CUE: u32 = 2;
/// Largest merge value with a dedicated audio cue; bigger merges stay
/// silent (the cue bank ends here).
pub const MAX_CUE: u32 = 4096;

/// Cue identifier for a merge value: one cue per power of two in
/// `MIN_CUE..=MAX_CUE`, `None` outside the bank.
pub fn cue_for(value: u32) -> Option<String> {
    (value.is_power_of_two() && (MIN_CUE..=MAX_CUE).contains(&value))
        .then(|| format!("effect-{value}"))
}

/// Plays audio cues addressed by merge value. Real backends own their
/// playback state (e.g. skipping a cue that is still sounding).
pub trait CuePlayer {
    fn play(&mut self, value: u32);
}

/// Backend-less player that logs the cue it would have played.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCues;

impl CuePlayer for LogCues {
    fn play(&mut self, value: u32) {
        if let Some(cue) = cue_for(value) {
            debug!("cue {cue}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_addresses_cues_by_merge_value() {
        assert_eq!(cue_for(2).as_deref(), Some("effect-2"));
        assert_eq!(cue_for(2048).as_deref(), Some("effect-2048"));
        assert_eq!(cue_for(4096).as_deref(), Some("effect-4096"));
    }

    #[test]
    fn it_stays_silent_outside_the_bank() {
        assert_eq!(cue_for(8192), None);
        assert_eq!(cue_for(6), None);
        assert_eq!(cue_for(0), None);
        assert_eq!(cue_for(1), None);
    }
}
