use log::info;

use twenty48_grid::engine::{Observer, Snapshot, Tile};

use crate::cues::CuePlayer;
use crate::flavor;
use crate::haptics::{self, Buzzer};
use crate::score::ScoreBoard;
use crate::store::{Debounced, SavedState};

/// Overlay shown over the grid. While one is visible the front ignores
/// move input; the engine only sees moves again once the player
/// acknowledges it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Start,
    Win,
    WinAndOver,
    Over,
}

/// Collaborator hub: one engine observer routing notifications to scoring,
/// persistence, audio and haptics, and tracking the message overlay.
pub struct Shell {
    pub scores: ScoreBoard,
    store: Debounced,
    cues: Box<dyn CuePlayer>,
    buzzer: Box<dyn Buzzer>,
    message: Option<Message>,
    skip_next_buzz: bool,
}

impl Shell {
    /// `resuming` suppresses the start overlay and the haptic tick of the
    /// very first tile sync (nothing the player did caused it).
    pub fn new(
        scores: ScoreBoard,
        store: Debounced,
        cues: Box<dyn CuePlayer>,
        buzzer: Box<dyn Buzzer>,
        resuming: bool,
    ) -> Self {
        Self {
            scores,
            store,
            cues,
            buzzer,
            message: (!resuming).then_some(Message::Start),
            skip_next_buzz: resuming,
        }
    }

    pub fn message(&self) -> Option<Message> {
        self.message
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }

    /// Reset for a fresh grid: score back to zero (best survives), overlay
    /// down, and the little fanfare cue.
    pub fn begin_new_game(&mut self) {
        self.scores.new_game();
        self.message = None;
        self.skip_next_buzz = false;
        self.cues.play(2);
    }
}

impl Observer for Shell {
    fn tiles_changed(&mut self, _tiles: &[Tile]) {
        if self.skip_next_buzz {
            self.skip_next_buzz = false;
            return;
        }
        self.buzzer.vibrate(&haptics::short(1));
    }

    fn score_added(&mut self, points: u32) {
        self.scores.add(points);
    }

    fn largest_merge(&mut self, value: u32) {
        info!("merged up to {} ({})", value, flavor::label_for(value));
        self.cues.play(value);
        self.buzzer.vibrate(&haptics::short(2));
    }

    fn game_over(&mut self) {
        self.buzzer.vibrate(&haptics::long());
        self.message = Some(Message::Over);
    }

    fn goal_reached(&mut self, terminal: bool) {
        self.buzzer.vibrate(&haptics::long());
        self.message = Some(if terminal {
            Message::WinAndOver
        } else {
            Message::Win
        });
    }

    fn state_changed(&mut self, state: Option<&Snapshot>) {
        self.store.push(SavedState {
            best: self.scores.best(),
            score: if state.is_some() { self.scores.score() } else { 0 },
            game: state.map(|s| s.to_vec()),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;
    use crate::store::StateStore;

    #[derive(Clone, Default)]
    struct RecCues(Rc<RefCell<Vec<u32>>>);

    impl CuePlayer for RecCues {
        fn play(&mut self, value: u32) {
            self.0.borrow_mut().push(value);
        }
    }

    #[derive(Clone, Default)]
    struct RecBuzzer(Rc<RefCell<Vec<Vec<u32>>>>);

    impl Buzzer for RecBuzzer {
        fn vibrate(&mut self, pattern: &[u32]) {
            self.0.borrow_mut().push(pattern.to_vec());
        }
    }

    fn shell_in(dir: &std::path::Path, resuming: bool) -> (Shell, RecCues, RecBuzzer) {
        let store = StateStore::new(dir).unwrap();
        let cues = RecCues::default();
        let buzzer = RecBuzzer::default();
        let shell = Shell::new(
            ScoreBoard::default(),
            Debounced::new(store, Duration::from_millis(5)),
            Box::new(cues.clone()),
            Box::new(buzzer.clone()),
            resuming,
        );
        (shell, cues, buzzer)
    }

    #[test]
    fn it_routes_merges_to_cues_and_buzzer() {
        let dir = tempdir().unwrap();
        let (mut shell, cues, buzzer) = shell_in(dir.path(), false);
        shell.largest_merge(128);
        assert_eq!(cues.0.borrow().as_slice(), &[128]);
        assert_eq!(buzzer.0.borrow().as_slice(), &[vec![5, 5, 5]]);
    }

    #[test]
    fn it_tracks_message_overlays() {
        let dir = tempdir().unwrap();
        let (mut shell, _, buzzer) = shell_in(dir.path(), false);
        assert_eq!(shell.message(), Some(Message::Start));
        shell.dismiss();
        shell.goal_reached(false);
        assert_eq!(shell.message(), Some(Message::Win));
        shell.game_over();
        assert_eq!(shell.message(), Some(Message::Over));
        assert_eq!(buzzer.0.borrow().len(), 2, "one long buzz per overlay");
    }

    #[test]
    fn it_skips_the_first_tick_when_resuming() {
        let dir = tempdir().unwrap();
        let (mut shell, _, buzzer) = shell_in(dir.path(), true);
        assert_eq!(shell.message(), None, "resume shows no start overlay");
        shell.tiles_changed(&[]);
        assert!(buzzer.0.borrow().is_empty());
        shell.tiles_changed(&[]);
        assert_eq!(buzzer.0.borrow().as_slice(), &[vec![5]]);
    }

    #[test]
    fn it_persists_current_best_and_zeroes_dead_games() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        let (mut shell, _, _) = shell_in(dir.path(), false);
        shell.score_added(300);
        let live = [1u8; 16];
        shell.state_changed(Some(&live));
        shell.state_changed(None);
        // Dropping the shell flushes the debounced writer.
        drop(shell);
        let saved = store.load();
        assert_eq!(saved.best, 300);
        assert_eq!(saved.score, 0, "terminal games persist no running score");
        assert_eq!(saved.game, None);
    }

    #[test]
    fn it_resets_score_but_not_best_on_new_game() {
        let dir = tempdir().unwrap();
        let (mut shell, cues, _) = shell_in(dir.path(), false);
        shell.score_added(64);
        shell.begin_new_game();
        assert_eq!(shell.scores.score(), 0);
        assert_eq!(shell.scores.best(), 64);
        assert_eq!(shell.message(), None);
        assert_eq!(cues.0.borrow().as_slice(), &[2], "new game plays the opening cue");
    }
}
