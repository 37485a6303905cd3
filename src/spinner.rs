//! Loading indicator on stderr, driven by the desk's busy counter.

use frontdesk_core::BusyCounter;
use std::io::Write;
use std::time::Duration;

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const TICK: Duration = Duration::from_millis(120);

/// What to draw on each tick.
#[derive(Debug, Default)]
struct Indicator {
    frame: usize,
    shown: bool,
}

impl Indicator {
    /// Text to write for this tick, or `None` when nothing changes on screen.
    fn tick(&mut self, busy: bool) -> Option<String> {
        if busy {
            let glyph = FRAMES[self.frame % FRAMES.len()];
            self.frame += 1;
            self.shown = true;
            Some(format!("\r{glyph} working"))
        } else if self.shown {
            self.shown = false;
            self.frame = 0;
            Some("\r         \r".to_string())
        } else {
            None
        }
    }
}

/// Spins while any operation holds a busy guard. Abort the handle to stop it.
pub fn spawn(busy: BusyCounter) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut indicator = Indicator::default();
        let mut ticker = tokio::time::interval(TICK);
        loop {
            ticker.tick().await;
            if let Some(text) = indicator.tick(busy.is_busy()) {
                let mut stderr = std::io::stderr();
                let _ = write!(stderr, "{text}");
                let _ = stderr.flush();
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_while_busy_and_clears_once_settled() {
        let busy = BusyCounter::new();
        let mut indicator = Indicator::default();

        assert_eq!(indicator.tick(busy.is_busy()), None);

        let guard = busy.begin();
        assert_eq!(indicator.tick(busy.is_busy()).as_deref(), Some("\r| working"));
        assert_eq!(indicator.tick(busy.is_busy()).as_deref(), Some("\r/ working"));

        drop(guard);
        assert_eq!(
            indicator.tick(busy.is_busy()).as_deref(),
            Some("\r         \r")
        );
        assert_eq!(indicator.tick(busy.is_busy()), None);
    }
}
