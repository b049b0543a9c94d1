// Event module - Terminal event polling for the run loop

use crossterm::event::{self, Event};
use std::time::Duration;

/// How long one loop iteration waits for input before redrawing.
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Wait up to `timeout` for the next terminal event.
pub fn next_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
