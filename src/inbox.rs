//! Event delivery to the watchface
//!
//! Producers push events into a bounded queue. Settings travel beside it in a
//! signal that keeps only the latest value, so a full queue can delay other
//! events but never loses a preference change.

use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, TrySendError},
    signal::Signal,
};

use crate::{app::Event, config::Settings};

pub struct Inbox<M: RawMutex, const N: usize> {
    events: Channel<M, Event, N>,
    settings: Signal<M, Settings>,
}

impl<M: RawMutex, const N: usize> Inbox<M, N> {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            settings: Signal::new(),
        }
    }

    /// Queue an event, waiting for space
    pub async fn send(&self, event: Event) {
        self.events.send(event).await
    }

    /// Queue an event if there is space
    pub fn try_send(&self, event: Event) -> Result<(), TrySendError<Event>> {
        self.events.try_send(event)
    }

    /// Replace the pending settings. Never blocks and never drops the latest
    /// value.
    pub fn update_settings(&self, settings: Settings) {
        self.settings.signal(settings);
    }

    /// Next event for the watchface. Pending settings go first.
    pub async fn receive(&self) -> Event {
        if let Some(settings) = self.settings.try_take() {
            return Event::Settings(settings);
        }
        match select(self.settings.wait(), self.events.receive()).await {
            Either::First(settings) => Event::Settings(settings),
            Either::Second(event) => event,
        }
    }
}

impl<M: RawMutex, const N: usize> Default for Inbox<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn settings_survive_a_full_queue() {
        let inbox = Inbox::<NoopRawMutex, 4>::new();
        for _ in 0..4 {
            inbox.try_send(Event::Blink).unwrap();
        }
        assert!(inbox.try_send(Event::Blink).is_err());

        let twelve_hour = Settings {
            clock_24h: false,
            ..Settings::default()
        };
        inbox.update_settings(twelve_hour);

        assert_eq!(block_on(inbox.receive()), Event::Settings(twelve_hour));
        for _ in 0..4 {
            assert_eq!(block_on(inbox.receive()), Event::Blink);
        }
    }

    #[test]
    fn latest_settings_win() {
        let inbox = Inbox::<NoopRawMutex, 4>::new();
        let quiet = Settings {
            vibrate_on_disconnect: false,
            ..Settings::default()
        };
        let still = Settings {
            blink_cursor: false,
            ..quiet
        };
        inbox.update_settings(quiet);
        inbox.update_settings(still);
        inbox.try_send(Event::Connection(true)).unwrap();

        assert_eq!(block_on(inbox.receive()), Event::Settings(still));
        assert_eq!(block_on(inbox.receive()), Event::Connection(true));
    }

    #[test]
    fn events_keep_their_order() {
        let inbox = Inbox::<NoopRawMutex, 4>::new();
        block_on(inbox.send(Event::Connection(false)));
        block_on(inbox.send(Event::Blink));
        assert_eq!(block_on(inbox.receive()), Event::Connection(false));
        assert_eq!(block_on(inbox.receive()), Event::Blink);
    }
}
