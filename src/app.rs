//! Watchface application
//!
//! [`App`] is the application context: it owns the window and reacts to the
//! events delivered by the host runtime. Each event runs to completion before
//! the next one is handled.

use chrono::NaiveDateTime;
use embedded_graphics::draw_target::DrawTarget;

use crate::{
    battery::BatteryInfo,
    config::Settings,
    connection::{LinkMonitor, LinkTransition},
    ui::{ColorMode, Layout, TerminalWatchface, WatchFace},
    window::{self, Window},
};

/// Synchronous peeks into the host services
pub trait Services {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;

    /// Current battery state
    fn battery(&self) -> BatteryInfo;

    /// Whether the phone is connected
    fn is_connected(&self) -> bool;
}

/// Events delivered by the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A new minute started
    Tick(NaiveDateTime),
    /// Battery state changed
    Battery(BatteryInfo),
    /// Phone link changed
    Connection(bool),
    /// Half period of the cursor animation elapsed
    Blink,
    /// Preferences were changed
    Settings(Settings),
}

#[allow(unused)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Pulse length in milliseconds
pub enum PulseLength {
    /// 200ms pulse
    SHORT = 200,
    /// 400 ms pulse
    LONG = 400,
}

/// What the host has to do after an event, besides redrawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    None,
    /// Pulse the vibration motor `count` times
    Vibrate(PulseLength, u8),
}

pub struct App<F = TerminalWatchface> {
    layout: Layout,
    settings: Settings,
    window: Window<F>,
    link: LinkMonitor,
    /// Cursor phase of the blink animation
    cursor_on: bool,
}

impl<F: WatchFace> App<F> {
    pub fn new(settings: Settings, layout: Layout) -> Self {
        Self {
            layout,
            settings,
            window: Window::new(),
            link: LinkMonitor::new(),
            cursor_on: false,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn window(&self) -> &Window<F> {
        &self.window
    }

    /// Whether the cursor animation needs `Blink` events
    pub fn wants_blink(&self) -> bool {
        self.settings.blink_cursor && self.window.is_loaded()
    }

    /// Push the window and show the initial time and battery state
    pub fn start<S: Services>(&mut self, services: &S) -> Result<(), Error> {
        let connected = services.is_connected();
        self.link.update(connected);
        self.window.load(&self.layout, connected)?;
        info!("Watchface started");

        // Display time at the start
        self.show_time(services.now())?;
        self.show_battery(services.battery())?;
        Ok(())
    }

    /// Destroy the window
    pub fn stop(&mut self) -> Result<(), Error> {
        self.window.unload()?;
        info!("Watchface stopped");
        Ok(())
    }

    /// Dispatch one event to its handler
    pub fn handle<S: Services>(&mut self, event: Event, services: &S) -> Result<Action, Error> {
        match event {
            Event::Tick(time) => self.show_time(time)?,
            Event::Battery(info) => self.show_battery(info)?,
            Event::Connection(connected) => return self.handle_connection(connected),
            Event::Blink => self.blink(),
            Event::Settings(settings) => self.apply_settings(settings, services)?,
        }
        Ok(Action::None)
    }

    /// Draw the changed parts of the window
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        match self.window.face_mut() {
            Some(face) => face.draw(target),
            None => Ok(()),
        }
    }

    fn show_time(&mut self, time: NaiveDateTime) -> Result<(), Error> {
        let clock_24h = self.settings.clock_24h;
        if let Some(face) = self.window.face_mut() {
            face.show_time(time, clock_24h)?;
        }
        Ok(())
    }

    fn show_battery(&mut self, info: BatteryInfo) -> Result<(), Error> {
        debug!("Battery: {}% charging={}", info.percent, info.charging);
        if let Some(face) = self.window.face_mut() {
            face.show_battery(info)?;
        }
        Ok(())
    }

    fn handle_connection(&mut self, connected: bool) -> Result<Action, Error> {
        if let Some(face) = self.window.face_mut() {
            face.show_connection(connected)?;
        }

        match self.link.update(connected) {
            LinkTransition::Disconnected if self.settings.vibrate_on_disconnect => {
                info!("Phone disconnected");
                Ok(Action::Vibrate(PulseLength::LONG, 2))
            }
            _ => Ok(Action::None),
        }
    }

    fn blink(&mut self) {
        if !self.settings.blink_cursor {
            return;
        }
        self.cursor_on = !self.cursor_on;
        let cursor_on = self.cursor_on;
        if let Some(face) = self.window.face_mut() {
            face.set_cursor(cursor_on);
        }
    }

    fn apply_settings<S: Services>(&mut self, settings: Settings, services: &S) -> Result<(), Error> {
        let previous = self.settings;
        self.settings = settings;

        if previous.clock_24h != settings.clock_24h {
            self.show_time(services.now())?;
        }
        if !settings.blink_cursor {
            self.cursor_on = false;
            if let Some(face) = self.window.face_mut() {
                face.set_cursor(false);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Invalid window transition
    Window(window::Error),
    /// Text exceeded its buffer
    Format,
}

impl From<window::Error> for Error {
    fn from(error: window::Error) -> Self {
        Error::Window(error)
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::Format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ScreenShape;
    use chrono::NaiveDate;
    use embedded_graphics::{
        geometry::{Point, Size},
        primitives::Rectangle,
    };

    struct Host {
        now: NaiveDateTime,
        battery: BatteryInfo,
        connected: bool,
    }

    impl Services for Host {
        fn now(&self) -> NaiveDateTime {
            self.now
        }

        fn battery(&self) -> BatteryInfo {
            self.battery
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    fn host() -> Host {
        Host {
            now: NaiveDate::from_ymd_opt(2016, 3, 24)
                .unwrap()
                .and_hms_opt(13, 46, 0)
                .unwrap(),
            battery: BatteryInfo::new(85, false),
            connected: true,
        }
    }

    fn app(settings: Settings) -> App {
        App::new(
            settings,
            Layout::for_shape(
                ScreenShape::Rect,
                Rectangle::new(Point::zero(), Size::new(240, 240)),
            ),
        )
    }

    fn face(app: &App) -> &TerminalWatchface {
        app.window().face().unwrap()
    }

    #[test]
    fn start_renders_all_regions() {
        let mut app = app(Settings::default());
        app.start(&host()).unwrap();

        assert_eq!(face(&app).time_label().text(), "root@PC:/$ date\nThu Mar 24 13:46");
        assert_eq!(face(&app).battery_label().text(), "root@PC:/$ info\nbattery:   85%");
        assert_eq!(face(&app).connection_label().text(), "connected: yes");
    }

    #[test]
    fn events_update_their_region() {
        let host = host();
        let mut app = app(Settings::default());
        app.start(&host).unwrap();

        let later = host.now + chrono::Duration::minutes(1);
        assert_eq!(app.handle(Event::Tick(later), &host), Ok(Action::None));
        assert_eq!(face(&app).time_label().text(), "root@PC:/$ date\nThu Mar 24 13:47");

        app.handle(Event::Battery(BatteryInfo::new(85, true)), &host).unwrap();
        assert_eq!(face(&app).battery_label().text(), "root@PC:/$ info\nbattery:   N/A");
    }

    #[test]
    fn disconnect_vibrates_once() {
        let host = host();
        let mut app = app(Settings::default());
        app.start(&host).unwrap();

        assert_eq!(
            app.handle(Event::Connection(false), &host),
            Ok(Action::Vibrate(PulseLength::LONG, 2))
        );
        assert_eq!(face(&app).connection_label().text(), "connected: no");
        assert_eq!(app.handle(Event::Connection(false), &host), Ok(Action::None));
        assert_eq!(app.handle(Event::Connection(true), &host), Ok(Action::None));
    }

    #[test]
    fn disconnect_vibration_can_be_disabled() {
        let host = host();
        let mut app = app(Settings {
            vibrate_on_disconnect: false,
            ..Settings::default()
        });
        app.start(&host).unwrap();
        assert_eq!(app.handle(Event::Connection(false), &host), Ok(Action::None));
    }

    #[test]
    fn switching_to_12h_rerenders_time() {
        let host = host();
        let mut app = app(Settings::default());
        app.start(&host).unwrap();

        let settings = Settings {
            clock_24h: false,
            ..Settings::default()
        };
        app.handle(Event::Settings(settings), &host).unwrap();
        assert_eq!(app.settings(), settings);
        assert_eq!(face(&app).time_label().text(), "root@PC:/$ date\nThu Mar 24 01:46 PM");
    }

    #[test]
    fn blink_toggles_cursor_while_enabled() {
        let host = host();
        let mut app = app(Settings::default());
        app.start(&host).unwrap();
        assert!(!face(&app).is_cursor_visible());

        app.handle(Event::Blink, &host).unwrap();
        assert!(face(&app).is_cursor_visible());
        app.handle(Event::Blink, &host).unwrap();
        assert!(!face(&app).is_cursor_visible());
        app.handle(Event::Blink, &host).unwrap();

        let settings = Settings {
            blink_cursor: false,
            ..Settings::default()
        };
        app.handle(Event::Settings(settings), &host).unwrap();
        assert!(!face(&app).is_cursor_visible());
        app.handle(Event::Blink, &host).unwrap();
        assert!(!face(&app).is_cursor_visible());
    }

    #[test]
    fn blink_events_only_wanted_while_blinking() {
        let host = host();
        let mut app = app(Settings::default());
        assert!(!app.wants_blink());
        app.start(&host).unwrap();
        assert!(app.wants_blink());

        let still = Settings {
            blink_cursor: false,
            ..Settings::default()
        };
        app.handle(Event::Settings(still), &host).unwrap();
        assert!(!app.wants_blink());
        app.handle(Event::Settings(Settings::default()), &host).unwrap();
        assert!(app.wants_blink());

        app.stop().unwrap();
        assert!(!app.wants_blink());
    }

    #[test]
    fn events_after_stop_are_ignored() {
        let host = host();
        let mut app = app(Settings::default());
        app.start(&host).unwrap();
        app.stop().unwrap();

        assert!(app.window().face().is_none());
        assert_eq!(app.handle(Event::Tick(host.now), &host), Ok(Action::None));
        assert_eq!(app.handle(Event::Blink, &host), Ok(Action::None));
        assert_eq!(app.stop(), Err(Error::Window(window::Error::NotLoaded)));
    }

    #[test]
    fn starting_twice_is_rejected() {
        let host = host();
        let mut app = app(Settings::default());
        app.start(&host).unwrap();
        assert_eq!(
            app.start(&host),
            Err(Error::Window(window::Error::AlreadyLoaded))
        );
    }
}
