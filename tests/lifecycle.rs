//! Window lifecycle: every region created on load is released on unload.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use core::fmt;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    primitives::Rectangle,
};
use pinetime_termface::{
    battery::BatteryInfo,
    config::Settings,
    ui::{ColorMode, Layout, ScreenShape, WatchFace},
    window::{self, Window, WindowState},
    App, Event, Services,
};

static CREATED: AtomicUsize = AtomicUsize::new(0);
static RELEASED: AtomicUsize = AtomicUsize::new(0);

/// Watchface counting acquisitions and releases of its three regions
struct CountingFace {
    updates: usize,
}

impl WatchFace for CountingFace {
    fn new(_layout: &Layout) -> Self {
        CREATED.fetch_add(3, Ordering::SeqCst);
        Self { updates: 0 }
    }

    fn show_time(&mut self, _time: NaiveDateTime, _clock_24h: bool) -> Result<(), fmt::Error> {
        self.updates += 1;
        Ok(())
    }

    fn show_battery(&mut self, _info: BatteryInfo) -> Result<(), fmt::Error> {
        self.updates += 1;
        Ok(())
    }

    fn show_connection(&mut self, _connected: bool) -> Result<(), fmt::Error> {
        self.updates += 1;
        Ok(())
    }

    fn set_cursor(&mut self, _visible: bool) {}

    fn draw<D>(&mut self, _target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        Ok(())
    }
}

impl Drop for CountingFace {
    fn drop(&mut self) {
        RELEASED.fetch_add(3, Ordering::SeqCst);
    }
}

struct Host;

impl Services for Host {
    fn now(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 3, 24)
            .unwrap()
            .and_hms_opt(1, 46, 0)
            .unwrap()
    }

    fn battery(&self) -> BatteryInfo {
        BatteryInfo::new(50, false)
    }

    fn is_connected(&self) -> bool {
        false
    }
}

fn layout() -> Layout {
    Layout::for_shape(
        ScreenShape::Round,
        Rectangle::new(Point::zero(), Size::new(240, 240)),
    )
}

#[test]
fn every_acquire_has_one_release() {
    let live = || CREATED.load(Ordering::SeqCst) - RELEASED.load(Ordering::SeqCst);

    let mut window = Window::<CountingFace>::new();
    let before = CREATED.load(Ordering::SeqCst);

    for _ in 0..3 {
        window.load(&layout(), true).unwrap();
        assert_eq!(live(), 3);
        // A second load acquires nothing
        assert!(window.load(&layout(), true).is_err());
        assert_eq!(live(), 3);

        window.unload().unwrap();
        assert_eq!(live(), 0);
        // No double release
        assert_eq!(window.unload(), Err(window::Error::NotLoaded));
        assert_eq!(live(), 0);
    }

    assert_eq!(window.state(), WindowState::Unloaded);
    assert_eq!(CREATED.load(Ordering::SeqCst) - before, 9);

    // Application start and stop go through the same window
    let mut app = App::<CountingFace>::new(Settings::default(), layout());
    app.start(&Host).unwrap();
    assert_eq!(live(), 3);
    // Connection, time and battery were shown once each
    assert_eq!(app.window().face().unwrap().updates, 3);

    app.handle(Event::Tick(Host.now()), &Host).unwrap();
    assert_eq!(app.window().face().unwrap().updates, 4);

    app.stop().unwrap();
    assert_eq!(live(), 0);
    assert!(app.stop().is_err());
    assert_eq!(live(), 0);
}
