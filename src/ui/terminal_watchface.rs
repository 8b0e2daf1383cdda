//! Terminal watchface
//!
//! Three regions styled like a shell session:
//!
//! ```text
//! root@PC:/$ date
//! Thu Mar 24 01:46
//! root@PC:/$ info
//! battery:   85%
//! connected: yes█
//! ```

use chrono::NaiveDateTime;
use core::fmt;
use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    primitives::Rectangle,
};

use super::{
    format::{self, BATTERY_LEN, CONNECTION_LEN, TIME_LEN},
    ColorMode, Layout, TextRegion, WatchFace, BACKGROUND_COLOR,
};
use crate::battery::BatteryInfo;

pub struct TerminalWatchface {
    /// Whole window
    screen: Rectangle,
    /// Window background was painted
    cleared: bool,
    /// Time label
    time_label: TextRegion<TIME_LEN>,
    /// Power indicator label
    battery_label: TextRegion<BATTERY_LEN>,
    /// Phone link label
    connection_label: TextRegion<CONNECTION_LEN>,
    cursor_visible: bool,
    cursor_dirty: bool,
}

impl TerminalWatchface {
    pub fn time_label(&self) -> &TextRegion<TIME_LEN> {
        &self.time_label
    }

    pub fn battery_label(&self) -> &TextRegion<BATTERY_LEN> {
        &self.battery_label
    }

    pub fn connection_label(&self) -> &TextRegion<CONNECTION_LEN> {
        &self.connection_label
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Cell right after the connection text
    pub fn cursor_area(&self) -> Rectangle {
        Rectangle::new(
            self.connection_label.text_end(),
            self.connection_label.cell_size(),
        )
    }

    fn draw_cursor<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        let color = if self.cursor_visible {
            self.connection_label.text_color()
        } else {
            self.connection_label.background_color()
        };
        let area = self.cursor_area();
        target
            .clipped(&self.connection_label.bounds())
            .fill_solid(&area, color)?;

        self.cursor_dirty = false;
        Ok(())
    }
}

impl WatchFace for TerminalWatchface {
    fn new(layout: &Layout) -> Self {
        Self {
            screen: layout.screen,
            cleared: false,
            time_label: TextRegion::new(layout.time, layout.font),
            battery_label: TextRegion::new(layout.battery, layout.font),
            connection_label: TextRegion::new(layout.connection, layout.font),
            cursor_visible: false,
            cursor_dirty: false,
        }
    }

    fn show_time(&mut self, time: NaiveDateTime, clock_24h: bool) -> Result<(), fmt::Error> {
        let mut buf = [0u8; TIME_LEN];
        let text = format::time_text(time, clock_24h, &mut buf)?;
        self.time_label.set_text(text)
    }

    fn show_battery(&mut self, info: BatteryInfo) -> Result<(), fmt::Error> {
        let mut buf = [0u8; BATTERY_LEN];
        let text = format::battery_text(info, &mut buf)?;
        self.battery_label.set_text(text)
    }

    fn show_connection(&mut self, connected: bool) -> Result<(), fmt::Error> {
        self.connection_label
            .set_text(format::connection_text(connected))
    }

    fn set_cursor(&mut self, visible: bool) {
        if self.cursor_visible != visible {
            self.cursor_visible = visible;
            self.cursor_dirty = true;
        }
    }

    fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        if !self.cleared {
            target.fill_solid(&self.screen, BACKGROUND_COLOR)?;
            self.time_label.mark_dirty();
            self.battery_label.mark_dirty();
            self.connection_label.mark_dirty();
            self.cleared = true;
        }

        // Redrawing the connection label wipes the cursor
        let cursor = self.cursor_dirty || (self.connection_label.is_dirty() && self.cursor_visible);

        self.time_label.draw(target)?;
        self.battery_label.draw(target)?;
        self.connection_label.draw(target)?;

        if cursor {
            self.draw_cursor(target)?;
        }
        Ok(())
    }
}
