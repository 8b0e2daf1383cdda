//! Display region
//!
//! A rectangle on the screen rendering a text with a font and colors. The text
//! lives in a fixed buffer that is overwritten in place.

use core::fmt;
use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    geometry::{Point, Size},
    mono_font::{MonoFont, MonoTextStyleBuilder},
    primitives::Rectangle,
    text::{Baseline, Text},
    Drawable,
};

use super::{ColorMode, BACKGROUND_COLOR, TEXT_COLOR};

pub struct TextRegion<const N: usize> {
    /// Area covered by the region
    bounds: Rectangle,
    background: ColorMode,
    text_color: ColorMode,
    font: &'static MonoFont<'static>,
    /// Text buffer, valid UTF-8 up to `len`
    str_buf: [u8; N],
    len: usize,
    /// Needs to be redrawn
    dirty: bool,
}

impl<const N: usize> TextRegion<N> {
    /// Create new empty region
    pub fn new(bounds: Rectangle, font: &'static MonoFont<'static>) -> Self {
        Self {
            bounds,
            background: BACKGROUND_COLOR,
            text_color: TEXT_COLOR,
            font,
            str_buf: [0; N],
            len: 0,
            dirty: true,
        }
    }

    /// Replace the text. Fails without touching the current text if it
    /// exceeds the capacity.
    pub fn set_text(&mut self, text: &str) -> Result<(), fmt::Error> {
        if text.len() > N {
            return Err(fmt::Error);
        }
        if text != self.text() {
            self.str_buf[..text.len()].copy_from_slice(text.as_bytes());
            self.len = text.len();
            self.dirty = true;
        }
        Ok(())
    }

    /// Replace the text with formatted output, bounded by the capacity
    pub fn set_fmt(&mut self, args: fmt::Arguments) -> Result<(), fmt::Error> {
        let mut scratch = [0u8; N];
        let text = format_no_std::show(&mut scratch, args)?;
        self.set_text(text)
    }

    /// Current text
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or("")
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn text_color(&self) -> ColorMode {
        self.text_color
    }

    pub fn background_color(&self) -> ColorMode {
        self.background
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a redraw on the next `draw`
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Size of one character cell including spacing
    pub fn cell_size(&self) -> Size {
        Size::new(
            self.font.character_size.width + self.font.character_spacing,
            self.font.character_size.height,
        )
    }

    /// Top left corner of the cell following the last character
    pub fn text_end(&self) -> Point {
        let text = self.text();
        let line = text.rsplit('\n').next().unwrap_or("");
        let lines = text.matches('\n').count();
        let cell = self.cell_size();

        self.bounds.top_left
            + Point::new(
                (line.chars().count() as u32 * cell.width) as i32,
                (lines as u32 * cell.height) as i32,
            )
    }

    /// Clear the region and render the text if it changed
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        if !self.dirty {
            return Ok(());
        }

        let mut clipped = target.clipped(&self.bounds);
        clipped.fill_solid(&self.bounds, self.background)?;

        let style = MonoTextStyleBuilder::new()
            .font(self.font)
            .text_color(self.text_color)
            .background_color(self.background)
            .build();
        Text::with_baseline(self.text(), self.bounds.top_left, style, Baseline::Top)
            .draw(&mut clipped)?;

        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use profont::PROFONT_14_POINT;

    fn region<const N: usize>() -> TextRegion<N> {
        TextRegion::new(
            Rectangle::new(Point::new(0, 0), Size::new(64, 40)),
            &PROFONT_14_POINT,
        )
    }

    #[test]
    fn text_is_bounded_by_capacity() {
        let mut label = region::<4>();
        assert_eq!(label.set_text("100%"), Ok(()));
        assert_eq!(label.text(), "100%");
        assert_eq!(label.set_text("1000%"), Err(fmt::Error));
        // Old text survives a failed update
        assert_eq!(label.text(), "100%");
    }

    #[test]
    fn formatting_is_bounded_by_capacity() {
        let mut label = region::<8>();
        assert_eq!(label.set_fmt(format_args!("{}:{:02}", 1, 5)), Ok(()));
        assert_eq!(label.text(), "1:05");
        assert_eq!(label.set_fmt(format_args!("{}", "too long for it")), Err(fmt::Error));
        assert_eq!(label.text(), "1:05");
    }

    #[test]
    fn identical_text_does_not_dirty() {
        let mut label = region::<16>();
        label.set_text("connected: no").unwrap();
        let mut display = MockDisplay::<ColorMode>::new();
        display.set_allow_overdraw(true);
        label.draw(&mut display).unwrap();
        assert!(!label.is_dirty());

        label.set_text("connected: no").unwrap();
        assert!(!label.is_dirty());
        label.set_text("connected: yes").unwrap();
        assert!(label.is_dirty());
    }

    #[test]
    fn draw_clears_background_inside_bounds() {
        let mut label = region::<16>();
        label.set_text("").unwrap();
        let mut display = MockDisplay::<ColorMode>::new();
        display.set_allow_overdraw(true);
        label.draw(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(BACKGROUND_COLOR));
        assert_eq!(display.get_pixel(Point::new(63, 39)), Some(BACKGROUND_COLOR));
        // Outside the region
        assert_eq!(display.get_pixel(Point::new(63, 40)), None);
    }

    #[test]
    fn text_end_follows_last_line() {
        let mut label = region::<32>();
        label.set_text("ab\ncdef").unwrap();
        let cell = label.cell_size();
        assert_eq!(
            label.text_end(),
            Point::new(4 * cell.width as i32, cell.height as i32)
        );
    }
}
