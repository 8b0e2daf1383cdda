//! Region geometry for the supported panel shapes

use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::MonoFont,
    primitives::Rectangle,
};
use profont::{PROFONT_12_POINT, PROFONT_14_POINT};

/// Form factor of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenShape {
    /// Square panel, e.g. the PineTime's 240x240 ST7789
    Rect,
    /// Round panel, text kept inside the inscribed circle
    Round,
}

/// Position and font of the three display regions
#[derive(Clone, Copy)]
pub struct Layout {
    /// Shape the layout was computed for
    pub shape: ScreenShape,
    /// Whole window
    pub screen: Rectangle,
    /// Time region (two lines)
    pub time: Rectangle,
    /// Battery region (two lines)
    pub battery: Rectangle,
    /// Connection region (one line)
    pub connection: Rectangle,
    /// Font shared by all regions
    pub font: &'static MonoFont<'static>,
}

/// Left margin, region tops and region heights of one shape
struct Geometry {
    margin: u32,
    tops: [i32; 3],
    heights: [u32; 3],
}

const RECT_GEOMETRY: Geometry = Geometry {
    margin: 5,
    tops: [50, 100, 150],
    heights: [40, 40, 20],
};

const ROUND_GEOMETRY: Geometry = Geometry {
    margin: 40,
    tops: [60, 104, 148],
    heights: [36, 36, 20],
};

impl Layout {
    /// Compute the layout of `shape` inside the window `screen`
    pub fn for_shape(shape: ScreenShape, screen: Rectangle) -> Self {
        let (geometry, font, inset_right) = match shape {
            ScreenShape::Rect => (&RECT_GEOMETRY, &PROFONT_14_POINT, 0),
            ScreenShape::Round => (&ROUND_GEOMETRY, &PROFONT_12_POINT, ROUND_GEOMETRY.margin),
        };

        let width = screen
            .size
            .width
            .saturating_sub(geometry.margin + inset_right);
        let region = |i: usize| {
            Rectangle::new(
                screen.top_left + Point::new(geometry.margin as i32, geometry.tops[i]),
                Size::new(width, geometry.heights[i]),
            )
        };

        Self {
            shape,
            screen,
            time: region(0),
            battery: region(1),
            connection: region(2),
            font,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(240, 240))
    }

    #[test]
    fn square_layout() {
        let layout = Layout::for_shape(ScreenShape::Rect, screen());
        assert_eq!(layout.shape, ScreenShape::Rect);
        assert_eq!(layout.time, Rectangle::new(Point::new(5, 50), Size::new(235, 40)));
        assert_eq!(layout.battery, Rectangle::new(Point::new(5, 100), Size::new(235, 40)));
        assert_eq!(layout.connection, Rectangle::new(Point::new(5, 150), Size::new(235, 20)));
        assert_eq!(layout.font.character_size, PROFONT_14_POINT.character_size);
    }

    #[test]
    fn round_layout_is_inset() {
        let layout = Layout::for_shape(ScreenShape::Round, screen());
        assert_eq!(layout.time, Rectangle::new(Point::new(40, 60), Size::new(160, 36)));
        assert_eq!(layout.battery, Rectangle::new(Point::new(40, 104), Size::new(160, 36)));
        assert_eq!(layout.connection, Rectangle::new(Point::new(40, 148), Size::new(160, 20)));
        assert_eq!(layout.font.character_size, PROFONT_12_POINT.character_size);
    }

    #[test]
    fn shape_selection_is_deterministic() {
        for shape in [ScreenShape::Rect, ScreenShape::Round] {
            let a = Layout::for_shape(shape, screen());
            let b = Layout::for_shape(shape, screen());
            assert_eq!(a.time, b.time);
            assert_eq!(a.battery, b.battery);
            assert_eq!(a.connection, b.connection);
            assert_eq!(a.font.character_size, b.font.character_size);
        }
    }

    #[test]
    fn regions_stay_on_screen_and_do_not_overlap() {
        for shape in [ScreenShape::Rect, ScreenShape::Round] {
            let layout = Layout::for_shape(shape, screen());
            let regions = [layout.time, layout.battery, layout.connection];
            for region in regions {
                assert_eq!(layout.screen.intersection(&region), region);
            }
            for pair in regions.windows(2) {
                assert!(pair[0].intersection(&pair[1]).is_zero_sized());
            }
        }
    }

    #[test]
    fn each_shape_has_its_own_font() {
        let rect = Layout::for_shape(ScreenShape::Rect, screen());
        let round = Layout::for_shape(ScreenShape::Round, screen());
        assert_ne!(rect.font.character_size, round.font.character_size);
        assert!(round.font.character_size.width < rect.font.character_size.width);
    }

    #[test]
    fn two_lines_fit_the_two_line_regions() {
        for shape in [ScreenShape::Rect, ScreenShape::Round] {
            let layout = Layout::for_shape(shape, screen());
            let line_height = layout.font.character_size.height;
            assert!(layout.time.size.height >= 2 * line_height);
            assert!(layout.battery.size.height >= 2 * line_height);
            assert!(layout.connection.size.height >= line_height);
        }
    }

    #[test]
    fn longest_line_fits_the_region_width() {
        // "Thu Mar 24 01:46 PM"
        for shape in [ScreenShape::Rect, ScreenShape::Round] {
            let layout = Layout::for_shape(shape, screen());
            let advance = layout.font.character_size.width + layout.font.character_spacing;
            assert!(19 * advance <= layout.time.size.width);
        }
    }
}
