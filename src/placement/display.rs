//! Display descriptions and geometry helpers.

use crate::window::WindowGeometry;
use serde::{Deserialize, Serialize};

/// An attached display, in global coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub name: Option<String>,
    pub position: (i32, i32),
    pub size: (u32, u32),
    #[serde(default)]
    pub primary: bool,
}

impl Display {
    pub fn new(position: (i32, i32), size: (u32, u32)) -> Self {
        Self {
            name: None,
            position,
            size,
            primary: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn contains(&self, point: (i32, i32)) -> bool {
        let (x, y) = self.position;
        point.0 >= x
            && point.1 >= y
            && i64::from(point.0) < i64::from(x) + i64::from(self.size.0)
            && i64::from(point.1) < i64::from(y) + i64::from(self.size.1)
    }

    /// Area shared between this display and `bounds`
    pub fn overlap_area(&self, bounds: &WindowGeometry) -> u64 {
        let left = i64::from(self.position.0).max(i64::from(bounds.x));
        let top = i64::from(self.position.1).max(i64::from(bounds.y));
        let right = (i64::from(self.position.0) + i64::from(self.size.0))
            .min(i64::from(bounds.x) + i64::from(bounds.width));
        let bottom = (i64::from(self.position.1) + i64::from(self.size.1))
            .min(i64::from(bounds.y) + i64::from(bounds.height));
        if right <= left || bottom <= top {
            0
        } else {
            ((right - left) * (bottom - top)) as u64
        }
    }
}

/// Display used when the host reports none
pub fn fallback_display() -> Display {
    Display {
        name: None,
        position: (0, 0),
        size: (1920, 1080),
        primary: true,
    }
}

/// The primary display, or the first one
pub fn primary_display(displays: &[Display]) -> Option<&Display> {
    displays.iter().find(|d| d.primary).or(displays.first())
}

/// Display holding the largest share of `bounds`; `None` when off-screen
pub fn display_matching<'a>(
    displays: &'a [Display],
    bounds: &WindowGeometry,
) -> Option<&'a Display> {
    displays
        .iter()
        .map(|d| (d, d.overlap_area(bounds)))
        .filter(|(_, area)| *area > 0)
        .max_by_key(|(_, area)| *area)
        .map(|(d, _)| d)
}

/// Clamp a window so it is at least partially visible on `display`.
///
/// The size shrinks to fit the display and at least 100px stay visible on
/// each axis. The display mode is preserved.
pub fn clamp_to_display(geometry: WindowGeometry, display: &Display) -> WindowGeometry {
    let width = geometry.width.min(display.size.0).max(1);
    let height = geometry.height.min(display.size.1).max(1);

    let min_visible = 100i32;
    let (dx, dy) = display.position;
    let x = geometry
        .x
        .max(dx - width as i32 + min_visible)
        .min(dx + display.size.0 as i32 - min_visible);
    let y = geometry
        .y
        .max(dy - height as i32 + min_visible)
        .min(dy + display.size.1 as i32 - min_visible);

    WindowGeometry {
        x,
        y,
        width,
        height,
        mode: geometry.mode,
    }
}
