//! Geometry for newly created and restored windows.
//!
//! Placement is a pure function of the hints it is given: the attached
//! displays, the cursor, the last active window and the top-left corners of
//! every open window. New default-sized windows never spawn exactly on top
//! of an existing window; they step down and right until the spot is free.

pub mod display;

pub use display::{Display, clamp_to_display, display_matching, fallback_display, primary_display};

use crate::window::{DisplayMode, WindowGeometry};
use par_windows_config::NewWindowDimensions;

/// Diagonal step applied while a spawn position is taken
pub const OVERLAP_STEP: i32 = 30;

/// Inputs for one placement decision
#[derive(Debug, Clone, Default)]
pub struct PlacementHints<'a> {
    pub displays: &'a [Display],
    pub cursor: Option<(i32, i32)>,
    /// Geometry of the last active window, if any
    pub last_active: Option<WindowGeometry>,
    /// Top-left corners of every open window
    pub occupied: &'a [(i32, i32)],
    /// Persisted UI state of a window being restored
    pub restored: Option<WindowGeometry>,
}

#[derive(Debug, Clone)]
pub struct PlacementEngine {
    dimensions: NewWindowDimensions,
    default_size: (u32, u32),
    global_menu_bar: bool,
}

impl PlacementEngine {
    pub fn new(dimensions: NewWindowDimensions, default_size: (u32, u32), global_menu_bar: bool) -> Self {
        Self {
            dimensions,
            default_size,
            global_menu_bar,
        }
    }

    /// Geometry for a window about to be created
    pub fn place_new_window(&self, hints: &PlacementHints<'_>) -> WindowGeometry {
        if let Some(restored) = hints.restored {
            return self.place_restored(restored, hints);
        }

        let fallback = fallback_display();
        let display = self.select_display(hints).unwrap_or(&fallback);

        match self.dimensions {
            NewWindowDimensions::Maximized => {
                self.centered(display).with_mode(DisplayMode::Maximized)
            }
            NewWindowDimensions::Fullscreen => {
                self.centered(display).with_mode(DisplayMode::Fullscreen)
            }
            NewWindowDimensions::Inherit => match hints.last_active {
                // A fullscreen window only passes on its mode
                Some(last) if last.mode == DisplayMode::Fullscreen => {
                    self.centered(display).with_mode(DisplayMode::Fullscreen)
                }
                Some(last) => avoid_overlap(last, hints.occupied),
                None => avoid_overlap(self.centered(display), hints.occupied),
            },
            NewWindowDimensions::Default => avoid_overlap(self.centered(display), hints.occupied),
        }
    }

    /// Display a new window should appear on
    pub fn select_display<'a>(&self, hints: &PlacementHints<'a>) -> Option<&'a Display> {
        if hints.displays.is_empty() {
            return None;
        }
        if self.global_menu_bar
            && let Some(cursor) = hints.cursor
            && let Some(display) = hints.displays.iter().find(|d| d.contains(cursor))
        {
            return Some(display);
        }
        if let Some(last) = hints.last_active
            && let Some(display) = display_matching(hints.displays, &last)
        {
            return Some(display);
        }
        primary_display(hints.displays)
    }

    fn place_restored(&self, restored: WindowGeometry, hints: &PlacementHints<'_>) -> WindowGeometry {
        let fallback = fallback_display();
        let display = display_matching(hints.displays, &restored)
            .or_else(|| primary_display(hints.displays))
            .unwrap_or(&fallback);
        let clamped = clamp_to_display(restored, display);
        if clamped != restored {
            log::debug!(
                "Clamped restored window from {:?} to {:?}",
                restored,
                clamped
            );
        }
        clamped
    }

    fn centered(&self, display: &Display) -> WindowGeometry {
        let width = self.default_size.0.min(display.size.0);
        let height = self.default_size.1.min(display.size.1);
        let x = display.position.0 + ((display.size.0 - width) / 2) as i32;
        let y = display.position.1 + ((display.size.1 - height) / 2) as i32;
        WindowGeometry::new(x, y, width, height)
    }
}

/// Step `geometry` diagonally until its top-left corner is not occupied
fn avoid_overlap(mut geometry: WindowGeometry, occupied: &[(i32, i32)]) -> WindowGeometry {
    while occupied.contains(&geometry.top_left()) {
        geometry.x += OVERLAP_STEP;
        geometry.y += OVERLAP_STEP;
    }
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(dimensions: NewWindowDimensions) -> PlacementEngine {
        PlacementEngine::new(dimensions, (1024, 768), false)
    }

    fn single_display() -> Vec<Display> {
        vec![Display::new((0, 0), (1920, 1080)).primary()]
    }

    #[test]
    fn test_default_is_centered_on_primary() {
        let displays = single_display();
        let hints = PlacementHints {
            displays: &displays,
            ..Default::default()
        };
        let geometry = engine(NewWindowDimensions::Default).place_new_window(&hints);
        assert_eq!(geometry, WindowGeometry::new(448, 156, 1024, 768));
    }

    #[test]
    fn test_overlap_steps_diagonally() {
        let displays = single_display();
        let occupied = vec![(448, 156), (478, 186)];
        let hints = PlacementHints {
            displays: &displays,
            occupied: &occupied,
            ..Default::default()
        };
        let geometry = engine(NewWindowDimensions::Default).place_new_window(&hints);
        assert_eq!(geometry.top_left(), (508, 216));
    }

    #[test]
    fn test_maximized_and_fullscreen_modes() {
        let displays = single_display();
        let hints = PlacementHints {
            displays: &displays,
            ..Default::default()
        };
        assert_eq!(
            engine(NewWindowDimensions::Maximized)
                .place_new_window(&hints)
                .mode,
            DisplayMode::Maximized
        );
        assert_eq!(
            engine(NewWindowDimensions::Fullscreen)
                .place_new_window(&hints)
                .mode,
            DisplayMode::Fullscreen
        );
    }

    #[test]
    fn test_inherit_copies_last_active_with_overlap_avoidance() {
        let displays = single_display();
        let last = WindowGeometry::new(10, 20, 700, 500).with_mode(DisplayMode::Maximized);
        let occupied = vec![(10, 20)];
        let hints = PlacementHints {
            displays: &displays,
            last_active: Some(last),
            occupied: &occupied,
            ..Default::default()
        };
        let geometry = engine(NewWindowDimensions::Inherit).place_new_window(&hints);
        assert_eq!(
            geometry,
            WindowGeometry::new(40, 50, 700, 500).with_mode(DisplayMode::Maximized)
        );
    }

    #[test]
    fn test_inherit_from_fullscreen_recomputes_position() {
        let displays = single_display();
        let last = WindowGeometry::new(0, 0, 1920, 1080).with_mode(DisplayMode::Fullscreen);
        let hints = PlacementHints {
            displays: &displays,
            last_active: Some(last),
            ..Default::default()
        };
        let geometry = engine(NewWindowDimensions::Inherit).place_new_window(&hints);
        assert_eq!(geometry.mode, DisplayMode::Fullscreen);
        assert_eq!((geometry.width, geometry.height), (1024, 768));
        assert_eq!(geometry.top_left(), (448, 156));
    }

    #[test]
    fn test_display_follows_cursor_with_global_menu_bar() {
        let displays = vec![
            Display::new((0, 0), (1920, 1080)).primary(),
            Display::new((1920, 0), (2560, 1440)),
        ];
        let hints = PlacementHints {
            displays: &displays,
            cursor: Some((2000, 10)),
            ..Default::default()
        };
        let with_menu_bar = PlacementEngine::new(NewWindowDimensions::Default, (1024, 768), true);
        assert_eq!(with_menu_bar.select_display(&hints), Some(&displays[1]));
        assert_eq!(
            engine(NewWindowDimensions::Default).select_display(&hints),
            Some(&displays[0])
        );
    }

    #[test]
    fn test_display_follows_last_active_window() {
        let displays = vec![
            Display::new((0, 0), (1920, 1080)).primary(),
            Display::new((1920, 0), (2560, 1440)),
        ];
        let hints = PlacementHints {
            displays: &displays,
            last_active: Some(WindowGeometry::new(2100, 100, 800, 600)),
            ..Default::default()
        };
        let geometry = engine(NewWindowDimensions::Default).place_new_window(&hints);
        assert_eq!(geometry.top_left(), (1920 + 768, 336));
    }

    #[test]
    fn test_no_displays_uses_fallback() {
        let geometry = engine(NewWindowDimensions::Default).place_new_window(&PlacementHints::default());
        assert_eq!((geometry.width, geometry.height), (1024, 768));
    }

    #[test]
    fn test_restored_state_is_clamped_and_keeps_mode() {
        let displays = single_display();
        let restored = WindowGeometry::new(5000, 100, 800, 600).with_mode(DisplayMode::Fullscreen);
        let hints = PlacementHints {
            displays: &displays,
            restored: Some(restored),
            ..Default::default()
        };
        let geometry = engine(NewWindowDimensions::Default).place_new_window(&hints);
        assert_eq!(geometry.x, 1820);
        assert_eq!(geometry.mode, DisplayMode::Fullscreen);
    }

    #[test]
    fn test_small_display_shrinks_default_size() {
        let displays = vec![Display::new((0, 0), (800, 600)).primary()];
        let hints = PlacementHints {
            displays: &displays,
            ..Default::default()
        };
        let geometry = engine(NewWindowDimensions::Default).place_new_window(&hints);
        assert_eq!(geometry, WindowGeometry::new(0, 0, 800, 600));
    }
}
