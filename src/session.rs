// Session controller: the ordered image list, the cursor into it and the
// in-progress drag rectangle. Pointer events arrive as named transitions so
// the whole state machine is testable without a UI toolkit.

use std::path::{Path, PathBuf};

/// Crop box in original-image pixel coordinates, corners ordered so that
/// `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Filename for the saved crop: `cropped_{x1}_{y1}-{x2}_{y2}_{name}`.
    pub fn output_name(&self, source: &Path) -> String {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "cropped_{}_{}-{}_{}_{}",
            self.x1, self.y1, self.x2, self.y2, name
        )
    }

    /// Default destination: the derived name beside the source file.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        match source.parent() {
            Some(dir) => dir.join(self.output_name(source)),
            None => PathBuf::from(self.output_name(source)),
        }
    }
}

/// Drag rectangle capture: Idle -> Dragging -> Idle. Coordinates are display
/// pixels; conversion to original pixels happens once, on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drag {
    Idle,
    Dragging {
        start: (f32, f32),
        current: (f32, f32),
    },
}

pub struct Session {
    files: Vec<PathBuf>,
    index: usize,
    drag: Drag,
}

impl Session {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            index: 0,
            drag: Drag::Idle,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.index
    }

    pub fn current_path(&self) -> &Path {
        &self.files[self.index]
    }

    /// Move the cursor by `delta` with wraparound. A single-element set wraps
    /// onto itself, which is harmless.
    pub fn advance(&mut self, delta: i32) {
        let len = self.files.len() as i64;
        self.index = (self.index as i64 + delta as i64).rem_euclid(len) as usize;
        self.drag = Drag::Idle;
    }

    /// Drop the current entry from the set and clamp the cursor. Returns the
    /// removed path; the caller is responsible for the filesystem side.
    pub fn remove_current(&mut self) -> PathBuf {
        let removed = self.files.remove(self.index);
        if !self.files.is_empty() {
            self.index %= self.files.len();
        } else {
            self.index = 0;
        }
        self.drag = Drag::Idle;
        removed
    }

    // --- drag transitions -------------------------------------------------

    /// Pointer down: anchor a new rectangle, replacing any previous one.
    pub fn press(&mut self, x: f32, y: f32) {
        self.drag = Drag::Dragging {
            start: (x, y),
            current: (x, y),
        };
    }

    /// Pointer move while held: track the far corner. Returns the live
    /// display-pixel size of the rectangle for the status line.
    pub fn motion(&mut self, x: f32, y: f32) -> Option<(u32, u32)> {
        match &mut self.drag {
            Drag::Dragging { start, current } => {
                *current = (x, y);
                let w = (x - start.0).abs() as u32;
                let h = (y - start.1).abs() as u32;
                Some((w, h))
            }
            Drag::Idle => None,
        }
    }

    /// Pointer up: order the corners, clamp to the display bounds, map to
    /// original pixels by dividing by `scale` and truncating. Zero-area boxes
    /// and releases without a preceding press produce nothing.
    pub fn release(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        display_w: f32,
        display_h: f32,
    ) -> Option<CropBox> {
        let Drag::Dragging { start, .. } = self.drag else {
            // Stray release event, e.g. a click that started outside the canvas.
            return None;
        };
        self.drag = Drag::Idle;

        let x1 = start.0.min(x).clamp(0.0, display_w);
        let y1 = start.1.min(y).clamp(0.0, display_h);
        let x2 = start.0.max(x).clamp(0.0, display_w);
        let y2 = start.1.max(y).clamp(0.0, display_h);

        let boxed = CropBox {
            x1: (x1 / scale) as u32,
            y1: (y1 / scale) as u32,
            x2: (x2 / scale) as u32,
            y2: (y2 / scale) as u32,
        };

        if boxed.x1 == boxed.x2 || boxed.y1 == boxed.y2 {
            return None;
        }
        Some(boxed)
    }

    /// Secondary-button cancel: clear the rectangle without producing a crop.
    pub fn cancel(&mut self) {
        self.drag = Drag::Idle;
    }

    /// Rectangle corners for rendering, if a drag is active.
    pub fn drag_rect(&self) -> Option<((f32, f32), (f32, f32))> {
        match self.drag {
            Drag::Dragging { start, current } => Some((start, current)),
            Drag::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(n: usize) -> Session {
        let files = (0..n)
            .map(|i| PathBuf::from(format!("/pics/img{i}.png")))
            .collect();
        Session::new(files)
    }

    #[test]
    fn advance_wraps_in_both_directions() {
        let mut s = session(3);
        s.advance(-1);
        assert_eq!(s.cursor(), 2);
        s.advance(1);
        assert_eq!(s.cursor(), 0);
        s.advance(1);
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn advance_len_times_is_identity() {
        let mut s = session(5);
        s.advance(2);
        let start = s.cursor();
        for _ in 0..5 {
            s.advance(1);
        }
        assert_eq!(s.cursor(), start);
    }

    #[test]
    fn single_element_set_wraps_onto_itself() {
        let mut s = session(1);
        s.advance(1);
        assert_eq!(s.cursor(), 0);
        s.advance(-1);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn remove_current_clamps_cursor() {
        let mut s = session(3);
        s.advance(2);
        let removed = s.remove_current();
        assert_eq!(removed, PathBuf::from("/pics/img2.png"));
        assert_eq!(s.len(), 2);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn removing_last_entry_reaches_empty_state() {
        let mut s = session(1);
        s.remove_current();
        assert!(s.is_empty());
    }

    #[test]
    fn release_at_unit_scale_keeps_display_coordinates() {
        let mut s = session(1);
        s.press(10.0, 20.0);
        s.motion(50.0, 80.0);
        let b = s.release(50.0, 80.0, 1.0, 640.0, 480.0).unwrap();
        assert_eq!(
            b,
            CropBox {
                x1: 10,
                y1: 20,
                x2: 50,
                y2: 80
            }
        );
    }

    #[test]
    fn release_divides_by_scale_and_truncates() {
        // 2000x500 original shown at scale 0.5 -> 1000x250 display.
        let mut s = session(1);
        s.press(10.0, 10.0);
        let b = s.release(110.0, 60.0, 0.5, 1000.0, 250.0).unwrap();
        assert_eq!(
            b,
            CropBox {
                x1: 20,
                y1: 20,
                x2: 220,
                y2: 120
            }
        );
    }

    #[test]
    fn reversed_drag_orders_corners() {
        let mut s = session(1);
        s.press(110.0, 60.0);
        let b = s.release(10.0, 10.0, 1.0, 1000.0, 250.0).unwrap();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (10, 10, 110, 60));
    }

    #[test]
    fn release_clamps_to_display_bounds() {
        let mut s = session(1);
        s.press(-20.0, -5.0);
        let b = s.release(700.0, 500.0, 1.0, 640.0, 480.0).unwrap();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (0, 0, 640, 480));
    }

    #[test]
    fn zero_area_drag_produces_nothing() {
        let mut s = session(1);
        s.press(30.0, 30.0);
        assert!(s.release(30.0, 90.0, 1.0, 640.0, 480.0).is_none());
        s.press(30.0, 30.0);
        assert!(s.release(90.0, 30.0, 1.0, 640.0, 480.0).is_none());
    }

    #[test]
    fn stray_release_is_a_noop() {
        let mut s = session(1);
        assert!(s.release(10.0, 10.0, 1.0, 640.0, 480.0).is_none());
    }

    #[test]
    fn cancel_clears_the_rectangle() {
        let mut s = session(1);
        s.press(10.0, 10.0);
        s.motion(40.0, 40.0);
        s.cancel();
        assert!(s.drag_rect().is_none());
        assert!(s.release(40.0, 40.0, 1.0, 640.0, 480.0).is_none());
    }

    #[test]
    fn motion_reports_live_size() {
        let mut s = session(1);
        assert!(s.motion(5.0, 5.0).is_none());
        s.press(10.0, 10.0);
        assert_eq!(s.motion(110.0, 60.0), Some((100, 50)));
    }

    #[test]
    fn output_name_encodes_box_and_source() {
        let b = CropBox {
            x1: 20,
            y1: 20,
            x2: 220,
            y2: 120,
        };
        assert_eq!(
            b.output_name(Path::new("/pics/a.png")),
            "cropped_20_20-220_120_a.png"
        );
        assert_eq!(
            b.output_path(Path::new("/pics/a.png")),
            PathBuf::from("/pics/cropped_20_20-220_120_a.png")
        );
    }
}
