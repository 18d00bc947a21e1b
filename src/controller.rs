// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image view state and pointer gesture handling.
//!
//! The controller owns everything that belongs to one image view: which
//! image is shown, its current display size, the annotations loaded for it,
//! whether annotate mode is on and the gesture in progress. Pixel rectangles
//! are always derived from the stored percentages at the current size; the
//! reverse conversion only happens when a gesture commits.

use crate::error::StoreError;
use crate::models::annotation::{Annotation, HexColor, ImageId};
use crate::store::AnnotationStore;
use crate::util::geometry::{to_percent, to_pixels, ImageSize, PixelRect, Pos};

/// Smallest rectangle side, in pixels, that a draw gesture keeps.
pub const MIN_DRAW_PX: f64 = 5.0;

/// Smallest side a resize gesture can shrink a box to.
pub const MIN_RESIZE_PX: f64 = 10.0;

/// Coarse state of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No image shown.
    Idle,
    /// Annotations rendered; boxes can be moved and resized.
    Viewing,
    /// Annotate mode: pressing on empty image space draws a new box.
    Drawing,
}

/// Pointer input in pixels relative to the image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Pos),
    Move(Pos),
    Release(Pos),
}

/// What a call did, so the shell knows what to show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing applies to the current state.
    Ignored,
    /// A gesture began.
    Started,
    /// Live geometry changed; nothing was written.
    Updated,
    /// A rectangle was drawn and now needs a label.
    AwaitingLabel,
    /// The gesture ended without writing anything.
    Discarded,
    /// The change was written to the store.
    Committed,
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    None,
    Drawing {
        origin: Pos,
        current: Pos,
    },
    Labeling {
        rect: PixelRect,
        drawn_at: ImageSize,
    },
    Dragging {
        index: usize,
        press: Pos,
        origin: PixelRect,
        current: PixelRect,
    },
    Resizing {
        index: usize,
        press: Pos,
        origin: PixelRect,
        current: PixelRect,
    },
}

#[derive(Debug, Clone)]
struct OpenImage {
    id: ImageId,
    size: ImageSize,
}

/// One annotation box positioned for the current image size.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBox<'a> {
    pub rect: PixelRect,
    pub label: &'a str,
    pub color: &'a HexColor,
    /// Being moved or resized; `rect` is the live position.
    pub live: bool,
}

/// Everything to draw over the image.
#[derive(Debug, Default, PartialEq)]
pub struct Overlay<'a> {
    pub boxes: Vec<RenderedBox<'a>>,
    /// Rubber-band rectangle of a draw in progress.
    pub draft: Option<PixelRect>,
    /// Drawn rectangle waiting for its label.
    pub pending: Option<PixelRect>,
}

/// State of one image view.
#[derive(Debug)]
pub struct ViewController {
    image: Option<OpenImage>,
    annotations: Vec<Annotation>,
    annotating: bool,
    gesture: Gesture,
    min_draw_px: f64,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self::with_min_draw_size(MIN_DRAW_PX)
    }

    pub fn with_min_draw_size(min_draw_px: f64) -> Self {
        Self {
            image: None,
            annotations: Vec::new(),
            annotating: false,
            gesture: Gesture::None,
            min_draw_px,
        }
    }

    pub fn state(&self) -> ViewState {
        match (&self.image, self.annotating) {
            (None, _) => ViewState::Idle,
            (Some(_), false) => ViewState::Viewing,
            (Some(_), true) => ViewState::Drawing,
        }
    }

    pub fn image_id(&self) -> Option<&ImageId> {
        self.image.as_ref().map(|image| &image.id)
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image.as_ref().map(|image| image.size)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_annotating(&self) -> bool {
        self.annotating
    }

    /// Show an image whose load has completed, reading its annotations.
    ///
    /// If the store cannot be read the image is still shown, with no
    /// annotations, and the error is returned for reporting.
    pub fn open_image(
        &mut self,
        id: ImageId,
        size: ImageSize,
        store: &dyn AnnotationStore,
    ) -> Result<(), StoreError> {
        let (annotations, result) = match store.get(&id) {
            Ok(annotations) => (annotations, Ok(())),
            Err(e) => (Vec::new(), Err(e)),
        };
        log::info!("Viewing image {} with {} annotations", id, annotations.len());

        self.image = Some(OpenImage { id, size });
        self.annotations = annotations;
        self.annotating = false;
        self.gesture = Gesture::None;
        result
    }

    /// Leave the current image. Returns to `Idle`.
    pub fn navigate_away(&mut self) {
        if let Some(image) = self.image.take() {
            log::debug!("Leaving image {}", image.id);
        }
        self.annotations.clear();
        self.annotating = false;
        self.gesture = Gesture::None;
    }

    /// The displayed image changed size. Boxes follow on the next render.
    ///
    /// A drag, resize or draw in progress is abandoned since its pixel
    /// geometry refers to the old size.
    pub fn resize(&mut self, size: ImageSize) {
        let Some(image) = self.image.as_mut() else {
            return;
        };
        if image.size == size {
            return;
        }
        image.size = size;

        if !matches!(self.gesture, Gesture::None | Gesture::Labeling { .. }) {
            log::debug!("Abandoning gesture after resize");
            self.gesture = Gesture::None;
        }
    }

    /// Switch annotate mode. Returns whether it is now on.
    pub fn toggle_annotate(&mut self) -> bool {
        if self.image.is_none() {
            return false;
        }

        self.annotating = !self.annotating;
        if !self.annotating
            && matches!(self.gesture, Gesture::Drawing { .. } | Gesture::Labeling { .. })
        {
            self.gesture = Gesture::None;
        }
        log::debug!("Annotate mode {}", if self.annotating { "on" } else { "off" });
        self.annotating
    }

    /// Advance the gesture state machine with one pointer event.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        store: &mut dyn AnnotationStore,
    ) -> Result<Transition, StoreError> {
        let Some(size) = self.image_size() else {
            return Ok(Transition::Ignored);
        };

        let gesture = std::mem::replace(&mut self.gesture, Gesture::None);
        match (gesture, event) {
            (Gesture::None, PointerEvent::Press(pos)) => Ok(self.press(pos, size)),

            (Gesture::Drawing { origin, .. }, PointerEvent::Move(pos)) => {
                self.gesture = Gesture::Drawing { origin, current: pos };
                Ok(Transition::Updated)
            }
            (Gesture::Drawing { origin, .. }, PointerEvent::Release(pos)) => {
                let rect = PixelRect::from_corners(origin, pos);
                let too_small = rect.width < self.min_draw_px || rect.height < self.min_draw_px;
                if too_small || rect.width <= 0.0 || rect.height <= 0.0 {
                    log::debug!("Discarding {:.0}x{:.0} draw", rect.width, rect.height);
                    return Ok(Transition::Discarded);
                }
                self.gesture = Gesture::Labeling { rect, drawn_at: size };
                Ok(Transition::AwaitingLabel)
            }

            (Gesture::Dragging { index, press, origin, .. }, PointerEvent::Move(pos)) => {
                let current = origin.translated(pos.x - press.x, pos.y - press.y);
                self.gesture = Gesture::Dragging { index, press, origin, current };
                Ok(Transition::Updated)
            }
            (Gesture::Dragging { index, press, origin, .. }, PointerEvent::Release(pos)) => {
                let current = origin.translated(pos.x - press.x, pos.y - press.y);
                if current == origin {
                    return Ok(Transition::Discarded);
                }
                let pct = to_percent(&current, &size);
                self.commit(store, index, |a| {
                    a.x_pct = pct.x;
                    a.y_pct = pct.y;
                })
            }

            (Gesture::Resizing { index, press, origin, .. }, PointerEvent::Move(pos)) => {
                let current = resized(origin, press, pos);
                self.gesture = Gesture::Resizing { index, press, origin, current };
                Ok(Transition::Updated)
            }
            (Gesture::Resizing { index, press, origin, .. }, PointerEvent::Release(pos)) => {
                let current = resized(origin, press, pos);
                if current == origin {
                    return Ok(Transition::Discarded);
                }
                let pct = to_percent(&current, &size);
                self.commit(store, index, |a| {
                    a.w_pct = pct.width;
                    a.h_pct = pct.height;
                })
            }

            (gesture, _) => {
                self.gesture = gesture;
                Ok(Transition::Ignored)
            }
        }
    }

    /// Label the drawn rectangle and append it to the store.
    ///
    /// A blank label discards the rectangle without writing.
    pub fn confirm_label(
        &mut self,
        label: &str,
        color: HexColor,
        store: &mut dyn AnnotationStore,
    ) -> Result<Transition, StoreError> {
        let (Some(image), Gesture::Labeling { rect, drawn_at }) = (&self.image, self.gesture)
        else {
            return Ok(Transition::Ignored);
        };
        self.gesture = Gesture::None;

        let label = label.trim();
        if label.is_empty() {
            return Ok(Transition::Discarded);
        }

        let annotation = Annotation::new(to_percent(&rect, &drawn_at), label.to_string(), color);
        store.append(&image.id, annotation.clone())?;
        log::info!("Added annotation {:?} to image {}", annotation.label, image.id);
        self.annotations.push(annotation);
        Ok(Transition::Committed)
    }

    /// Drop the drawn rectangle waiting for a label.
    pub fn cancel_label(&mut self) -> Transition {
        if matches!(self.gesture, Gesture::Labeling { .. }) {
            self.gesture = Gesture::None;
            Transition::Discarded
        } else {
            Transition::Ignored
        }
    }

    /// Where the label input belongs, at the current image size.
    pub fn pending_label(&self) -> Option<PixelRect> {
        match (&self.image, self.gesture) {
            (Some(image), Gesture::Labeling { rect, drawn_at }) => {
                Some(to_pixels(&to_percent(&rect, &drawn_at), &image.size))
            }
            _ => None,
        }
    }

    /// Delete every annotation of the current image.
    pub fn clear(&mut self, store: &mut dyn AnnotationStore) -> Result<(), StoreError> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        store.clear(&image.id)?;
        log::info!("Cleared annotations of image {}", image.id);
        self.annotations.clear();
        self.gesture = Gesture::None;
        Ok(())
    }

    /// Re-read the current image's annotations, e.g. after an import.
    pub fn reload(&mut self, store: &dyn AnnotationStore) -> Result<(), StoreError> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        self.annotations = store.get(&image.id)?;
        self.gesture = Gesture::None;
        Ok(())
    }

    /// Boxes and helper rectangles to draw, in image pixels.
    pub fn render(&self) -> Overlay<'_> {
        let Some(image) = &self.image else {
            return Overlay::default();
        };

        let live = match self.gesture {
            Gesture::Dragging { index, current, .. } | Gesture::Resizing { index, current, .. } => {
                Some((index, current))
            }
            _ => None,
        };

        let boxes = self
            .annotations
            .iter()
            .enumerate()
            .map(|(index, a)| {
                let live_rect = live.filter(|(i, _)| *i == index).map(|(_, rect)| rect);
                RenderedBox {
                    rect: live_rect.unwrap_or_else(|| to_pixels(&a.rect(), &image.size)),
                    label: &a.label,
                    color: &a.color,
                    live: live_rect.is_some(),
                }
            })
            .collect();

        let draft = match self.gesture {
            Gesture::Drawing { origin, current } => Some(PixelRect::from_corners(origin, current)),
            _ => None,
        };

        Overlay {
            boxes,
            draft,
            pending: self.pending_label(),
        }
    }

    fn press(&mut self, pos: Pos, size: ImageSize) -> Transition {
        // Later annotations are drawn on top, so they win the hit test.
        let hit = self
            .annotations
            .iter()
            .enumerate()
            .rev()
            .map(|(index, a)| (index, to_pixels(&a.rect(), &size)))
            .find(|(_, rect)| rect.contains(pos) || rect.handle().contains(pos));

        match hit {
            Some((index, rect)) if rect.handle().contains(pos) => {
                log::debug!("Resizing annotation {}", index);
                self.gesture = Gesture::Resizing { index, press: pos, origin: rect, current: rect };
                Transition::Started
            }
            Some((index, rect)) => {
                log::debug!("Dragging annotation {}", index);
                self.gesture = Gesture::Dragging { index, press: pos, origin: rect, current: rect };
                Transition::Started
            }
            None if self.annotating => {
                self.gesture = Gesture::Drawing { origin: pos, current: pos };
                Transition::Started
            }
            None => Transition::Ignored,
        }
    }

    /// Write the full list with one entry changed. The in-memory list only
    /// changes once the store accepted the write.
    fn commit<F>(
        &mut self,
        store: &mut dyn AnnotationStore,
        index: usize,
        change: F,
    ) -> Result<Transition, StoreError>
    where
        F: FnOnce(&mut Annotation),
    {
        let (Some(image), Some(_)) = (&self.image, self.annotations.get(index)) else {
            return Ok(Transition::Discarded);
        };

        let mut next = self.annotations.clone();
        change(&mut next[index]);
        store.save(&image.id, &next)?;
        log::info!("Updated annotation {} of image {}", index, image.id);
        self.annotations = next;
        Ok(Transition::Committed)
    }
}

fn resized(origin: PixelRect, press: Pos, pos: Pos) -> PixelRect {
    PixelRect {
        width: (origin.width + pos.x - press.x).max(MIN_RESIZE_PX),
        height: (origin.height + pos.y - press.y).max(MIN_RESIZE_PX),
        ..origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::AnnotationRecord;
    use crate::store::MemoryStore;
    use crate::util::geometry::PctRect;
    use std::path::PathBuf;

    /// Memory store that counts writes and can be told to fail.
    #[derive(Default)]
    struct TestStore {
        inner: MemoryStore,
        writes: usize,
        fail_reads: bool,
        fail_writes: bool,
    }

    fn disk_error() -> StoreError {
        StoreError::Io {
            path: PathBuf::from("test.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        }
    }

    impl TestStore {
        fn check(&mut self) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(disk_error());
            }
            self.writes += 1;
            Ok(())
        }
    }

    impl AnnotationStore for TestStore {
        fn get(&self, id: &ImageId) -> Result<Vec<Annotation>, StoreError> {
            if self.fail_reads {
                return Err(disk_error());
            }
            self.inner.get(id)
        }

        fn save(&mut self, id: &ImageId, annotations: &[Annotation]) -> Result<(), StoreError> {
            self.check()?;
            self.inner.save(id, annotations)
        }

        fn clear(&mut self, id: &ImageId) -> Result<(), StoreError> {
            self.check()?;
            self.inner.clear(id)
        }

        fn export_all(&self) -> Result<Vec<AnnotationRecord>, StoreError> {
            self.inner.export_all()
        }

        fn import_all(&mut self, records: Vec<AnnotationRecord>) -> Result<(), StoreError> {
            self.check()?;
            self.inner.import_all(records)
        }
    }

    fn size(w: f64, h: f64) -> ImageSize {
        ImageSize::new(w, h).unwrap()
    }

    fn quarter_box(label: &str) -> Annotation {
        let rect = PctRect { x: 0.25, y: 0.25, width: 0.5, height: 0.5 };
        Annotation::new(rect, label.to_string(), HexColor::default())
    }

    fn seeded(annotations: &[Annotation], w: f64, h: f64) -> (ViewController, TestStore) {
        let mut store = TestStore::default();
        let id = ImageId::Number(1);
        store.inner.save(&id, annotations).unwrap();

        let mut view = ViewController::new();
        view.open_image(id, size(w, h), &store).unwrap();
        (view, store)
    }

    fn draw(view: &mut ViewController, store: &mut TestStore, from: Pos, to: Pos) -> Transition {
        view.handle(PointerEvent::Press(from), store).unwrap();
        view.handle(PointerEvent::Move(to), store).unwrap();
        view.handle(PointerEvent::Release(to), store).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_draw_scenario_stores_percentages() {
        let (mut view, mut store) = seeded(&[], 1000.0, 500.0);
        assert!(view.toggle_annotate());
        assert_eq!(view.state(), ViewState::Drawing);

        let t = draw(&mut view, &mut store, Pos::new(100.0, 100.0), Pos::new(300.0, 200.0));
        assert_eq!(t, Transition::AwaitingLabel);
        assert_eq!(store.writes, 0);

        let green = HexColor::parse("#00ff00").unwrap();
        let t = view.confirm_label("Test", green.clone(), &mut store).unwrap();
        assert_eq!(t, Transition::Committed);

        let stored = store.get(&ImageId::Number(1)).unwrap();
        assert_eq!(stored.len(), 1);
        let a = &stored[0];
        assert_close(a.x_pct, 0.1);
        assert_close(a.y_pct, 0.2);
        assert_close(a.w_pct, 0.2);
        assert_close(a.h_pct, 0.2);
        assert_eq!(a.label, "Test");
        assert_eq!(a.color, green);
        assert_eq!(view.annotations(), stored.as_slice());
    }

    #[test]
    fn test_small_draw_never_writes() {
        let (mut view, mut store) = seeded(&[], 1000.0, 500.0);
        view.toggle_annotate();

        let narrow = draw(&mut view, &mut store, Pos::new(10.0, 10.0), Pos::new(14.0, 200.0));
        let short = draw(&mut view, &mut store, Pos::new(10.0, 10.0), Pos::new(200.0, 14.9));
        assert_eq!(narrow, Transition::Discarded);
        assert_eq!(short, Transition::Discarded);
        let t = view.confirm_label("x", HexColor::default(), &mut store).unwrap();
        assert_eq!(t, Transition::Ignored);
        assert_eq!(store.writes, 0);
        assert!(view.render().pending.is_none());
    }

    #[test]
    fn test_flat_draw_discarded_without_threshold() {
        let mut store = TestStore::default();
        let mut view = ViewController::with_min_draw_size(0.0);
        view.open_image(ImageId::Number(1), size(1000.0, 500.0), &store).unwrap();
        view.toggle_annotate();

        let flat = draw(&mut view, &mut store, Pos::new(10.0, 10.0), Pos::new(200.0, 10.0));
        assert_eq!(flat, Transition::Discarded);
        let t = view.confirm_label("flat", HexColor::default(), &mut store).unwrap();
        assert_eq!(t, Transition::Ignored);
        assert_eq!(store.writes, 0);

        let t = draw(&mut view, &mut store, Pos::new(10.0, 10.0), Pos::new(12.0, 11.0));
        assert_eq!(t, Transition::AwaitingLabel);
        view.confirm_label("tiny", HexColor::default(), &mut store).unwrap();
        let stored = store.get(&ImageId::Number(1)).unwrap();
        assert!(stored.iter().all(|a| a.validate().is_ok()));
    }

    #[test]
    fn test_blank_label_and_cancel_discard() {
        let (mut view, mut store) = seeded(&[], 1000.0, 500.0);
        view.toggle_annotate();

        draw(&mut view, &mut store, Pos::new(0.0, 0.0), Pos::new(50.0, 50.0));
        let t = view.confirm_label("   ", HexColor::default(), &mut store).unwrap();
        assert_eq!(t, Transition::Discarded);

        draw(&mut view, &mut store, Pos::new(0.0, 0.0), Pos::new(50.0, 50.0));
        assert!(view.pending_label().is_some());
        assert_eq!(view.cancel_label(), Transition::Discarded);

        assert_eq!(store.writes, 0);
        assert!(view.annotations().is_empty());
    }

    #[test]
    fn test_render_follows_resize() {
        let (mut view, _store) = seeded(&[quarter_box("q")], 800.0, 600.0);

        let overlay = view.render();
        assert_eq!(overlay.boxes[0].rect, PixelRect::new(200.0, 150.0, 400.0, 300.0));

        view.resize(size(400.0, 300.0));
        let overlay = view.render();
        let rect = overlay.boxes[0].rect;
        assert_close(rect.x / 400.0, 0.25);
        assert_close(rect.y / 300.0, 0.25);
        assert_close(rect.width / 400.0, 0.5);
        assert_close(rect.height / 300.0, 0.5);
        assert_eq!(view.annotations()[0], quarter_box("q"));
    }

    #[test]
    fn test_drag_commits_on_release_only() {
        let (mut view, mut store) = seeded(&[quarter_box("q")], 800.0, 600.0);

        let t = view.handle(PointerEvent::Press(Pos::new(300.0, 300.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Started);
        view.handle(PointerEvent::Move(Pos::new(350.0, 320.0)), &mut store).unwrap();
        view.handle(PointerEvent::Move(Pos::new(380.0, 360.0)), &mut store).unwrap();
        assert_eq!(store.writes, 0);

        let overlay = view.render();
        assert!(overlay.boxes[0].live);
        assert_eq!(overlay.boxes[0].rect, PixelRect::new(280.0, 210.0, 400.0, 300.0));

        let t = view.handle(PointerEvent::Release(Pos::new(380.0, 360.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Committed);
        assert_eq!(store.writes, 1);

        let a = &store.get(&ImageId::Number(1)).unwrap()[0];
        assert_close(a.x_pct, 0.35);
        assert_close(a.y_pct, 0.35);
        assert_eq!(a.w_pct, 0.5);
        assert_eq!(a.h_pct, 0.5);
        assert!(!view.render().boxes[0].live);
    }

    #[test]
    fn test_click_without_motion_writes_nothing() {
        let (mut view, mut store) = seeded(&[quarter_box("q")], 800.0, 600.0);
        view.handle(PointerEvent::Press(Pos::new(300.0, 300.0)), &mut store).unwrap();
        let t = view.handle(PointerEvent::Release(Pos::new(300.0, 300.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Discarded);
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_resize_handle_updates_size_only() {
        let (mut view, mut store) = seeded(&[quarter_box("q")], 800.0, 600.0);

        // Box spans (200,150)-(600,450); the handle is its last 10px corner.
        let t = view.handle(PointerEvent::Press(Pos::new(595.0, 445.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Started);
        view.handle(PointerEvent::Move(Pos::new(195.0, 445.0)), &mut store).unwrap();
        let t = view.handle(PointerEvent::Release(Pos::new(195.0, 145.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Committed);

        let a = &store.get(&ImageId::Number(1)).unwrap()[0];
        assert_eq!(a.x_pct, 0.25);
        assert_eq!(a.y_pct, 0.25);
        assert_close(a.w_pct, MIN_RESIZE_PX / 800.0);
        assert_close(a.h_pct, MIN_RESIZE_PX / 600.0);
    }

    #[test]
    fn test_topmost_box_wins_hit_test() {
        let lower = quarter_box("lower");
        let upper = Annotation::new(
            PctRect { x: 0.5, y: 0.5, width: 0.25, height: 0.25 },
            "upper".to_string(),
            HexColor::default(),
        );
        let (mut view, mut store) = seeded(&[lower.clone(), upper], 800.0, 600.0);

        view.handle(PointerEvent::Press(Pos::new(450.0, 350.0)), &mut store).unwrap();
        view.handle(PointerEvent::Release(Pos::new(460.0, 350.0)), &mut store).unwrap();

        let stored = store.get(&ImageId::Number(1)).unwrap();
        assert_eq!(stored[0], lower);
        assert_close(stored[1].x_pct, 0.5 + 10.0 / 800.0);
    }

    #[test]
    fn test_press_on_empty_space_needs_annotate_mode() {
        let (mut view, mut store) = seeded(&[], 800.0, 600.0);
        assert_eq!(view.state(), ViewState::Viewing);

        let t = view.handle(PointerEvent::Press(Pos::new(10.0, 10.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Ignored);
        assert!(view.render().draft.is_none());

        view.toggle_annotate();
        view.handle(PointerEvent::Press(Pos::new(10.0, 10.0)), &mut store).unwrap();
        view.handle(PointerEvent::Move(Pos::new(40.0, 30.0)), &mut store).unwrap();
        assert_eq!(view.render().draft, Some(PixelRect::new(10.0, 10.0, 30.0, 20.0)));

        assert!(!view.toggle_annotate());
        assert_eq!(view.state(), ViewState::Viewing);
        assert!(view.render().draft.is_none());
    }

    #[test]
    fn test_idle_is_a_no_op() {
        let mut view = ViewController::new();
        let mut store = TestStore::default();

        assert_eq!(view.state(), ViewState::Idle);
        assert!(!view.toggle_annotate());
        assert_eq!(view.render(), Overlay::default());
        let t = view.handle(PointerEvent::Press(Pos::new(1.0, 1.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Ignored);
        view.resize(size(10.0, 10.0));
        view.clear(&mut store).unwrap();
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_unreadable_store_still_opens_image() {
        let mut store = TestStore::default();
        store.inner.save(&ImageId::Number(1), &[quarter_box("q")]).unwrap();
        store.fail_reads = true;

        let mut view = ViewController::new();
        assert!(view.open_image(ImageId::Number(1), size(800.0, 600.0), &store).is_err());
        assert_eq!(view.state(), ViewState::Viewing);
        assert_eq!(view.image_id(), Some(&ImageId::Number(1)));
        assert!(view.annotations().is_empty());

        store.fail_reads = false;
        assert!(view.toggle_annotate());
        draw(&mut view, &mut store, Pos::new(10.0, 10.0), Pos::new(110.0, 60.0));
        let t = view.confirm_label("new", HexColor::default(), &mut store).unwrap();
        assert_eq!(t, Transition::Committed);
    }

    #[test]
    fn test_store_failure_keeps_prior_state() {
        let (mut view, mut store) = seeded(&[quarter_box("q")], 800.0, 600.0);
        store.fail_writes = true;

        view.handle(PointerEvent::Press(Pos::new(300.0, 300.0)), &mut store).unwrap();
        let result = view.handle(PointerEvent::Release(Pos::new(340.0, 300.0)), &mut store);
        assert!(result.is_err());
        assert_eq!(view.annotations(), &[quarter_box("q")]);
        assert!(!view.render().boxes[0].live);

        view.toggle_annotate();
        draw(&mut view, &mut store, Pos::new(0.0, 0.0), Pos::new(50.0, 50.0));
        assert!(view.confirm_label("new", HexColor::default(), &mut store).is_err());
        assert_eq!(view.annotations().len(), 1);

        assert!(view.clear(&mut store).is_err());
        assert_eq!(view.annotations().len(), 1);
    }

    #[test]
    fn test_resize_abandons_drag_but_keeps_label() {
        let (mut view, mut store) = seeded(&[quarter_box("q")], 800.0, 600.0);

        view.handle(PointerEvent::Press(Pos::new(300.0, 300.0)), &mut store).unwrap();
        view.resize(size(400.0, 300.0));
        let t = view.handle(PointerEvent::Release(Pos::new(100.0, 100.0)), &mut store).unwrap();
        assert_eq!(t, Transition::Ignored);
        assert_eq!(store.writes, 0);

        view.toggle_annotate();
        draw(&mut view, &mut store, Pos::new(10.0, 10.0), Pos::new(50.0, 30.0));
        view.resize(size(800.0, 600.0));
        let pending = view.pending_label().unwrap();
        assert_close(pending.x, 20.0);
        assert_close(pending.y, 20.0);
        assert_close(pending.width, 80.0);
        assert_close(pending.height, 40.0);

        view.confirm_label("kept", HexColor::default(), &mut store).unwrap();
        let a = &view.annotations()[1];
        assert_close(a.x_pct, 10.0 / 400.0);
        assert_close(a.w_pct, 40.0 / 400.0);
    }

    #[test]
    fn test_clear_reload_and_navigation() {
        let (mut view, mut store) = seeded(&[quarter_box("q")], 800.0, 600.0);

        view.clear(&mut store).unwrap();
        assert!(view.annotations().is_empty());
        assert!(store.get(&ImageId::Number(1)).unwrap().is_empty());

        store.inner.save(&ImageId::Number(1), &[quarter_box("imported")]).unwrap();
        view.reload(&store).unwrap();
        assert_eq!(view.annotations()[0].label, "imported");

        view.toggle_annotate();
        view.navigate_away();
        assert_eq!(view.state(), ViewState::Idle);
        assert!(view.annotations().is_empty());
        assert!(!view.is_annotating());
    }
}
