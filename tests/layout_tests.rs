use std::cell::RefCell;
use std::rc::Rc;

use glam::DAffine2;
use vecplot::backend::{DrawContext, Op, RecordingContext};
use vecplot::layout::{Grid, HBox, NullPainter, Overlay, RightRotationPainter, Rotation, VBox};
use vecplot::painter::{Extents, Painter, PainterCore};
use vecplot::rendering::render;
use vecplot::theme::{StyleToken, Theme};

/// Fixed-minimum painter that records every allocation it receives.
struct Probe {
    core: PainterCore,
    min: Extents,
    seen: Rc<RefCell<Vec<Extents>>>,
}

impl Probe {
    fn new(min: Extents) -> (Box<dyn Painter>, Rc<RefCell<Vec<Extents>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let probe = Probe {
            core: PainterCore::new(StyleToken::Foreground),
            min,
            seen: Rc::clone(&seen),
        };
        (Box::new(probe), seen)
    }
}

impl Painter for Probe {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, _ctx: &mut dyn DrawContext, _style: &Theme) -> Result<Extents, vecplot::PlotError> {
        Ok(self.min)
    }

    fn configure_children(
        &mut self,
        _ctx: &mut dyn DrawContext,
        _style: &Theme,
    ) -> Result<(), vecplot::PlotError> {
        self.seen.borrow_mut().push(self.core.alloc());
        Ok(())
    }

    fn do_paint(
        &mut self,
        _ctx: &mut dyn DrawContext,
        _style: &Theme,
    ) -> Result<(), vecplot::PlotError> {
        Ok(())
    }
}

#[test]
fn null_painter_paints_a_sentinel_cross() {
    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    let mut root = NullPainter::new();
    render(&mut root, &mut ctx, &style, 50.0, 50.0).unwrap();
    // Two strokes of the X: two move/line pairs.
    assert_eq!(ctx.count(|op| matches!(op, Op::LineTo(..))), 2);
    assert_eq!(ctx.save_depth(), 0);
}

#[test]
fn grid_cells_are_never_empty() {
    let mut grid = Grid::new(2, 2).unwrap();
    let (probe, _) = Probe::new(Extents::sized(5.0, 5.0));
    grid.set_cell(1, 0, probe).unwrap();
    // Removing the child leaves a null painter behind, not a hole.
    let removed = grid.take_cell(1, 0).unwrap();
    assert!(!removed.core().is_attached());
    for iy in 0..2 {
        for ix in 0..2 {
            assert!(grid.cell(ix, iy).is_ok());
        }
    }
    assert!(grid.cell(2, 0).is_err());
}

#[test]
fn grid_allocates_uniform_cells() {
    let (pa, seen_a) = Probe::new(Extents::sized(10.0, 8.0));
    let (pb, seen_b) = Probe::new(Extents::sized(6.0, 12.0));
    let mut grid = Grid::new(2, 1).unwrap();
    grid.hpad = 2.0;
    grid.border = 0.0;
    grid.set_cell(0, 0, pa).unwrap();
    grid.set_cell(1, 0, pb).unwrap();

    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    // Minimum: 2 * max(10, 6) + pad = 22 wide, max(8, 12) = 12 tall.
    let min = grid.get_minimum_size(&mut ctx, &style).unwrap();
    assert_eq!(min.width, 22.0);
    assert_eq!(min.height, 12.0);

    render(&mut grid, &mut ctx, &style, 42.0, 12.0).unwrap();
    // Both cells get the same allocation: (42 - 2) / 2 = 20 wide.
    let a = seen_a.borrow()[0];
    let b = seen_b.borrow()[0];
    assert_eq!(a, b);
    assert_eq!(a.width, 20.0);
    assert_eq!(a.height, 12.0);
}

#[test]
fn overlay_minimum_is_componentwise_max_plus_border() {
    let (pa, _) = Probe::new(Extents {
        width: 10.0,
        height: 4.0,
        border_left: 3.0,
        ..Extents::default()
    });
    let (pb, _) = Probe::new(Extents {
        width: 6.0,
        height: 9.0,
        border_right: 2.0,
        ..Extents::default()
    });
    let mut overlay = Overlay::new();
    overlay.border = 1.5;
    overlay.add_child(pa);
    overlay.add_child(pb);

    let mut ctx = RecordingContext::new();
    let min = overlay
        .get_minimum_size(&mut ctx, &Theme::default())
        .unwrap();
    assert_eq!(min.width, 13.0); // max(10, 6) + 2 * 1.5
    assert_eq!(min.height, 12.0); // max(4, 9) + 2 * 1.5
    assert_eq!(min.border_left, 3.0);
    assert_eq!(min.border_right, 2.0);
}

#[test]
fn rotation_relabels_the_minimum_tuple() {
    let min = Extents {
        width: 10.0,
        height: 4.0,
        border_top: 1.0,
        border_right: 2.0,
        border_bottom: 3.0,
        border_left: 4.0,
    };
    let mut ctx = RecordingContext::new();
    let style = Theme::default();

    let (probe, _) = Probe::new(min);
    let mut ccw = RightRotationPainter::new(Rotation::CounterClockwise90, probe);
    let m = ccw.get_minimum_size(&mut ctx, &style).unwrap();
    // Child top edge lands on the screen left, right on top, and so on.
    assert_eq!((m.width, m.height), (4.0, 10.0));
    assert_eq!(
        (m.border_top, m.border_right, m.border_bottom, m.border_left),
        (2.0, 3.0, 4.0, 1.0)
    );

    let (probe, _) = Probe::new(min);
    let mut half = RightRotationPainter::new(Rotation::HalfTurn, probe);
    let m = half.get_minimum_size(&mut ctx, &style).unwrap();
    assert_eq!((m.width, m.height), (10.0, 4.0));
    assert_eq!(
        (m.border_top, m.border_right, m.border_bottom, m.border_left),
        (3.0, 4.0, 1.0, 2.0)
    );
}

#[test]
fn rotation_preserves_child_allocation_sense() {
    let min = Extents::sized(10.0, 4.0);
    let (probe, seen) = Probe::new(min);
    let mut rot = RightRotationPainter::new(Rotation::CounterClockwise90, probe);
    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    render(&mut rot, &mut ctx, &style, 4.0, 10.0).unwrap();
    // The child still sees itself as 10 wide and 4 tall.
    let alloc = seen.borrow()[0];
    assert_eq!((alloc.width, alloc.height), (10.0, 4.0));
}

#[test]
fn hbox_weights_divide_the_slack() {
    let (pa, seen_a) = Probe::new(Extents::sized(10.0, 5.0));
    let (pb, seen_b) = Probe::new(Extents::sized(10.0, 5.0));
    let mut hbox = HBox::new();
    hbox.pad = 0.0;
    hbox.add_child(pa, 0.0);
    hbox.add_child(pb, 1.0);

    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    render(&mut hbox, &mut ctx, &style, 50.0, 5.0).unwrap();
    // Weight 0 stays at its minimum; the weighted child takes the slack.
    assert_eq!(seen_a.borrow()[0].width, 10.0);
    assert_eq!(seen_b.borrow()[0].width, 40.0);
}

#[test]
fn vbox_equalizes_minor_axis_borders() {
    let (pa, seen_a) = Probe::new(Extents {
        width: 20.0,
        height: 10.0,
        border_left: 5.0,
        ..Extents::default()
    });
    let (pb, seen_b) = Probe::new(Extents {
        width: 20.0,
        height: 10.0,
        border_left: 9.0,
        ..Extents::default()
    });
    let mut vbox = VBox::new();
    vbox.pad = 0.0;
    vbox.add_child(pa, 1.0);
    vbox.add_child(pb, 1.0);

    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    let min = vbox.get_minimum_size(&mut ctx, &style).unwrap();
    // Stacked plots share a single left margin: the larger one.
    assert_eq!(min.border_left, 9.0);

    render(&mut vbox, &mut ctx, &style, 40.0, 40.0).unwrap();
    assert_eq!(seen_a.borrow()[0].border_left, 9.0);
    assert_eq!(seen_b.borrow()[0].border_left, 9.0);
}

#[test]
fn paint_restores_the_context_exactly() {
    let mut grid = Grid::new(2, 2).unwrap();
    let (probe, _) = Probe::new(Extents::sized(5.0, 5.0));
    grid.set_cell(0, 1, probe).unwrap();
    let mut overlay = Overlay::new();
    overlay.bg_fill = true;
    overlay.add_child(Box::new(grid));

    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    render(&mut overlay, &mut ctx, &style, 100.0, 80.0).unwrap();
    assert_eq!(ctx.save_depth(), 0);
    assert_eq!(ctx.current_matrix(), DAffine2::IDENTITY);
    // Saves and restores pair up across the whole pass.
    assert_eq!(
        ctx.count(|op| matches!(op, Op::Save)),
        ctx.count(|op| matches!(op, Op::Restore))
    );
}

#[test]
fn configure_before_attach_is_a_layout_error() {
    let (mut probe, _) = Probe::new(Extents::sized(5.0, 5.0));
    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    let err = probe
        .configure_painting(&mut ctx, &style, Extents::sized(10.0, 10.0))
        .unwrap_err();
    assert!(matches!(err, vecplot::PlotError::Layout(_)));
}
