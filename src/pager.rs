//! Pagers: drivers that consume painters and write them to surfaces,
//! possibly one per page.
//!
//! Every pager walks the same state machine: fresh -> open on the first
//! `send`, open -> closed on `done`. A pager that `can_page` accepts
//! repeated sends while open; misuse surfaces as a backend error, which
//! is where surface faults live.

use crate::backend::DrawContext;
use crate::errors::{PlotError, Result};
use crate::layout::Grid;
use crate::painter::Painter;
use crate::rendering::render;
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PagerState {
    Fresh,
    Open,
    Closed,
}

pub trait Pager {
    /// Whether `send` may be called more than once per cycle.
    fn can_page(&self) -> bool;

    /// Whether `done` returns the pager to its fresh state instead of
    /// closing it for good.
    fn is_reusable(&self) -> bool;

    fn send(&mut self, painter: Box<dyn Painter>) -> Result<()>;

    fn done(&mut self) -> Result<()>;
}

fn misuse(what: &str) -> PlotError {
    PlotError::Backend(crate::backend::BackendError::new(format!(
        "pager misuse: {what}"
    )))
}

/// Multi-page driver over one persistent context (a PS- or PDF-shaped
/// surface): each send renders a page and emits `show_page`.
pub struct MultiPagePager<C: DrawContext> {
    ctx: C,
    style: Theme,
    width: f64,
    height: f64,
    state: PagerState,
    pages: usize,
}

impl<C: DrawContext> MultiPagePager<C> {
    pub fn new(ctx: C, style: Theme, width: f64, height: f64) -> Self {
        Self {
            ctx,
            style,
            width,
            height,
            state: PagerState::Fresh,
            pages: 0,
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Recover the context after `done`, e.g. to finalize the surface.
    pub fn into_context(self) -> C {
        self.ctx
    }
}

impl<C: DrawContext> Pager for MultiPagePager<C> {
    fn can_page(&self) -> bool {
        true
    }

    fn is_reusable(&self) -> bool {
        false
    }

    fn send(&mut self, mut painter: Box<dyn Painter>) -> Result<()> {
        if self.state == PagerState::Closed {
            return Err(misuse("send after done"));
        }
        self.state = PagerState::Open;
        render(
            painter.as_mut(),
            &mut self.ctx,
            &self.style,
            self.width,
            self.height,
        )?;
        self.ctx.show_page()?;
        self.pages += 1;
        Ok(())
    }

    fn done(&mut self) -> Result<()> {
        if self.state == PagerState::Closed {
            return Err(misuse("done after done"));
        }
        self.state = PagerState::Closed;
        Ok(())
    }
}

/// One surface per send (SVG, EPS, PNG drivers). Not paging, but
/// reusable: `done` hands the finished context back through the sink and
/// returns the pager to fresh.
pub struct SinglePagePager<C, F>
where
    C: DrawContext,
    F: FnMut() -> Result<C>,
{
    factory: F,
    style: Theme,
    width: f64,
    height: f64,
    state: PagerState,
    open_ctx: Option<C>,
    finished: Vec<C>,
}

impl<C, F> SinglePagePager<C, F>
where
    C: DrawContext,
    F: FnMut() -> Result<C>,
{
    pub fn new(factory: F, style: Theme, width: f64, height: f64) -> Self {
        Self {
            factory,
            style,
            width,
            height,
            state: PagerState::Fresh,
            open_ctx: None,
            finished: Vec::new(),
        }
    }

    /// Finalized surfaces, in send order.
    pub fn finished(&self) -> &[C] {
        &self.finished
    }

    pub fn take_finished(&mut self) -> Vec<C> {
        std::mem::take(&mut self.finished)
    }
}

impl<C, F> Pager for SinglePagePager<C, F>
where
    C: DrawContext,
    F: FnMut() -> Result<C>,
{
    fn can_page(&self) -> bool {
        false
    }

    fn is_reusable(&self) -> bool {
        true
    }

    fn send(&mut self, mut painter: Box<dyn Painter>) -> Result<()> {
        if self.state != PagerState::Fresh {
            return Err(misuse("single-page pager sent twice without done"));
        }
        let mut ctx = (self.factory)()?;
        render(
            painter.as_mut(),
            &mut ctx,
            &self.style,
            self.width,
            self.height,
        )?;
        self.open_ctx = Some(ctx);
        self.state = PagerState::Open;
        Ok(())
    }

    fn done(&mut self) -> Result<()> {
        match self.state {
            PagerState::Open => {
                if let Some(ctx) = self.open_ctx.take() {
                    self.finished.push(ctx);
                }
                self.state = PagerState::Fresh;
                Ok(())
            }
            _ => Err(misuse("done on a pager with nothing open")),
        }
    }
}

/// Wraps a reusable non-paging pager into a paging one by finishing a
/// cycle after every send.
pub struct ReusingPager {
    sub: Box<dyn Pager>,
}

impl ReusingPager {
    pub fn new(sub: Box<dyn Pager>) -> Result<Self> {
        if !sub.is_reusable() {
            return Err(misuse("reusing adapter needs a reusable subpager"));
        }
        Ok(Self { sub })
    }

    pub fn sub(&self) -> &dyn Pager {
        self.sub.as_ref()
    }
}

impl Pager for ReusingPager {
    fn can_page(&self) -> bool {
        true
    }

    fn is_reusable(&self) -> bool {
        true
    }

    fn send(&mut self, painter: Box<dyn Painter>) -> Result<()> {
        self.sub.send(painter)?;
        self.sub.done()
    }

    fn done(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Accumulates painters into an `nw` x `nh` grid and flushes a full page
/// to the subpager. Unfilled cells on the final page stay null.
pub struct GridPager {
    sub: Box<dyn Pager>,
    nw: usize,
    nh: usize,
    pending: Vec<Box<dyn Painter>>,
    state: PagerState,
}

impl GridPager {
    pub fn new(sub: Box<dyn Pager>, nw: usize, nh: usize) -> Result<Self> {
        if nw == 0 || nh == 0 {
            return Err(PlotError::domain("grid pager dimensions must be nonzero"));
        }
        if !sub.can_page() {
            return Err(misuse("grid pager needs a paging subpager"));
        }
        Ok(Self {
            sub,
            nw,
            nh,
            pending: Vec::new(),
            state: PagerState::Fresh,
        })
    }

    fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut grid = Grid::new(self.nw, self.nh)?;
        for (i, painter) in self.pending.drain(..).enumerate() {
            grid.set_cell(i % self.nw, i / self.nw, painter)?;
        }
        self.sub.send(Box::new(grid))
    }
}

impl Pager for GridPager {
    fn can_page(&self) -> bool {
        true
    }

    fn is_reusable(&self) -> bool {
        false
    }

    fn send(&mut self, painter: Box<dyn Painter>) -> Result<()> {
        if self.state == PagerState::Closed {
            return Err(misuse("send after done"));
        }
        self.state = PagerState::Open;
        self.pending.push(painter);
        if self.pending.len() == self.nw * self.nh {
            self.flush()?;
        }
        Ok(())
    }

    fn done(&mut self) -> Result<()> {
        if self.state == PagerState::Closed {
            return Err(misuse("done after done"));
        }
        self.flush()?;
        self.state = PagerState::Closed;
        self.sub.done()
    }
}
