//! Page windowing for carousel sections.
//!
//! Page indices always satisfy `0 <= page <= last_page(len, page_size)`. Stepping past
//! either edge is a no-op; there is no wraparound and no jumping.
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "next")]
    Forward,
    #[serde(alias = "prev", alias = "previous")]
    Backward,
}

/// Number of pages needed for `len` items. Zero for an empty list or a zero page size.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Highest valid page index, floored at 0 for empty lists.
pub fn last_page(len: usize, page_size: usize) -> usize {
    page_count(len, page_size).saturating_sub(1)
}

/// Items `[page * page_size, (page + 1) * page_size)` clipped to the list.
pub fn visible_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn advance<T>(page: usize, direction: Direction, items: &[T], page_size: usize) -> usize {
    let last = last_page(items.len(), page_size);
    let next = match direction {
        Direction::Forward => page.saturating_add(1),
        Direction::Backward => page.saturating_sub(1),
    };
    next.min(last)
}

/// One section's list plus the page index it owns.
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    page_size: usize,
    page: usize,
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size,
            page: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn last_page(&self) -> usize {
        last_page(self.items.len(), self.page_size)
    }

    pub fn visible(&self) -> &[T] {
        visible_slice(&self.items, self.page, self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    /// Returns whether the page index moved.
    pub fn step(&mut self, direction: Direction) -> bool {
        let next = advance(self.page, direction, &self.items, self.page_size);
        let moved = next != self.page;
        if moved {
            debug!(from = self.page, to = next, "Carousel step");
        }
        self.page = next;
        moved
    }

    /// New list from a fresh fetch; the page index starts over.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 0;
    }
}

impl<T: Clone> Carousel<T> {
    pub fn window(&self) -> CarouselWindow<T> {
        CarouselWindow {
            page: self.page,
            page_size: self.page_size,
            last_page: self.last_page(),
            total: self.items.len(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
            items: self.visible().to_vec(),
        }
    }
}

/// Serializable snapshot of a carousel's visible page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselWindow<T> {
    pub page: usize,
    pub page_size: usize,
    pub last_page: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub items: Vec<T>,
}

impl<T: Clone> CarouselWindow<T> {
    /// Window for a stateless caller that remembers only its page index. An
    /// out-of-range `page` is clamped to the last page before `step` applies.
    pub fn at(items: Vec<T>, page: usize, step: Option<Direction>, page_size: usize) -> Self {
        let mut carousel = Carousel::new(items, page_size);
        carousel.page = page.min(carousel.last_page());
        if let Some(direction) = step {
            carousel.step(direction);
        }
        carousel.window()
    }
}
