//! Fixed-size paging over projected lines.
//!
//! A [`Page`] is a value: navigating returns the next page instead of
//! mutating a shared cursor, and `None` means the operator chose to return.

use std::fmt;
use std::ops::Range;

/// Navigation choice offered under a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Previous,
    Next,
    Return,
}

impl PageAction {
    pub fn label(&self) -> &'static str {
        match self {
            PageAction::Previous => "Display Previous",
            PageAction::Next => "Display Next",
            PageAction::Return => "Return",
        }
    }

    /// Line announced after the action is taken
    pub fn announcement(&self) -> Option<&'static str> {
        match self {
            PageAction::Previous => Some("Displaying Previous"),
            PageAction::Next => Some("Displaying Next"),
            PageAction::Return => None,
        }
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One page of a fixed sequence. `index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: usize,
    size: usize,
    total_items: usize,
}

/// First page over `items`. A `page_size` of zero is treated as one.
pub fn paginate<T>(items: &[T], page_size: usize) -> Page {
    Page::first(items.len(), page_size)
}

impl Page {
    pub fn first(total_items: usize, page_size: usize) -> Self {
        Self {
            index: 1,
            size: page_size.max(1),
            total_items,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.size)
    }

    /// Positions of the items on this page. The last page holds the
    /// remainder when the total is not a multiple of the page size.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.index - 1) * self.size).min(self.total_items);
        let end = (start + self.size).min(self.total_items);
        start..end
    }

    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn has_previous(&self) -> bool {
        self.index > 1
    }

    pub fn has_next(&self) -> bool {
        self.index < self.total_pages()
    }

    /// Actions available on this page, in menu order
    pub fn actions(&self) -> Vec<PageAction> {
        let mut actions = Vec::with_capacity(3);
        if self.has_previous() {
            actions.push(PageAction::Previous);
        }
        if self.has_next() {
            actions.push(PageAction::Next);
        }
        actions.push(PageAction::Return);
        actions
    }

    /// Apply `action`. `None` ends paging; unavailable moves keep the page.
    pub fn navigate(self, action: PageAction) -> Option<Page> {
        match action {
            PageAction::Return => None,
            PageAction::Previous if self.has_previous() => Some(Page {
                index: self.index - 1,
                ..self
            }),
            PageAction::Next if self.has_next() => Some(Page {
                index: self.index + 1,
                ..self
            }),
            _ => Some(self),
        }
    }
}
