//! In-memory pagination over an already materialised list.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// A zero-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub page: usize,
  pub size: usize,
}

impl Default for PageRequest {
  fn default() -> Self { Self { page: 0, size: DEFAULT_PAGE_SIZE } }
}

impl PageRequest {
  pub fn new(page: usize, size: usize) -> Self { Self { page, size } }

  /// Index of the first element of this page.
  pub fn offset(&self) -> usize { self.page.saturating_mul(self.size) }
}

/// One window of a larger list, with enough metadata to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  pub content: Vec<T>,
  /// Zero-based page number.
  pub number:  usize,
  pub size:    usize,
  /// Number of elements across all pages.
  pub total:   usize,
}

impl<T> Page<T> {
  /// A single page holding every element.
  pub fn unpaged(content: Vec<T>) -> Self {
    let total = content.len();
    Self { content, number: 0, size: total, total }
  }

  pub fn total_pages(&self) -> usize {
    if self.size == 0 {
      1
    } else {
      self.total.div_ceil(self.size)
    }
  }

  pub fn is_first(&self) -> bool { self.number == 0 }

  pub fn is_last(&self) -> bool { self.number + 1 >= self.total_pages() }

  pub fn has_previous(&self) -> bool { self.number > 0 }

  pub fn has_next(&self) -> bool { self.number + 1 < self.total_pages() }
}

/// Slice `items` to `[offset, min(offset + size, total))`.
///
/// An offset at or past the end yields an empty page; the total is always
/// the length of `items`.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
  let total = items.len();
  let start = request.offset().min(total);
  let end = request.offset().saturating_add(request.size).min(total);

  Page {
    content: items[start..end].to_vec(),
    number:  request.page,
    size:    request.size,
    total,
  }
}
