//! Fixed-size windows over the record sequence. Pages are 1-based.

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

pub fn visible_slice<T>(records: &[T], current_page: usize, page_size: usize) -> &[T] {
    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// Zero pages still count as one for bounds.
pub fn next_page(current: usize, total: usize) -> usize {
    (current + 1).min(total.max(1))
}

pub fn previous_page(current: usize) -> usize {
    current.saturating_sub(1).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    page_size: usize,
}

impl Pager {
    /// `page_size` must be greater than zero, see `Cfg::validate`.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    pub fn next(&mut self, len: usize) -> usize {
        self.current_page = next_page(self.current_page, self.total_pages(len));
        self.current_page
    }

    pub fn previous(&mut self) -> usize {
        self.current_page = previous_page(self.current_page);
        self.current_page
    }

    pub fn go_to(&mut self, page: usize, len: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages(len).max(1));
        self.current_page
    }

    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        visible_slice(records, self.current_page, self.page_size)
    }

    pub fn previous_disabled(&self) -> bool {
        self.current_page <= 1
    }

    pub fn next_disabled(&self, len: usize) -> bool {
        self.current_page >= self.total_pages(len).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_length_law() {
        for n in 0..50usize {
            let records: Vec<usize> = (0..n).collect();
            for page_size in 1..8usize {
                for page in 1..=(n / page_size + 3) {
                    let start = (page - 1) * page_size;
                    let expect = if start >= n { 0 } else { page_size.min(n - start) };
                    let s = visible_slice(&records, page, page_size);
                    assert_eq!(s.len(), expect, "n={n} size={page_size} page={page}");
                    if expect > 0 {
                        assert_eq!(s[0], start);
                    }
                }
            }
        }
    }

    #[test]
    fn bounds_are_idempotent() {
        assert_eq!(next_page(3, 3), 3);
        assert_eq!(next_page(2, 3), 3);
        assert_eq!(previous_page(1), 1);
        assert_eq!(previous_page(2), 1);
        assert_eq!(next_page(1, 0), 1);
    }

    #[test]
    fn forty_five_records() {
        let records = vec![(); 45];
        let mut pager = Pager::new(20);
        assert_eq!(pager.total_pages(records.len()), 3);
        assert!(pager.previous_disabled());
        assert!(!pager.next_disabled(records.len()));
        pager.next(records.len());
        pager.next(records.len());
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.slice(&records).len(), 5);
        assert!(pager.next_disabled(records.len()));
        assert_eq!(pager.next(records.len()), 3);
        assert!(!pager.previous_disabled());
    }

    #[test]
    fn empty_disables_both() {
        let records: Vec<()> = Vec::new();
        let mut pager = Pager::new(20);
        assert_eq!(pager.total_pages(0), 0);
        assert!(pager.previous_disabled());
        assert!(pager.next_disabled(0));
        assert_eq!(pager.next(0), 1);
        assert!(pager.slice(&records).is_empty());
    }

    #[test]
    fn go_to_clamps() {
        let mut pager = Pager::new(10);
        assert_eq!(pager.go_to(7, 25), 3);
        assert_eq!(pager.go_to(0, 25), 1);
        assert_eq!(pager.go_to(2, 25), 2);
        assert_eq!(pager.go_to(5, 0), 1);
    }
}
