/// Position inside a server-paginated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl Page {
    pub fn new(current_page: u32, page_size: u32, total_count: u64) -> Self {
        Page {
            current_page: current_page.max(1),
            page_size: page_size.max(1),
            total_count,
        }
    }

    /// Get total number of pages (at least one, even for an empty list)
    pub fn total_pages(&self) -> u32 {
        let pages = (self.total_count + self.page_size as u64 - 1) / self.page_size as u64;
        pages.max(1) as u32
    }

    pub fn is_last(&self) -> bool {
        self.current_page >= self.total_pages()
    }

    /// The server answered a page past the end
    pub fn is_out_of_range(&self) -> bool {
        self.total_count > 0 && self.current_page > self.total_pages()
    }

    /// Footer line printed under list tables
    pub fn footer(&self) -> String {
        let mut footer = format!(
            "Page {}/{} ({} au total)",
            self.current_page,
            self.total_pages(),
            self.total_count
        );
        if !self.is_last() {
            footer.push_str(&format!(" · suivante: p{}", self.current_page + 1));
        }
        footer
    }
}
