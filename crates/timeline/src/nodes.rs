/// Expanded flags for a timeline's event nodes. At most one is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventNodes {
    open: Vec<bool>,
}

impl EventNodes {
    pub fn new(count: usize) -> Self {
        Self {
            open: vec![false; count],
        }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open.iter().position(|open| *open)
    }

    pub fn flags(&self) -> &[bool] {
        &self.open
    }

    /// Flip one node, closing every sibling. Returns whether it is now open,
    /// or `None` for an unknown index.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let was_open = *self.open.get(index)?;
        for open in self.open.iter_mut() {
            *open = false;
        }
        self.open[index] = !was_open;
        Some(!was_open)
    }
}
