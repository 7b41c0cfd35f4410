use std::cell::Cell;

pub trait PageScroll {
    fn set_scroll_enabled(&self, enabled: bool);
}

/// Scrolling comes back only once the last holder releases.
pub struct ScrollLock {
    page: Box<dyn PageScroll>,
    holders: Cell<u32>,
}

impl ScrollLock {
    pub fn new(page: Box<dyn PageScroll>) -> Self {
        Self {
            page,
            holders: Cell::new(0),
        }
    }

    pub fn acquire(&self) {
        let holders = self.holders.get();
        if holders == 0 {
            self.page.set_scroll_enabled(false);
        }
        self.holders.set(holders.saturating_add(1));
    }

    pub fn release(&self) {
        match self.holders.get() {
            0 => {}
            1 => {
                self.holders.set(0);
                self.page.set_scroll_enabled(true);
            }
            holders => self.holders.set(holders - 1),
        }
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }
}

// Taking or giving back twice in a row is a no-op.
#[derive(Default)]
pub struct ScrollLease {
    held: bool,
}

impl ScrollLease {
    pub fn take(&mut self, lock: &ScrollLock) {
        if !self.held {
            lock.acquire();
            self.held = true;
        }
    }

    pub fn give_back(&mut self, lock: &ScrollLock) {
        if self.held {
            lock.release();
            self.held = false;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::PageScroll;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct RecordingPage {
        pub writes: Rc<RefCell<Vec<bool>>>,
    }

    impl RecordingPage {
        pub fn scroll_enabled(&self) -> bool {
            self.writes.borrow().last().copied().unwrap_or(true)
        }
    }

    impl PageScroll for RecordingPage {
        fn set_scroll_enabled(&self, enabled: bool) {
            self.writes.borrow_mut().push(enabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingPage;
    use super::*;

    #[test]
    fn scroll_returns_only_after_last_release() {
        let page = RecordingPage::default();
        let lock = ScrollLock::new(Box::new(page.clone()));

        lock.acquire();
        lock.acquire();
        assert!(!page.scroll_enabled());

        lock.release();
        assert!(!page.scroll_enabled());
        assert!(lock.is_locked());

        lock.release();
        assert!(page.scroll_enabled());
        assert_eq!(*page.writes.borrow(), vec![false, true]);
    }

    #[test]
    fn release_without_holders_touches_nothing() {
        let page = RecordingPage::default();
        let lock = ScrollLock::new(Box::new(page.clone()));

        lock.release();
        assert!(page.writes.borrow().is_empty());
    }

    #[test]
    fn lease_is_idempotent() {
        let page = RecordingPage::default();
        let lock = ScrollLock::new(Box::new(page.clone()));
        let mut first = ScrollLease::default();
        let mut second = ScrollLease::default();

        first.take(&lock);
        first.take(&lock);
        second.take(&lock);
        first.give_back(&lock);
        first.give_back(&lock);

        assert!(lock.is_locked());
        second.give_back(&lock);
        assert!(!lock.is_locked());
    }
}
