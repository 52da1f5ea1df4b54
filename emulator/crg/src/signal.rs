// Licensed under the Apache-2.0 license

//! Single-writer signals.
//!
//! A [`Signal`] is the only handle able to drive a line and is not `Clone`.
//! Every other component observes the line through a [`SignalView`]. Writes
//! are visible to all views immediately, there is no buffering between the
//! driver and its loads.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub struct Signal<T: Copy> {
    name: &'static str,
    value: Rc<Cell<T>>,
}

impl<T: Copy> Signal<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            value: Rc::new(Cell::new(initial)),
        }
    }

    pub fn set(&mut self, value: T) {
        self.value.set(value);
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read-only handle on this line.
    pub fn view(&self) -> SignalView<T> {
        SignalView {
            name: self.name,
            value: self.value.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SignalView<T: Copy> {
    name: &'static str,
    value: Rc<Cell<T>>,
}

impl<T: Copy> SignalView<T> {
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.get())
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for SignalView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_follows_driver() {
        let mut line = Signal::new("stop", true);
        let view = line.view();
        let other = view.clone();
        assert!(view.get());
        line.set(false);
        assert!(!view.get());
        assert!(!other.get());
        assert_eq!(other.name(), "stop");
    }

    #[test]
    fn test_debug_format() {
        let line = Signal::new("locked", false);
        assert_eq!(format!("{:?}", line.view()), "locked=false");
    }
}
