//! Driver capability consumed by built-in component actions.
//!
//! Real browser drivers live outside this crate; they implement
//! [`AutomationDriver`] and are handed to an
//! [`AutomationContext`](crate::AutomationContext). [`MockDriver`] is an
//! in-memory implementation for unit tests.
//!
//! Methods take `&self`: a driver is a session handle shared by every
//! component bound to the same context. Drivers that track state use
//! interior mutability.

use crate::context::SwitchPath;
use crate::selector::Selector;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Result type for driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised by a driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// No element matched the selector
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that failed to match
        selector: String,
    },

    /// A switch-path entry could not be entered
    #[error("Frame not found: {selector}")]
    FrameNotFound {
        /// Selector of the missing frame
        selector: String,
    },

    /// Driver command failed
    #[error("Driver command failed: {message}")]
    Command {
        /// Error message
        message: String,
    },
}

impl DriverError {
    /// Element lookup failure for `selector`
    #[must_use]
    pub fn element_not_found(selector: &Selector) -> Self {
        Self::ElementNotFound {
            selector: selector.to_string(),
        }
    }

    /// Generic command failure
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }
}

/// Browser automation capability used by component actions
pub trait AutomationDriver {
    /// Enter every scope of `path` in order, starting from the top-level
    /// document. An empty path returns to the top-level document.
    fn switch_to(&self, path: &SwitchPath) -> DriverResult<()>;

    /// Click the element
    fn click(&self, selector: &Selector) -> DriverResult<()>;

    /// Replace the element's value with `value`
    fn fill(&self, selector: &Selector, value: &str) -> DriverResult<()>;

    /// Visible text of the element
    fn text(&self, selector: &Selector) -> DriverResult<String>;

    /// Whether the element is displayed
    fn is_visible(&self, selector: &Selector) -> DriverResult<bool>;

    /// Attribute value, `None` when absent
    fn attribute(&self, selector: &Selector, name: &str) -> DriverResult<Option<String>>;

    /// Number of elements matching the selector
    fn count(&self, selector: &Selector) -> DriverResult<usize>;
}

/// Element registered with a [`MockDriver`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Element text content
    pub text_content: String,
    /// Whether the element is displayed
    pub visible: bool,
    /// Element attributes
    pub attributes: HashMap<String, String>,
}

impl MockElement {
    /// Visible element with the given text
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text_content: text.into(),
            visible: true,
            attributes: HashMap::new(),
        }
    }

    /// Set visibility
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    elements: HashMap<Selector, MockElement>,
    counts: HashMap<Selector, usize>,
    frames: Vec<Selector>,
    values: Mutex<HashMap<Selector, String>>,
    call_history: Mutex<Vec<String>>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element
    #[must_use]
    pub fn with_element(mut self, selector: Selector, element: MockElement) -> Self {
        let _ = self.elements.insert(selector, element);
        self
    }

    /// Register the match count for a selector
    #[must_use]
    pub fn with_count(mut self, selector: Selector, count: usize) -> Self {
        let _ = self.counts.insert(selector, count);
        self
    }

    /// Register a frame that `switch_to` may enter
    #[must_use]
    pub fn with_frame(mut self, selector: Selector) -> Self {
        self.frames.push(selector);
        self
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(method))
    }

    /// Number of recorded calls
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Value last written by `fill`
    #[must_use]
    pub fn value_of(&self, selector: &Selector) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(selector)
            .cloned()
    }

    fn record(&self, call: String) {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn element(&self, selector: &Selector) -> DriverResult<&MockElement> {
        self.elements
            .get(selector)
            .ok_or_else(|| DriverError::element_not_found(selector))
    }
}

impl AutomationDriver for MockDriver {
    fn switch_to(&self, path: &SwitchPath) -> DriverResult<()> {
        self.record(format!("switch_to:{path}"));
        match path.iter().find(|frame| !self.frames.contains(frame)) {
            Some(missing) => Err(DriverError::FrameNotFound {
                selector: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn click(&self, selector: &Selector) -> DriverResult<()> {
        self.record(format!("click:{selector}"));
        self.element(selector).map(|_| ())
    }

    fn fill(&self, selector: &Selector, value: &str) -> DriverResult<()> {
        self.record(format!("fill:{selector}"));
        let _ = self.element(selector)?;
        let _ = self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(selector.clone(), value.to_string());
        Ok(())
    }

    fn text(&self, selector: &Selector) -> DriverResult<String> {
        self.record(format!("text:{selector}"));
        self.element(selector).map(|e| e.text_content.clone())
    }

    fn is_visible(&self, selector: &Selector) -> DriverResult<bool> {
        self.record(format!("is_visible:{selector}"));
        Ok(self.elements.get(selector).is_some_and(|e| e.visible))
    }

    fn attribute(&self, selector: &Selector, name: &str) -> DriverResult<Option<String>> {
        self.record(format!("attribute:{selector}:{name}"));
        self.element(selector)
            .map(|e| e.attributes.get(name).cloned())
    }

    fn count(&self, selector: &Selector) -> DriverResult<usize> {
        self.record(format!("count:{selector}"));
        Ok(self
            .counts
            .get(selector)
            .copied()
            .unwrap_or_else(|| usize::from(self.elements.contains_key(selector))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod mock_element_tests {
        use super::*;

        #[test]
        fn test_with_text_is_visible() {
            let element = MockElement::with_text("Alice");
            assert_eq!(element.text_content, "Alice");
            assert!(element.visible);
        }

        #[test]
        fn test_builder() {
            let element = MockElement::default()
                .visible(false)
                .attribute("data-state", "open");
            assert!(!element.visible);
            assert_eq!(element.attributes.get("data-state").map(String::as_str), Some("open"));
        }
    }

    mod mock_driver_tests {
        use super::*;

        #[test]
        fn test_mock_driver_creation() {
            let driver = MockDriver::new();
            assert!(driver.history().is_empty());
            assert_eq!(driver.call_count(), 0);
            assert!(!driver.was_called("click"));
        }

        #[test]
        fn test_text_lookup() {
            let sel = Selector::css("#name");
            let driver = MockDriver::new().with_element(sel.clone(), MockElement::with_text("Ada"));
            assert_eq!(driver.text(&sel).unwrap(), "Ada");
            assert!(driver.was_called("text:#name"));
        }

        #[test]
        fn test_missing_element() {
            let driver = MockDriver::new();
            let err = driver.click(&Selector::css("#nope")).unwrap_err();
            assert_eq!(
                err,
                DriverError::ElementNotFound {
                    selector: "#nope".to_string()
                }
            );
        }

        #[test]
        fn test_fill_records_value() {
            let sel = Selector::css("input");
            let driver = MockDriver::new().with_element(sel.clone(), MockElement::default());
            driver.fill(&sel, "hello").unwrap();
            assert_eq!(driver.value_of(&sel).as_deref(), Some("hello"));
        }

        #[test]
        fn test_count_defaults() {
            let sel = Selector::css("li");
            let driver = MockDriver::new()
                .with_element(Selector::css("#one"), MockElement::default())
                .with_count(sel.clone(), 7);
            assert_eq!(driver.count(&sel).unwrap(), 7);
            assert_eq!(driver.count(&Selector::css("#one")).unwrap(), 1);
            assert_eq!(driver.count(&Selector::css("#none")).unwrap(), 0);
        }

        #[test]
        fn test_switch_to_known_frames() {
            let frame = Selector::css("iframe#app");
            let driver = MockDriver::new().with_frame(frame.clone());
            assert!(driver.switch_to(&SwitchPath::from(vec![frame])).is_ok());
            assert!(driver.switch_to(&SwitchPath::new()).is_ok());
        }

        #[test]
        fn test_switch_to_unknown_frame() {
            let driver = MockDriver::new();
            let err = driver
                .switch_to(&SwitchPath::from(vec![Selector::css("iframe#missing")]))
                .unwrap_err();
            assert!(matches!(err, DriverError::FrameNotFound { .. }));
        }

        #[test]
        fn test_invisible_and_missing_are_not_visible() {
            let hidden = Selector::css(".hidden");
            let driver =
                MockDriver::new().with_element(hidden.clone(), MockElement::default().visible(false));
            assert!(!driver.is_visible(&hidden).unwrap());
            assert!(!driver.is_visible(&Selector::css(".absent")).unwrap());
        }
    }
}
