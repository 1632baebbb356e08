//! Seams to the host page: the text-bearing element and the caret reader.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A text-bearing element on the host page.
pub trait HostElement: Send + Sync {
    fn text_content(&self) -> String;
    fn bounding_rect(&self) -> Rect;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretPosition {
    /// Characters from the start of the element's text.
    pub offset: usize,
    /// Line the caret sits on, counted from 0.
    pub newline_count: usize,
}

/// Pixel position of the caret and the height of its line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretCoordinates {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

pub trait CaretReader: Send + Sync {
    fn caret_position(&self, element: &dyn HostElement) -> CaretPosition;

    /// `None` when precise coordinates are unavailable.
    fn caret_coordinates(&self, element: &dyn HostElement) -> Option<CaretCoordinates>;
}

/// Treats the caret as sitting at the end of the element's text. Never has coordinates.
pub struct EndOfTextReader;

impl CaretReader for EndOfTextReader {
    fn caret_position(&self, element: &dyn HostElement) -> CaretPosition {
        let text = element.text_content();
        CaretPosition {
            offset: text.chars().count(),
            newline_count: text.matches('\n').count(),
        }
    }

    fn caret_coordinates(&self, _element: &dyn HostElement) -> Option<CaretCoordinates> {
        None
    }
}

/// An in-memory element, for headless hosts.
#[derive(Debug, Default)]
pub struct BufferElement {
    text: Mutex<String>,
    rect: Rect,
}

impl BufferElement {
    pub fn new(rect: Rect) -> Self {
        Self {
            text: Mutex::new(String::new()),
            rect,
        }
    }

    pub fn set_text(&self, text: &str) {
        let mut guard = self.text.lock().unwrap_or_else(|e| e.into_inner());
        guard.clear();
        guard.push_str(text);
    }
}

impl HostElement for BufferElement {
    fn text_content(&self) -> String {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn bounding_rect(&self) -> Rect {
        self.rect
    }
}
