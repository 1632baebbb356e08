use crate::host::{CaretReader, HostElement};

/// Where to put the suggestion popup.
///
/// `(x, y)` is the popup's top-left when shown below the anchor. `height` is
/// the anchor's own height, needed to flip the popup above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPosition {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

impl PopupPosition {
    /// Top edge for a popup of `popup_height`: below the anchor when it fits
    /// in the viewport, otherwise above it.
    pub fn place(&self, popup_height: f64, viewport_height: f64) -> f64 {
        if self.y + popup_height <= viewport_height {
            self.y
        } else {
            (self.y - self.height - popup_height).max(0.0)
        }
    }
}

/// Prefer the caret's line; fall back to just below the element's bounding box.
pub fn popup_position(element: &dyn HostElement, reader: &dyn CaretReader) -> PopupPosition {
    if let Some(caret) = reader.caret_coordinates(element) {
        return PopupPosition {
            x: caret.x,
            y: caret.y + caret.height,
            height: caret.height,
        };
    }
    let rect = element.bounding_rect();
    PopupPosition {
        x: rect.left,
        y: rect.bottom(),
        height: rect.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BufferElement, CaretCoordinates, CaretPosition, EndOfTextReader, Rect};

    struct FixedCoords(CaretCoordinates);

    impl CaretReader for FixedCoords {
        fn caret_position(&self, _element: &dyn HostElement) -> CaretPosition {
            CaretPosition::default()
        }

        fn caret_coordinates(&self, _element: &dyn HostElement) -> Option<CaretCoordinates> {
            Some(self.0)
        }
    }

    fn element() -> BufferElement {
        BufferElement::new(Rect {
            left: 10.0,
            top: 100.0,
            width: 400.0,
            height: 60.0,
        })
    }

    #[test]
    fn test_prefers_caret_coordinates() {
        let reader = FixedCoords(CaretCoordinates {
            x: 42.0,
            y: 120.0,
            height: 18.0,
        });
        let pos = popup_position(&element(), &reader);
        assert_eq!(
            pos,
            PopupPosition {
                x: 42.0,
                y: 138.0,
                height: 18.0
            }
        );
    }

    #[test]
    fn test_falls_back_to_bounding_box() {
        let pos = popup_position(&element(), &EndOfTextReader);
        assert_eq!(
            pos,
            PopupPosition {
                x: 10.0,
                y: 160.0,
                height: 60.0
            }
        );
    }

    #[test]
    fn test_place_below_when_it_fits() {
        let pos = PopupPosition {
            x: 0.0,
            y: 138.0,
            height: 18.0,
        };
        assert_eq!(pos.place(200.0, 800.0), 138.0);
    }

    #[test]
    fn test_place_flips_above() {
        let pos = PopupPosition {
            x: 0.0,
            y: 700.0,
            height: 20.0,
        };
        assert_eq!(pos.place(200.0, 800.0), 480.0);
        let top = PopupPosition {
            x: 0.0,
            y: 50.0,
            height: 20.0,
        };
        assert_eq!(top.place(200.0, 100.0), 0.0);
    }
}
