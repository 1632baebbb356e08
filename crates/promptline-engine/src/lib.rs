pub mod engine;
pub mod host;
pub mod listener;
pub mod position;
pub mod scheduler;

pub use engine::SuggestionEngine;
pub use host::{BufferElement, CaretCoordinates, CaretPosition, CaretReader, EndOfTextReader, HostElement, Rect};
pub use listener::SuggestionListener;
pub use position::{popup_position, PopupPosition};
pub use scheduler::{ManualScheduler, ScheduledTask, Scheduler, TokioScheduler};
