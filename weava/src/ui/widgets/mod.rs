//! TUI widgets for the story reader

pub mod choices;
pub mod history;
pub mod input;
pub mod segment;

pub use choices::ChoiceListWidget;
pub use history::HistoryWidget;
pub use input::SeedInputWidget;
pub use segment::SegmentWidget;
