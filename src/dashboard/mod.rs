pub mod catalog;
pub mod dashboard;
pub mod drag;
pub mod layout;
pub mod view;

pub use catalog::{WidgetCatalog, WidgetDescriptor, WidgetSize};
pub use dashboard::{ConfirmPrompt, Dashboard};
pub use drag::{DragController, DragSession, DropEffect, DropOutcome, DropTarget};
pub use layout::{LayoutEntry, LayoutStore, LAYOUT_STORAGE_KEY};
pub use view::{BoardView, DropZone, WidgetBoard, WidgetNode};
