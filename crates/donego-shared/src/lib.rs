//! Checklist state shared by the terminal and browser front-ends.
//!
//! Everything in here compiles for both native targets and
//! `wasm32-unknown-unknown`: the data model, the id generator, the
//! built-in library, the reducers, the view filters and the
//! persistence adapter over an abstract key/value slot.

pub mod catalog;
pub mod highlight;
pub mod ids;
pub mod model;
pub mod persist;
pub mod store;
pub mod view;

pub use highlight::{
  Segment,
  highlight
};
pub use ids::{
  IdSource,
  SequentialIds,
  TimestampIds
};
pub use model::{
  Checklist,
  LIBRARY_CATEGORY,
  MINE_CATEGORY,
  Stats,
  Store,
  Task
};
pub use persist::{
  KeyValueStore,
  MemoryStore,
  Persistence,
  Theme
};
pub use store::{
  Command,
  Effect,
  TrackEvent,
  Transition,
  reduce
};
pub use view::{
  CategoryFilter,
  ViewMode,
  ViewState
};
