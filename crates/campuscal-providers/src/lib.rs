//! SourceAdapter trait and implementations.
//!
//! This crate provides the layer between remote calendar sources and the
//! aggregation engine:
//!
//! - [`SourceAdapter`] - The trait every source implements
//! - [`RawEvent`] - A source record before date normalization
//! - [`to_event`] - Conversion of a raw record into an indexed [`Event`](campuscal_core::Event)
//! - [`ApiClient`] - JSON-over-HTTP client shared by the adapters
//! - [`ProviderError`] - Error types for adapter operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐ ┌────────────┐ ┌─────────────┐ ┌──────────┐
//! │ Holidays │ │ Class days │ │ Assignments │ │  Events  │
//! └────┬─────┘ └─────┬──────┘ └──────┬──────┘ └────┬─────┘
//!      │             │               │             │
//!      └─────────────┴─ SourceAdapter┴─────────────┘
//!                           │ fetch()
//!                           ▼
//!                     ┌───────────┐
//!                     │ RawEvent  │
//!                     └─────┬─────┘
//!                           ▼ to_event()
//!                     ┌───────────┐
//!                     │   Event   │
//!                     └───────────┘
//! ```

pub mod adapter;
pub mod error;
pub mod http;
pub mod normalize;
pub mod raw_event;
pub mod sources;

// Re-export main types at crate root
pub use adapter::{BoxFuture, ErrorAdapter, SourceAdapter, StaticAdapter};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use http::{ApiClient, ApiConfig};
pub use normalize::{to_event, to_event_in, to_events};
pub use raw_event::{
    ASSIGNMENT_COLOR, CLASS_DAY_COLOR, EVENT_COLOR, HOLIDAY_COLOR, QUIZ_COLOR, RawEvent,
    SourceKind,
};
pub use sources::{
    ActiveTerm, AssignmentAdapter, ClassDayAdapter, GenericEventAdapter, HolidayAdapter,
};
