//! Device model catalog domain.
//!
//! # Module Structure
//!
//! - `model`: Model records as served by `/models/` and their grouped form
//! - `ordering`: Grouping, type ordering, display names and signal-chain sorts

mod model;
pub mod ordering;

pub use model::{Model, ModelSummary, ModelsByType, OTHER_MODEL_TYPE};
pub use ordering::{
    PREFERRED_TYPE_ORDER, compare_display_names, display_name, group_by_type,
    sort_by_signal_chain, sort_by_type_preference, type_order,
};
