//! Canonical schema constants for structured logging
//!
//! Log lines emitted by relix use these keys, so test
//! capture and log pipelines can match on them without string drift.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Record identifiers
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_RECORD_ID: &str = "record_id";

// Harness
pub const FIELD_SCENARIO: &str = "scenario";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
