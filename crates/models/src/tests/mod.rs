/// Payload parsing, validation and default-merging
pub mod payload_tests;

/// Entity round-trips against a live database (`DATABASE_URL`)
pub mod schema_tests;
