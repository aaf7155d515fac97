/// Router Module Index
///
/// Splits the page table by guard. Each module's router gets exactly one
/// guard layer in `create_router`, so a route's access policy is decided by
/// the module it lives in.

/// Routes without any guard.
pub mod public;

/// Routes only for visitors without a valid session (`reject_if_authenticated`).
pub mod anonymous;

/// Routes behind `require_authenticated`.
pub mod authenticated;

/// Staff-only routes. Mounted behind `require_authenticated`; the membership
/// check happens in the handler.
pub mod admin;
