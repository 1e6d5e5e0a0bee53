/// Router Module Index
///
/// Organizes the application's routing logic into access-segregated
/// modules, so the auth gate is applied explicitly at the module level
/// (via an Axum route layer) rather than remembered per handler.

/// Routes accessible to all users, anonymous included. Handlers here
/// still vary output on the optional session (nav state, `same_user`).
pub mod public;

/// Routes gated by the session middleware. A request without a live
/// session is redirected to /login before any handler body runs.
pub mod authenticated;
