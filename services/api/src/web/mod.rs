pub mod extract;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder so the binary and the tests can mount the app.
pub use router::create_router;
pub use state::AppState;
