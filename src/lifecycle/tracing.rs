//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); every session log
//! line carries a `session` field instead.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle events and committed mutations
//! RUST_LOG=info cargo run
//!
//! # Also request payloads (carts, targets)
//! RUST_LOG=debug cargo run
//!
//! # Only the session runtime
//! RUST_LOG=restaurant_orders::framework=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Session Lifecycle**: start, re-sync after a remote write, shutdown with final size
//! - **Mutations**: order placed, status set or advanced, payment recorded
//! - **Rejections**: every failed mutation at `warn`, with the error
//! - **Snapshots**: corrupt snapshots replaced by an empty ledger, at `warn`
//!
//! With `RUST_LOG=info` a checkout and payment look like:
//!
//! ```text
//! INFO Ledger session started session=session_1 key=smartqr_orders_v1 policy=Permissive
//! INFO Order placed session=session_1 id=ORD-000001 total=580 size=1
//! INFO place_order: Order placed id=ORD-000001 total=580
//! INFO Payment recorded session=session_1 id=ORD-000001 total=580
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
