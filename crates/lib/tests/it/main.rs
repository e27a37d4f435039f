/*! Integration tests for Virtdeck.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - access: Identity loading and permission evaluation through the facade
 * - console: Dispatcher behavior (authorization, refresh scheduling, error
 *   asymmetry)
 * - http: HTTP bridge transport against a live in-test endpoint
 * - store: Snapshot replacement, staleness and phase tracking
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("virtdeck=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod access;
mod helpers;
mod http;
mod store;
