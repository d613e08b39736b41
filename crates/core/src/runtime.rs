//! Runtime bootstrap
//!
//! Everything runs on one monoio thread. The timer driver is always enabled:
//! the HTTP client bounds every request with a timeout and sleeps between
//! retries.

use monoio::{LegacyDriver, RuntimeBuilder};
use std::future::Future;

/// Build a single-threaded runtime with timers and drive `future` to completion.
pub fn block_on<F>(future: F) -> std::io::Result<F::Output>
where
    F: Future,
{
    let mut runtime = RuntimeBuilder::<LegacyDriver>::new()
        .enable_timer()
        .build()?;
    Ok(runtime.block_on(future))
}
