/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Fire-and-forget async tasks. Results come back through the app's
//! completion queue, never through a join handle.

use std::future::Future;

/// Browser: run on the page's event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Native: run on the tokio runtime entered in `main`.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(future);
}

/// Browser: no worker threads, so the closure runs inline on the event loop.
#[cfg(target_arch = "wasm32")]
pub async fn blocking<F, R>(work: F) -> Result<R, String>
where
    F: FnOnce() -> R + 'static,
    R: 'static,
{
    Ok(work())
}

/// Native: move file IO and image decoding off the async workers.
#[cfg(not(target_arch = "wasm32"))]
pub async fn blocking<F, R>(work: F) -> Result<R, String>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| format!("background task failed: {}", e))
}
