//! Live views: poll a page and redraw it whenever its state changes

use crate::error::ConsoleResult;
use crate::render::{render_snapshot, OutputFormat, Render};
use dispatch_sync::{Poller, PollerConfig, Refresh};
use serde::Serialize;
use std::future::Future;
use std::io::Write;
use tracing::{debug, info};

/// ANSI clear-screen and cursor-home
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Redraw settings
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOptions {
    /// Output encoding
    pub format: OutputFormat,
    /// Clear the terminal before each frame
    pub clear_screen: bool,
}

/// Poll `refresh` and write a frame to `out` on every state change until
/// `shutdown` resolves
///
/// Failed cycles are drawn under the last good data rather than ending the
/// watch. Returns the number of frames written.
///
/// # Errors
/// Writing to `out` failed, or a frame could not be encoded.
pub async fn watch<R, W, S>(
    refresh: R,
    config: PollerConfig,
    options: WatchOptions,
    out: &mut W,
    shutdown: S,
) -> ConsoleResult<usize>
where
    R: Refresh,
    R::Output: Render + Serialize,
    W: Write,
    S: Future<Output = ()>,
{
    let name = refresh.name().to_string();
    let poller = Poller::spawn(refresh, config);
    let mut changes = poller.subscribe();
    tokio::pin!(shutdown);

    info!(view = %name, "watching");
    let mut frames = 0;
    let result = loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break Ok(frames),
            changed = changes.changed() => {
                if changed.is_err() {
                    break Ok(frames);
                }
                let snapshot = poller.state().snapshot();
                let frame = match render_snapshot(&snapshot, options.format) {
                    Ok(frame) => frame,
                    Err(err) => break Err(err),
                };
                let written = if options.clear_screen {
                    write!(out, "{CLEAR}{frame}")
                } else {
                    write!(out, "{frame}")
                };
                if let Err(err) = written.and_then(|()| out.flush()) {
                    break Err(err.into());
                }
                frames += 1;
                debug!(view = %name, seq = snapshot.applied_seq, "frame drawn");
            }
        }
    };

    poller.stop().await;
    info!(view = %name, frames, "watch ended");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{AdminOrders, SharedApi};
    use dispatch_test_utils::fixtures::order;
    use dispatch_test_utils::FakeApi;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn draws_a_frame_per_refresh_until_shutdown() {
        let api: SharedApi =
            Arc::new(FakeApi::new().with_orders(vec![order("o-1", "v-1", "10", "delivered")]));
        let mut out = Vec::new();

        let frames = watch(
            AdminOrders::new(api),
            PollerConfig::every(Duration::from_secs(10)),
            WatchOptions::default(),
            &mut out,
            tokio::time::sleep(Duration::from_secs(25)),
        )
        .await
        .unwrap();

        assert_eq!(frames, 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("=== Orders ===").count(), 3);
        assert!(!text.contains(CLEAR));
    }
}
