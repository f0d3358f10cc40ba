use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Token cancelled once `timeout` elapses or on Ctrl-C, whichever comes first.
pub fn command_token(timeout: Duration) -> CancellationToken {
    let token = CancellationToken::new();
    let guard = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = guard.cancelled() => {}
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "deadline exceeded; cancelling");
                guard.cancel();
            }
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::warn!("interrupted; cancelling");
                    guard.cancel();
                }
            }
        }
    });
    token
}
