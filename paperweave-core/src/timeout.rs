use std::future::Future;
use std::time::Duration;

use crate::PaperweaveError;

/// Marker substituted for an agent's output when its call outlives the budget.
/// Downstream consumers treat it as ordinary (degraded) text.
pub const TIMEOUT_SENTINEL: &str = "__TIMEOUT__";

/// Runs `operation` with an upper bound on how long the caller will wait.
///
/// On completion within the budget the operation's result is returned
/// unchanged, including its errors. On budget exhaustion the call resolves to
/// `Ok(TIMEOUT_SENTINEL)` and the spawned task is left running to completion
/// in the background — it is abandoned, not cancelled. That leak is the
/// accepted cost of never blocking a graph walk on one slow call.
pub async fn run_with_timeout<F>(
    budget: Duration,
    operation: F,
) -> Result<String, PaperweaveError>
where
    F: Future<Output = Result<String, PaperweaveError>> + Send + 'static,
{
    let budget = budget.max(Duration::from_secs(1));
    let handle = tokio::spawn(operation);
    match tokio::time::timeout(budget, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(PaperweaveError::Custom(format!(
            "agent task aborted: {join_error}"
        ))),
        Err(_elapsed) => Ok(TIMEOUT_SENTINEL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fast_operation_returns_its_result() {
        let result = run_with_timeout(Duration::from_secs(5), async {
            Ok("done".to_string())
        })
        .await
        .unwrap();
        assert_eq!(result, "done");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operation_yields_sentinel_at_the_budget() {
        let started = tokio::time::Instant::now();
        let result = run_with_timeout(Duration::from_secs(2), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        })
        .await
        .unwrap();
        assert_eq!(result, TIMEOUT_SENTINEL);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(2));
        assert!(waited < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn operation_errors_propagate() {
        let result = run_with_timeout(Duration::from_secs(5), async {
            Err::<String, _>(PaperweaveError::LlmProvider("boom".to_string()))
        })
        .await;
        assert!(matches!(result, Err(PaperweaveError::LlmProvider(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn sub_second_budget_is_clamped_to_one_second() {
        let result = run_with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok("made it".to_string())
        })
        .await
        .unwrap();
        assert_eq!(result, "made it");
    }
}
