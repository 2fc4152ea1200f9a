use crate::config::RetryConfig;
use crate::error::PublishError;
use crate::model::RecipeRecord;
use crate::providers::LlmProvider;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Ask the provider for a recipe, retrying with a growing delay.
///
/// Only transient failures (network, API) are retried; a malformed
/// record means the model is not honoring the contract and the run
/// aborts immediately.
pub async fn generate_with_retry(
    provider: &dyn LlmProvider,
    retry: &RetryConfig,
) -> Result<RecipeRecord, PublishError> {
    let attempts = retry.attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        debug!(
            "Generating recipe with {} (attempt {}/{})",
            provider.provider_name(),
            attempt,
            attempts
        );

        match provider.generate_recipe().await {
            Ok(record) => {
                info!("Recipe generated by {}", provider.provider_name());
                return Ok(record);
            }
            Err(e) => {
                // A publish error that is not retryable aborts the run
                let error_msg = match e.downcast::<PublishError>() {
                    Ok(publish) if !publish.is_retryable() => return Err(*publish),
                    Ok(publish) => publish.to_string(),
                    Err(other) => other.to_string(),
                };

                warn!(
                    "Provider {} failed (attempt {}/{}): {}",
                    provider.provider_name(),
                    attempt,
                    attempts,
                    error_msg
                );
                last_error = Some(error_msg);

                if attempt < attempts {
                    let delay = Duration::from_millis(retry.delay_ms * attempt as u64);
                    debug!("Waiting {:?} before retry", delay);
                    sleep(delay).await;
                }
            }
        }
    }

    Err(PublishError::Provider(
        last_error.unwrap_or_else(|| "no attempts were made".to_string()),
    ))
}
