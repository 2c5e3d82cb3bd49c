use std::time::Duration;

use common::error::Res;
use tokio::time::sleep;

/// Stand-in for the model call that produces a course outline. The
/// real integration lives behind this boundary; what matters here is
/// that it is slow, can fail, and runs between the limit check and the
/// usage commit.
pub async fn generate_course_outline(topic: &str) -> Res<String> {
    log::info!("Generating course outline for '{}'", topic);
    sleep(Duration::from_millis(1200)).await;
    Ok(format!("{}: a guided course", topic))
}
