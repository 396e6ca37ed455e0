//! Folds an event stream into the final response string.

use futures::StreamExt;
use travel_core::{EventStream, Part, Result};

/// Await the whole stream, appending text fragments in arrival order.
/// Function calls and tool results pass through untouched; the first error
/// ends collection and is returned to the caller.
pub async fn collect_response(mut events: EventStream) -> Result<String> {
    let mut response = String::new();

    while let Some(event) = events.next().await {
        let event = event?;
        if let Some(content) = event.content() {
            for part in &content.parts {
                if let Part::Text { text } = part {
                    response.push_str(text);
                }
            }
        }
    }

    Ok(response)
}
