use crate::error::Result;
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt, TryStreamExt};
use std::pin::Pin;

/// Lazy, finite sequence of generated text fragments. Cannot be restarted.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// An external text-generation service: prompt in, text out
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    /// Open a generation and return its fragments as they arrive
    async fn stream(&self, prompt: &str) -> Result<FragmentStream>;

    /// Run a generation to completion and return the full text
    async fn generate(&self, prompt: &str) -> Result<String> {
        let fragments = self.stream(prompt).await?;
        collect_fragments(fragments).await
    }
}

/// Fold every fragment into one string, failing on the first error.
pub async fn collect_fragments<S>(fragments: S) -> Result<String>
where
    S: Stream<Item = Result<String>>,
{
    fragments
        .try_fold(String::new(), |mut text, fragment| async move {
            text.push_str(&fragment);
            Ok(text)
        })
        .await
}

/// Like [`collect_fragments`], handing each fragment to `on_fragment` first.
///
/// On error the partial text is dropped.
pub async fn collect_fragments_with<S, F>(mut fragments: S, mut on_fragment: F) -> Result<String>
where
    S: Stream<Item = Result<String>> + Unpin,
    F: FnMut(&str),
{
    let mut text = String::new();
    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        on_fragment(&fragment);
        text.push_str(&fragment);
    }
    Ok(text)
}
