//! Vision-model chart summaries

use std::sync::Arc;

use chartbot_llm::{CompletionRequest, ImageSource, LLMProvider, Message};
use tracing::{error, info, warn};

/// Instruction sent along with the chart image
pub const ANALYSIS_PROMPT: &str = "Analyze this chart and provide a concise summary and macro impact analysis. Keep the response under 800 characters.";

/// Vision-capable model used unless overridden
pub const ANALYSIS_MODEL: &str = "gpt-4o";

const MAX_TOKENS: usize = 400;

/// Summarizes chart screenshots
pub struct ChartAnalyzer {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl ChartAnalyzer {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            model: ANALYSIS_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Summary of the PNG chart image, or `None` when the model fails or
    /// answers with nothing
    pub async fn analyze(&self, png: &[u8]) -> Option<String> {
        let request = CompletionRequest::new(self.model.clone())
            .with_message(Message::user_with_image(ANALYSIS_PROMPT, ImageSource::png(png)))
            .with_max_tokens(MAX_TOKENS);

        match self.provider.complete(request).await {
            Ok(response) => {
                let summary = response.message.text().map(str::to_string);
                match &summary {
                    Some(_) => info!(tokens = response.usage.total(), "Generated chart summary"),
                    None => warn!("Chart summary came back empty"),
                }
                summary
            }
            Err(e) => {
                error!(provider = self.provider.name(), "Error generating chart summary: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartbot_llm::{CompletionResponse, LLMError, StopReason, TokenUsage};
    use mockall::mock;

    mock! {
        Provider {}

        #[async_trait::async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> chartbot_llm::Result<CompletionResponse>;
            fn name(&self) -> &'static str;
        }
    }

    fn reply(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 800,
                output_tokens: 90,
            },
        }
    }

    #[tokio::test]
    async fn test_analysis_request() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .withf(|request| {
                let message = &request.messages[0];
                let images: Vec<_> = message.images().collect();
                request.model == "gpt-4o"
                    && request.max_tokens == 400
                    && request.system.is_none()
                    && message.text() == Some(ANALYSIS_PROMPT)
                    && images.len() == 1
                    && images[0].to_url() == "data:image/png;base64,iVBORw=="
            })
            .times(1)
            .returning(|_| Ok(reply(" SOL fees doubled while TVL held flat. ")));

        let analyzer = ChartAnalyzer::new(Arc::new(provider));
        let summary = analyzer.analyze(b"\x89PNG").await;
        assert_eq!(summary.as_deref(), Some("SOL fees doubled while TVL held flat."));
    }

    #[tokio::test]
    async fn test_model_override() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .withf(|request| request.model == "gpt-4o-mini")
            .returning(|_| Ok(reply("ok")));

        let analyzer = ChartAnalyzer::new(Arc::new(provider)).with_model("gpt-4o-mini");
        assert_eq!(analyzer.analyze(b"png").await.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_failures_give_none() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Err(LLMError::RateLimitExceeded("slow down".to_string())));
        assert_eq!(ChartAnalyzer::new(Arc::new(provider)).analyze(b"png").await, None);

        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete().returning(|_| Ok(reply("  ")));
        assert_eq!(ChartAnalyzer::new(Arc::new(provider)).analyze(b"png").await, None);
    }
}
