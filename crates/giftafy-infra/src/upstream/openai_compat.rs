//! OpenAI-compatible chat completion as an upstream gift source.
//!
//! Asks the model for a numbered list of gift ideas and runs the reply
//! through the lossy text parser in `giftafy-core`. Works with any server
//! speaking the chat completions API (OpenAI, Ollama, LM Studio, ...).

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::{ExposeSecret, SecretString};

use giftafy_core::search::remote::{UpstreamGiftSource, upstream_query};
use giftafy_core::search::text_parser::parse_gift_text;
use giftafy_types::error::SearchError;
use giftafy_types::function::SearchGiftsRequest;
use giftafy_types::gift::GiftRecord;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You are a gift shopping assistant. Answer with a numbered list of \
5 to 8 specific gift ideas. For each idea give the product name on the numbered line, then \
separate lines starting with 'Price:', 'Retailer:', 'URL:' and 'Why:'. Do not add any other text.";

const MAX_COMPLETION_TOKENS: u32 = 1200;

/// LLM upstream.
///
/// Does NOT derive Debug: the async-openai client holds the API key.
pub struct OpenAiCompatibleSource {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompatibleSource {
    pub fn new(api_key: &SecretString, base_url: Option<&str>, model: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url.unwrap_or(OPENAI_BASE_URL));

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    fn build_request(&self, request: &SearchGiftsRequest) -> CreateChatCompletionRequest {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(SYSTEM_PROMPT.to_string()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user_prompt(request)),
                name: None,
            }),
        ];

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
            temperature: Some(0.7),
            ..Default::default()
        }
    }
}

/// The user turn: the search query plus the budget in words.
pub fn user_prompt(request: &SearchGiftsRequest) -> String {
    let budget = match (request.min_price, request.max_price) {
        (Some(min), Some(max)) => format!(" Budget: between ${min:.0} and ${max:.0}."),
        (Some(min), None) => format!(" Budget: at least ${min:.0}."),
        (None, Some(max)) => format!(" Budget: under ${max:.0}."),
        (None, None) => String::new(),
    };
    format!("Suggest {}.{budget}", upstream_query(request))
}

impl UpstreamGiftSource for OpenAiCompatibleSource {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    async fn fetch_gifts(&self, request: &SearchGiftsRequest) -> Result<Vec<GiftRecord>, SearchError> {
        let response = self
            .client
            .chat()
            .create(self.build_request(request))
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let gifts = parse_gift_text(&content);
        tracing::debug!(
            model = %self.model,
            reply_chars = content.len(),
            gifts = gifts.len(),
            "parsed gift list from completion"
        );
        Ok(gifts)
    }
}

fn map_openai_error(err: async_openai::error::OpenAIError) -> SearchError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            SearchError::Upstream(format!("completion API error: {}", api_err.message))
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status() {
            Some(status) => SearchError::Upstream(format!("completion API returned {status}")),
            None => SearchError::Upstream(format!("completion request failed: {reqwest_err}")),
        },
        OpenAIError::JSONDeserialize(_, content) => {
            SearchError::Upstream(format!("malformed completion response: {content}"))
        }
        _ => SearchError::Upstream(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(min: Option<f64>, max: Option<f64>) -> SearchGiftsRequest {
        SearchGiftsRequest {
            search_terms: "Birthday cooking gift for Friend 26-35".to_string(),
            min_price: min,
            max_price: max,
        }
    }

    #[test]
    fn test_user_prompt_budget_wording() {
        assert_eq!(
            user_prompt(&request(Some(50.0), Some(100.0))),
            "Suggest Birthday cooking gift for Friend 26-35 gift ideas. Budget: between $50 and $100."
        );
        assert!(user_prompt(&request(None, Some(25.0))).ends_with("Budget: under $25."));
        assert!(user_prompt(&request(Some(500.0), None)).ends_with("Budget: at least $500."));
        assert!(user_prompt(&request(None, None)).ends_with("gift ideas."));
    }

    #[test]
    fn test_build_request_uses_model_and_two_messages() {
        let source = OpenAiCompatibleSource::new(
            &SecretString::from("sk-test"),
            Some("http://localhost:11434/v1"),
            "llama3.2",
        );
        let req = source.build_request(&request(None, None));
        assert_eq!(req.model, "llama3.2");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.max_completion_tokens, Some(MAX_COMPLETION_TOKENS));
    }
}
