use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use log::{debug, trace, error};
use std::time::Duration;

use crate::config::HumanizerConfig;
use crate::error::Error;

/// Style directive attached to every request
pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert editor specializing in transforming AI-generated text into natural, human-like content.
Your task is to rewrite the provided text, ensuring it retains the original meaning while adopting a more authentic human voice.
Key objectives:
1.  **Vary Sentence Structure:** Mix long, complex sentences with shorter, punchier ones. Avoid monotonous sentence patterns common in AI writing.
2.  **Use Natural Language:** Incorporate common idioms, phrasal verbs, and contractions (e.g., \"don't\" instead of \"do not\") where appropriate.
3.  **Inject Personality:** Introduce a subtle tone, whether it's conversational, persuasive, or analytical, depending on the context. Avoid being robotic and overly formal.
4.  **Improve Flow:** Ensure smooth transitions between ideas. Use connecting phrases that a human writer would naturally use.
5.  **Eliminate AI Hallmarks:** Remove repetitive phrases, redundant explanations, and overly generic statements like \"In conclusion,\" or \"It is important to note that...\".
6.  **Ensure Originality:** The output must be free of any AI watermarking, embedding symbols, or hidden patterns. It should be completely original and pass AI detection tools.
Your output should be ONLY the rewritten text, without any preamble or explanation.";

// ===== Wire Types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
  , #[serde(default)]
    pub parts: Vec<Part>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   pub temperature: f32
  , pub top_p: f32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub system_instruction: Content
  , pub generation_config: GenerationConfig
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   pub content: Option<Content>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

impl GenerateContentRequest
{   pub fn new(text: &str, temperature: f32, top_p: f32) -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   role: Some("user".to_string())
                , parts: vec![Part { text: Some(text.to_string()) }]
              }
            ]
          , system_instruction: Content
            {   role: None
              , parts: vec![
                  Part { text: Some(SYSTEM_INSTRUCTION.to_string()) }
                ]
            }
          , generation_config: GenerationConfig
            {   temperature
              , top_p
            }
        }
    }
}

impl GenerateContentResponse
{   /// Text of the first candidate, all text parts joined.
    /// None when there is no candidate or it carries no text part.
    pub fn text(&self) -> Option<String>
    {   let content = self.candidates.first()?.content.as_ref()?;
        let pieces: Vec<&str> = content.parts
          .iter()
          .filter_map(|p| p.text.as_deref())
          .collect();
        if pieces.is_empty()
        {   None
        } else
        {   Some(pieces.concat())
        }
    }
}

// ===== Gemini Client =====

/// Gemini `generateContent` client. Holds no per-call state.
pub struct GeminiClient
{   api_key: String
  , model: String
  , api_base: String
  , http_client: reqwest::Client
}

impl GeminiClient
{   /// Build a client from startup configuration.
    /// Refuses to construct without a credential.
    pub fn new(config: &HumanizerConfig) -> Result<Self, Error>
    {   debug!("Creating GeminiClient for model: {}", config.model);

        if config.api_key.trim().is_empty()
        {   error!("Refusing to build GeminiClient without API key");
            return Err(Error::MissingApiKey("API_KEY".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::InvalidConfiguration(e.to_string())
        })?;

        Ok(GeminiClient
        {   api_key: config.api_key.clone()
          , model: config.model.clone()
          , api_base: config.api_base.trim_end_matches('/').to_string()
          , http_client
        })
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    fn endpoint(&self) -> String
    {   format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Rewrite `text` with the given sampling. Any failure collapses to
    /// `Error::GenerationFailed`; the cause is logged.
    pub async fn humanize_text(
      &self
    , text: &str
    , temperature: f32
    , top_p: f32
    ) -> Result<String, Error>
    {   self.generate(text, temperature, top_p)
          .await
          .map_err(|cause| {
            error!("Error calling Gemini API: {}", cause);
            Error::GenerationFailed
          })
    }

    /// One uncollapsed request
    async fn generate(
      &self
    , text: &str
    , temperature: f32
    , top_p: f32
    ) -> Result<String, Error>
    {   debug!(
          "Sending {} chars to {} (temperature={}, top_p={})",
          text.len(), self.model, temperature, top_p
        );

        let request = GenerateContentRequest::new(text, temperature, top_p);
        trace!("Gemini request config: {:?}", request.generation_config);

        let response = self.http_client
          .post(self.endpoint())
          .header("x-goog-api-key", self.api_key.as_str())
          .header("Content-Type", "application/json")
          .json(&request)
          .send()
          .await
          .map_err(classify_transport)?;

        let status = response.status();
        trace!("Gemini response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            return Err(Error::ApiError
            {   status: status.as_u16()
              , message: error_text
            });
        }

        let body: GenerateContentResponse = response
          .json()
          .await
          .map_err(|e| Error::ParseError(e.to_string()))?;

        if let Some(reason) = body.candidates
          .first()
          .and_then(|c| c.finish_reason.as_deref())
        {   trace!("Finish reason: {}", reason);
        }

        let text = body.text().ok_or(Error::EmptyResponse)?;
        debug!("Gemini returned {} chars", text.len());
        Ok(text.trim().to_string())
    }
}

fn classify_transport(e: reqwest::Error) -> Error
{   if e.is_timeout()
    {   Error::Timeout
    } else
    {   Error::HttpError(e.to_string())
    }
}

#[async_trait]
impl super::Humanize for GeminiClient
{   async fn humanize(
      &self
    , request: &crate::HumanizeRequest
    ) -> Result<String, Error>
    {   self.humanize_text(
          &request.text,
          request.sampling.temperature,
          request.sampling.top_p
        ).await
    }
}
