//! Deterministic stand-ins for the model provider and the page fetcher
//! (testing only). Both count calls so tests can assert which stages ran.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::llm_client::{CompletionPrompt, CompletionProvider, LlmError};
use crate::pipeline::fetcher::{FetchError, PageFetcher, RawDocument};

/// Owned copy of a prompt the provider received.
#[derive(Debug, Clone)]
pub struct RecordedPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Replays queued replies in order; an exhausted queue yields `EmptyContent`.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<RecordedPrompt>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<RecordedPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, prompt: &CompletionPrompt<'_>) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(RecordedPrompt {
            system: prompt.system.to_string(),
            user: prompt.user.to_string(),
            max_tokens: prompt.max_tokens,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Serves one fixed page, or fails every fetch with the given status.
#[derive(Debug)]
pub struct StubFetcher {
    page: Result<String, u16>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn page(text: &str) -> Self {
        Self {
            page: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            page: Err(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.page {
            Ok(text) => Ok(RawDocument {
                url: url.clone(),
                title: None,
                text: text.clone(),
            }),
            Err(status) => Err(FetchError::Status(*status)),
        }
    }
}
