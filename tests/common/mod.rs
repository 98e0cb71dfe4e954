#![allow(dead_code)]

use async_trait::async_trait;
use product_search_gateway::application::services::{SearchService, SearchSettings};
use product_search_gateway::domain::entities::ProviderPayload;
use product_search_gateway::domain::providers::{ProviderError, SearchProvider};
use product_search_gateway::infrastructure::cache::MemoryCache;
use product_search_gateway::state::AppState;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the stub provider answers with.
#[derive(Clone)]
pub enum StubReply {
    Items(usize),
    Status(u16),
    Unconfigured,
}

/// Provider double that records every call.
pub struct StubProvider {
    reply: StubReply,
    calls: AtomicUsize,
    terms: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            terms: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn terms(&self) -> Vec<String> {
        self.terms.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StubProvider {
    async fn search(&self, term: &str) -> Result<ProviderPayload, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.terms.lock().unwrap().push(term.to_string());

        match self.reply {
            StubReply::Items(n) => Ok(sample_payload(n)),
            StubReply::Status(status) => Err(ProviderError::HttpStatus { status }),
            StubReply::Unconfigured => Err(ProviderError::MissingCredentials),
        }
    }

    fn is_configured(&self) -> bool {
        !matches!(self.reply, StubReply::Unconfigured)
    }
}

pub fn sample_payload(n: usize) -> ProviderPayload {
    let items: Vec<_> = (0..n)
        .map(|i| {
            json!({
                "title": format!("Peanut Butter #{}", i),
                "link": format!("https://shop.example.com/pb/{}", i),
                "snippet": "Smooth and creamy",
                "pagemap": {
                    "brand": ["Acme"],
                    "offer": [{ "price": "4.99" }],
                    "product": [{ "weight": "340g" }]
                }
            })
        })
        .collect();

    serde_json::from_value(json!({ "items": items })).unwrap()
}

pub fn create_test_state(
    provider: Arc<StubProvider>,
    settings: SearchSettings,
) -> (AppState, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    let service = SearchService::new(cache.clone(), provider, settings);
    (AppState::new(Arc::new(service)), cache)
}
