use crate::core::provider::{Provider, ProviderError, Result, Tool};
use serde_json::Value;
use std::collections::HashMap;

pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn Provider>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider with the registry
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        self.providers.insert(provider.namespace().to_string(), provider);
    }

    /// List all tools exposed by all registered providers, sorted by name
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut all_tools: Vec<Tool> = self
            .providers
            .values()
            .flat_map(|provider| provider.tools())
            .collect();
        all_tools.sort_by(|a, b| a.name.cmp(&b.name));
        all_tools
    }

    /// Call a specific tool by its namespaced name (e.g., "room.create")
    pub async fn call_tool(&self, name: &str, params: Value) -> Result<Value> {
        let Some((namespace, _)) = name.split_once('.') else {
            return Err(ProviderError::NotFound(name.to_string()));
        };

        match self.providers.get(namespace) {
            Some(provider) => provider.call(name, params).await,
            None => Err(ProviderError::NotFound(name.to_string())),
        }
    }
}
