// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt resolution for assistant profiles.
//!
//! A profile names a persona ("assistant", "support", "sales"). The
//! resolver looks up the operator-configured prompt for the profile
//! through a [`PromptSource`], caching results with a TTL, and falls
//! back to built-in personas when nothing is configured. A per-channel
//! prompt override short-circuits the whole lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

/// Generic persona used when a profile has no configured or built-in prompt.
const DEFAULT_PROMPT: &str = "You are a helpful assistant replying to customer messages \
     on a business messaging channel. Keep replies short, friendly, and in the \
     language the customer writes in.";

const SUPPORT_PROMPT: &str = "You are a customer support agent for a business messaging \
     channel. Answer questions about orders, products, and account issues concisely \
     and politely. If you cannot resolve an issue, say a human agent will follow up.";

const SALES_PROMPT: &str = "You are a sales assistant on a business messaging channel. \
     Answer product questions helpfully, highlight current offers when relevant, and \
     never invent prices or stock levels you were not given.";

/// Source of operator-configured profile prompts.
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// Returns the configured prompt for a profile, if any.
    async fn prompt_for(&self, profile: &str) -> Option<String>;
}

/// Prompt source backed by the static profile table in configuration.
pub struct ConfigPrompts {
    profiles: HashMap<String, String>,
}

impl ConfigPrompts {
    pub fn new(profiles: HashMap<String, String>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl PromptSource for ConfigPrompts {
    async fn prompt_for(&self, profile: &str) -> Option<String> {
        self.profiles.get(profile).cloned()
    }
}

struct CachedLookup {
    prompt: Option<String>,
    expires_at: Instant,
}

/// Resolves the effective system prompt for a reply.
///
/// Precedence: explicit override, then the configured profile prompt,
/// then the built-in persona for well-known profiles, then the generic
/// default. Misses are cached too so an unconfigured profile does not
/// hit the source on every message.
pub struct PromptResolver {
    source: Arc<dyn PromptSource>,
    cache: DashMap<String, CachedLookup>,
    ttl: Duration,
}

impl PromptResolver {
    pub fn new(source: Arc<dyn PromptSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: DashMap::new(),
            ttl,
        }
    }

    /// Returns the system prompt to use for the given profile.
    pub async fn resolve(&self, profile: &str, override_prompt: Option<&str>) -> String {
        if let Some(prompt) = override_prompt
            && !prompt.trim().is_empty()
        {
            return prompt.to_string();
        }

        if let Some(prompt) = self.cached_lookup(profile).await {
            return prompt;
        }

        builtin_prompt(profile).to_string()
    }

    async fn cached_lookup(&self, profile: &str) -> Option<String> {
        if let Some(entry) = self.cache.get(profile)
            && entry.expires_at > Instant::now()
        {
            return entry.prompt.clone();
        }

        let prompt = self.source.prompt_for(profile).await;
        self.cache.insert(
            profile.to_string(),
            CachedLookup {
                prompt: prompt.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        prompt
    }
}

/// Built-in persona for well-known profiles.
fn builtin_prompt(profile: &str) -> &'static str {
    match profile {
        "support" => SUPPORT_PROMPT,
        "sales" => SALES_PROMPT,
        _ => DEFAULT_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        profiles: HashMap<String, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PromptSource for CountingSource {
        async fn prompt_for(&self, profile: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.profiles.get(profile).cloned()
        }
    }

    fn resolver_with(profiles: &[(&str, &str)]) -> (PromptResolver, Arc<CountingSource>) {
        let source = Arc::new(CountingSource {
            profiles: profiles
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        });
        (
            PromptResolver::new(source.clone(), Duration::from_secs(60)),
            source,
        )
    }

    #[tokio::test]
    async fn override_wins_over_everything() {
        let (resolver, _) = resolver_with(&[("support", "configured support prompt")]);
        let prompt = resolver.resolve("support", Some("override prompt")).await;
        assert_eq!(prompt, "override prompt");
    }

    #[tokio::test]
    async fn blank_override_is_ignored() {
        let (resolver, _) = resolver_with(&[("support", "configured support prompt")]);
        let prompt = resolver.resolve("support", Some("   ")).await;
        assert_eq!(prompt, "configured support prompt");
    }

    #[tokio::test]
    async fn configured_prompt_wins_over_builtin() {
        let (resolver, _) = resolver_with(&[("sales", "our own sales prompt")]);
        assert_eq!(resolver.resolve("sales", None).await, "our own sales prompt");
    }

    #[tokio::test]
    async fn builtin_persona_for_known_profile() {
        let (resolver, _) = resolver_with(&[]);
        assert_eq!(resolver.resolve("support", None).await, SUPPORT_PROMPT);
        assert_eq!(resolver.resolve("sales", None).await, SALES_PROMPT);
    }

    #[tokio::test]
    async fn unknown_profile_gets_generic_default() {
        let (resolver, _) = resolver_with(&[]);
        assert_eq!(resolver.resolve("mystery", None).await, DEFAULT_PROMPT);
    }

    #[tokio::test]
    async fn lookups_are_cached_including_misses() {
        let (resolver, source) = resolver_with(&[("support", "configured")]);
        for _ in 0..3 {
            resolver.resolve("support", None).await;
            resolver.resolve("unconfigured", None).await;
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
