//! Lexical token index: keyword overlap between requests and sellers, and
//! category inference from free text.


use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::record::lenient::is_truthy;
use crate::record::{FlashRequest, SellerProfile, StructuredRecord};

/// Tokens of this many characters or fewer are discarded.
pub const MIN_TOKEN_LEN_EXCLUSIVE: usize = 2;

/// Minimum token overlap required before a category is inferred.
pub const MIN_CATEGORY_OVERLAP: usize = 2;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9']+").expect("word pattern is valid")
});

pub type TokenSet = HashSet<String>;

/// Splits on runs of ASCII letters, digits and apostrophes, lower-cased.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| token.len() > MIN_TOKEN_LEN_EXCLUSIVE)
        .map(str::to_lowercase)
        .collect()
}

fn extend_text(tokens: &mut TokenSet, text: Option<&str>) {
    if let Some(text) = text {
        tokens.extend(tokenize(text));
    }
}

fn extend_all<S: AsRef<str>>(tokens: &mut TokenSet, values: &[S]) {
    for value in values {
        tokens.extend(tokenize(value.as_ref()));
    }
}

/// Token set for a seller: bio, keywords, interests, sales history and the
/// representative item.
pub fn seller_tokens(profile: &SellerProfile) -> TokenSet {
    let mut tokens = TokenSet::new();
    let parsed = &profile.parsed_profile;

    extend_text(&mut tokens, profile.raw_text.as_deref());
    extend_all(&mut tokens, parsed.profile_keywords());
    extend_all(&mut tokens, parsed.related_categories_of_interest());

    for entry in &parsed.sales_history_summary {
        extend_text(&mut tokens, entry.category());
        extend_all(&mut tokens, entry.item_examples());
    }

    if let Some(item) = &profile.representative_item {
        extend_text(&mut tokens, item.item_meta.parsed_item());
        extend_all(&mut tokens, item.item_meta.tags());
        extend_text(&mut tokens, item.context.original_text());
    }

    tokens
}

/// Token set for a flash request: raw text, parsed fields and UI metadata.
///
/// Falsy metadata values (`null`, `false`, `0`, empty) contribute nothing.
pub fn request_tokens(request: &FlashRequest) -> TokenSet {
    let mut tokens = record_tokens(&request.parsed_request);
    extend_text(&mut tokens, Some(&request.raw_text));

    for value in request.metadata.values().filter(|v| is_truthy(v)) {
        match value {
            Value::String(s) => extend_text(&mut tokens, Some(s)),
            other => extend_text(&mut tokens, Some(&other.to_string())),
        }
    }

    tokens
}

fn record_tokens(record: &StructuredRecord) -> TokenSet {
    let mut tokens = TokenSet::new();
    let meta = &record.item_meta;

    extend_text(&mut tokens, meta.parsed_item());
    extend_text(&mut tokens, meta.category());
    extend_all(&mut tokens, meta.tags());
    extend_text(&mut tokens, record.context.reason());
    extend_text(&mut tokens, record.context.original_text());
    extend_text(&mut tokens, record.location.text_input());

    tokens
}

/// Tokens of every tag in `tags`.
pub fn tag_tokens(tags: &[String]) -> TokenSet {
    let mut tokens = TokenSet::new();
    extend_all(&mut tokens, tags);
    tokens
}

#[derive(Debug, Clone)]
struct CategoryTokens {
    canonical: String,
    tokens: TokenSet,
}

/// Per-seller and per-category token sets over one snapshot of profiles.
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    sellers: HashMap<String, TokenSet>,
    categories: IndexMap<String, CategoryTokens>,
}

impl LexicalIndex {
    pub fn build<'a, I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = &'a SellerProfile>,
    {
        let mut index = Self::default();

        for profile in profiles {
            let tokens = seller_tokens(profile);

            if let Some(category) = profile.item_category().filter(|c| !c.is_empty()) {
                let entry = index
                    .categories
                    .entry(category.to_lowercase())
                    .or_insert_with(|| CategoryTokens {
                        canonical: category.to_string(),
                        tokens: TokenSet::new(),
                    });
                entry.tokens.extend(tokens.iter().cloned());
            }

            index.sellers.insert(profile.user_id.clone(), tokens);
        }

        index
    }

    pub fn seller_tokens(&self, user_id: &str) -> Option<&TokenSet> {
        self.sellers.get(user_id)
    }

    /// Number of request tokens shared with a seller's token set.
    pub fn keyword_overlap(&self, request_tokens: &TokenSet, user_id: &str) -> usize {
        self.seller_tokens(user_id)
            .map(|seller| request_tokens.intersection(seller).count())
            .unwrap_or(0)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Category whose token set overlaps `tokens` the most.
    ///
    /// Ties keep the first-seen category. Returns `None` below
    /// [`MIN_CATEGORY_OVERLAP`].
    pub fn infer_category(&self, tokens: &TokenSet) -> Option<&str> {
        let mut best: Option<&str> = None;
        let mut best_score = 0;

        for category in self.categories.values() {
            let score = tokens.intersection(&category.tokens).count();
            if score > best_score {
                best_score = score;
                best = Some(&category.canonical);
            }
        }

        best.filter(|_| best_score >= MIN_CATEGORY_OVERLAP)
    }
}
