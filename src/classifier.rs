// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword-based merchant categorization.
//!
//! Tables are ordered: the first category with a matching keyword wins.

pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Dining",
        &[
            "chipotle", "starbucks", "mcdonald", "burger", "grill", "cafe", "coffee", "bistro",
            "steak", "pizza", "sushi", "taco", "eats", "grubhub", "doordash", "resy",
            "sweetgreen", "shake shack", "dunkin",
        ],
    ),
    (
        "Travel",
        &[
            "uber", "lyft", "delta", "united", "american air", "jetblue", "southwest", "hotel",
            "airbnb", "expedia", "booking.com", "train", "amtrak", "hertz", "avis", "marriott",
            "hilton", "hyatt",
        ],
    ),
    (
        "Groceries",
        &[
            "whole foods", "trader joe", "safeway", "kroger", "publix", "wegmans", "walmart",
            "target", "aldi", "costco", "market", "foods",
        ],
    ),
    (
        "Drugstore",
        &["cvs", "walgreens", "rite aid", "duane reade", "pharmacy", "chemist", "boots"],
    ),
    (
        "Gas",
        &[
            "shell", "chevron", "exxon", "mobil", "bp", "wawa", "7-eleven", "arco", "texaco",
            "fuel", "gas",
        ],
    ),
    (
        "Streaming",
        &[
            "netflix", "hulu", "spotify", "disney", "hbo", "youtube", "apple", "peacock",
            "paramount", "music",
        ],
    ),
    (
        "Shopping",
        &[
            "amazon", "apple store", "best buy", "nike", "adidas", "gap", "zara", "h&m",
            "uniqlo", "sephora", "saks", "nordstrom", "bloomingdale",
        ],
    ),
];

const BENEFIT_CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("Dining", &["dining", "resy", "grubhub"]),
    ("Travel", &["uber", "lyft", "travel", "hotel", "flight"]),
    ("Shopping", &["saks"]),
    ("Streaming", &["digital", "stream"]),
];

/// Suggest a spending category for a merchant name.
pub fn guess_category(merchant: &str) -> Option<&'static str> {
    let normalized = merchant.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(category, _)| *category)
}

/// Category a perk implies when the user picks it explicitly.
pub fn category_for_benefit(benefit_name: &str) -> &'static str {
    let lower = benefit_name.to_lowercase();
    BENEFIT_CATEGORY_RULES
        .iter()
        .find(|(_, terms)| terms.iter().any(|t| lower.contains(t)))
        .map(|(category, _)| *category)
        .unwrap_or("Other")
}
