// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decides whether a detected spending category earns a card's bonus label.

pub const AIRLINE_KEYWORDS: &[&str] = &[
    "delta", "united", "american", "aa.com", "southwest", "jetblue", "alaska", "british",
    "virgin", "emirates", "lufthansa", "air france", "klm", "qantas", "spirit", "frontier", "fly",
];

pub const HOTEL_KEYWORDS: &[&str] = &[
    "marriott", "hilton", "hyatt", "ihg", "sheraton", "westin", "choice", "best western",
    "wyndham", "airbnb", "vrbo", "booking", "expedia", "hotels.com",
];

pub const ONLINE_GROCERY_KEYWORDS: &[&str] = &[
    "instacart", "freshdirect", "amazon fresh", "peapod", "shipt", "hellofresh", "blue apron",
    "kroger pay", "walmart+",
];

const CHASE_TRAVEL_KEYWORDS: &[&str] = &["chase travel", "chase.com/travel"];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

fn is_dining(c: &str) -> bool {
    c == "dining" || c == "restaurants"
}

fn is_grocery(c: &str) -> bool {
    c == "groceries" || c == "supermarkets"
}

/// True when a purchase in `detected` (for `merchant`) earns the bonus
/// category labelled `label`.
pub fn is_category_match(detected: &str, label: &str, merchant: &str) -> bool {
    let dc = detected.to_lowercase();
    let cc = label.to_lowercase();
    let merch = merchant.to_lowercase();

    if dc == cc {
        return true;
    }
    if is_dining(&dc) && is_dining(&cc) {
        return true;
    }
    if is_grocery(&dc) {
        if is_grocery(&cc) {
            return true;
        }
        if cc == "online grocery" {
            return contains_any(&merch, ONLINE_GROCERY_KEYWORDS);
        }
    }
    if dc == "travel" {
        match cc.as_str() {
            "travel" => return true,
            "lyft" if merch.contains("lyft") => return true,
            "flights" => return contains_any(&merch, AIRLINE_KEYWORDS),
            "hotels" => return contains_any(&merch, HOTEL_KEYWORDS),
            "chase hotels" => return contains_any(&merch, CHASE_TRAVEL_KEYWORDS),
            _ => {}
        }
    }
    match dc.as_str() {
        "drugstore" => cc == "drugstore",
        "streaming" => cc == "streaming",
        "gas" => cc == "gas" || cc == "gas stations",
        _ => false,
    }
}
