//! Adaptive Card (schema 1.0) rendering of card descriptions.
//!
//! Produces the JSON a channel expects inside a carousel attachment:
//! a two-column layout with the text on the left, the poster on the right,
//! and the action links as `Action.OpenUrl` buttons.

use domain::CardDescription;
use serde_json::{Value, json};

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Render one card description as an Adaptive Card document
pub fn to_adaptive_card(card: &CardDescription) -> Value {
    let mut text_items = vec![
        json!({ "type": "TextBlock", "text": card.kicker }),
        json!({
            "type": "TextBlock",
            "text": card.title,
            "weight": "bolder",
            "size": "extraLarge",
            "spacing": "none"
        }),
    ];
    text_items.extend(card.subtitles.iter().map(|subtitle| {
        json!({
            "type": "TextBlock",
            "text": subtitle,
            "isSubtle": true,
            "spacing": "none"
        })
    }));
    text_items.push(json!({
        "type": "TextBlock",
        "text": card.overview,
        "size": "small",
        "wrap": true
    }));

    let image_items: Vec<Value> = card
        .image_url
        .iter()
        .map(|url| json!({ "type": "Image", "url": url, "size": "auto" }))
        .collect();

    let actions: Vec<Value> = card
        .actions
        .iter()
        .map(|action| {
            json!({
                "type": "Action.OpenUrl",
                "title": action.title,
                "url": action.url
            })
        })
        .collect();

    json!({
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "type": "AdaptiveCard",
        "version": "1.0",
        "body": [{
            "speak": "",
            "type": "ColumnSet",
            "columns": [
                { "type": "Column", "width": 2, "items": text_items },
                { "type": "Column", "width": 2, "items": image_items }
            ]
        }],
        "actions": actions
    })
}

/// Wrap a list of cards as carousel attachments
pub fn carousel_attachments(cards: &[CardDescription]) -> Vec<Value> {
    cards
        .iter()
        .map(|card| {
            json!({
                "contentType": ADAPTIVE_CARD_CONTENT_TYPE,
                "content": to_adaptive_card(card)
            })
        })
        .collect()
}
