use anyhow::Result;
use test_utils::answer_fixture;

use super::BubbleList;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::services::Themes;

#[test]
fn it_has_no_cached_lines() -> Result<()> {
    let theme = Themes::get("base16-ocean.dark", "")?;
    let bubble_list = BubbleList::new(theme);

    assert_eq!(bubble_list.cache.len(), 0);
    assert!(bubble_list.is_empty());
    return Ok(());
}

#[test]
fn it_caches_lines() -> Result<()> {
    let theme = Themes::get("base16-ocean.dark", "")?;
    let messages = vec![
        Message::new(Author::KBChat, "Hi there!"),
        Message::new(Author::Assistant, answer_fixture()),
    ];

    let mut bubble_list = BubbleList::new(theme);
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.cache.len(), 2);
    return Ok(());
}

#[test]
fn it_returns_correct_length() -> Result<()> {
    let theme = Themes::get("base16-ocean.dark", "")?;
    let messages = vec![
        Message::new(Author::KBChat, "Hi there!"),
        Message::new(Author::Assistant, "30 days."),
    ];

    let mut bubble_list = BubbleList::new(theme);
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.len(), 6);
    assert_eq!(bubble_list.lines().len(), 6);
    return Ok(());
}

#[test]
fn it_drops_cleared_messages() -> Result<()> {
    let theme = Themes::get("base16-ocean.dark", "")?;
    let messages = vec![
        Message::new(Author::User, "What is the refund policy?"),
        Message::new(Author::Assistant, "30 days."),
    ];

    let mut bubble_list = BubbleList::new(theme);
    bubble_list.set_messages(&messages, 50);
    bubble_list.set_messages(&[], 50);

    assert_eq!(bubble_list.len(), 0);
    assert!(bubble_list.lines().is_empty());
    assert!(bubble_list.is_empty());
    return Ok(());
}

#[test]
fn it_rebuilds_on_width_change() -> Result<()> {
    let theme = Themes::get("base16-ocean.dark", "")?;
    let messages = vec![Message::new(
        Author::Assistant,
        "Hi there! This is a really long line that pushes the boundaries of 50 characters across the screen.",
    )];

    let mut bubble_list = BubbleList::new(theme);
    bubble_list.set_messages(&messages, 50);
    let narrow = bubble_list.len();
    bubble_list.set_messages(&messages, 200);

    assert!(bubble_list.len() < narrow);
    return Ok(());
}
