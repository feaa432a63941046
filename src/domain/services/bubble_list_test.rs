use super::BubbleList;
use crate::domain::models::Message;
use crate::domain::models::Role;

fn create_messages() -> Vec<Message> {
    return vec![
        Message::new(Role::Assistant, "Hi there!"),
        Message::new(Role::Assistant, test_utils::weekly_report_fixture()),
    ];
}

#[test]
fn it_has_no_cached_lines() {
    let bubble_list = BubbleList::default();

    assert_eq!(bubble_list.cache.len(), 0);
    assert!(bubble_list.is_empty());
}

#[test]
fn it_caches_lines() {
    let messages = create_messages();

    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.cache.len(), 2);
    assert_eq!(bubble_list.order, vec![messages[0].id(), messages[1].id()]);
}

#[test]
fn it_counts_lines_across_bubbles() {
    let messages = vec![
        Message::new(Role::Assistant, "Hi there!"),
        Message::new(Role::Assistant, "First\n\nThird"),
    ];

    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.len(), 8);
}

#[test]
fn it_rewraps_a_growing_streaming_message() {
    let mut messages = vec![Message::new_streaming()];
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);
    assert_eq!(bubble_list.len(), 3);

    messages[0].append("line one\nline two");
    bubble_list.set_messages(&messages, 50);
    assert_eq!(bubble_list.len(), 4);

    messages[0].finalize();
    bubble_list.set_messages(&messages, 50);
    let entry = bubble_list.cache.get(&messages[0].id()).unwrap();
    assert!(!entry.streaming);
}

#[test]
fn it_drops_entries_after_a_reset() {
    let messages = create_messages();
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);

    let fresh = vec![Message::new(Role::Assistant, "Hi there!")];
    bubble_list.set_messages(&fresh, 50);

    assert_eq!(bubble_list.cache.len(), 1);
    assert_eq!(bubble_list.len(), 3);
    assert!(bubble_list.cache.contains_key(&fresh[0].id()));
}

#[test]
fn it_clears_the_cache_when_the_width_changes() {
    let messages = vec![Message::new(
        Role::Assistant,
        "Hi there! This is a long line that needs wrapping on narrow windows.",
    )];
    let mut bubble_list = BubbleList::default();

    bubble_list.set_messages(&messages, 100);
    let wide = bubble_list.len();
    bubble_list.set_messages(&messages, 30);

    assert!(bubble_list.len() > wide);
}

#[test]
fn it_keeps_entries_for_messages_still_shown() {
    let mut messages = create_messages();
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);

    messages.remove(0);
    messages.push(Message::new(Role::User, "销量下降原因"));
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.cache.len(), 2);
    assert!(bubble_list.cache.contains_key(&messages[0].id()));
    assert!(bubble_list.cache.contains_key(&messages[1].id()));
}
