use chat_queue_core::{update, ItemPatch, Msg, QueueState};

#[test]
fn messages_for_unknown_items_change_nothing() {
    let mut state = QueueState::new();
    let id = state.enqueue_text("hello", 1);
    state.consume_dirty();

    let stale = [
        Msg::ItemMoved {
            source: "ghost".into(),
            target: id.clone(),
        },
        Msg::ItemEdited {
            id: "ghost".into(),
            patch: ItemPatch::text("edited"),
        },
        Msg::ItemRemoved { id: "ghost".into() },
    ];
    for msg in stale {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}
