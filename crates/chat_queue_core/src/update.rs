use crate::{Effect, FailurePolicy, ItemId, ItemStatus, Msg, QueueState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: QueueState, msg: Msg) -> (QueueState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesAdded { files, at_millis } => {
            state.enqueue_files(files, at_millis);
            Vec::new()
        }
        Msg::TextAdded { text, at_millis } => {
            state.enqueue_text(text, at_millis);
            Vec::new()
        }
        // Unknown ids come from stale UI rows; there is nothing to do for them.
        Msg::ItemEdited { id, patch } => {
            let _ = state.update_item(&id, patch);
            Vec::new()
        }
        Msg::ItemRemoved { id } => {
            let _ = state.remove(&id);
            Vec::new()
        }
        Msg::ItemMoved { source, target } => {
            let _ = state.reorder(&source, &target);
            Vec::new()
        }
        Msg::ClearClicked => {
            state.clear();
            vec![Effect::CancelScheduled]
        }
        Msg::StartClicked => start(&mut state),
        Msg::PauseClicked => {
            if state.running() {
                state.set_running(false);
                vec![Effect::CancelScheduled]
            } else {
                Vec::new()
            }
        }
        Msg::Tick => advance(&mut state),
        Msg::DispatchFailed { id, error } => dispatch_failed(&mut state, &id, error),
        // A timed-out wait advances exactly like a finished one.
        Msg::GenerationEnded { id, .. } => generation_ended(&mut state, &id),
    };

    (state, effects)
}

fn start(state: &mut QueueState) -> Vec<Effect> {
    if state.running() {
        return Vec::new();
    }
    if state.is_empty() {
        return vec![Effect::info("Queue is empty")];
    }
    if state.first_pending().is_none() {
        return vec![Effect::info("Nothing to send")];
    }

    // A pause that outlived its dispatch leaves the item sending; the message
    // reached the host, so it counts as delivered.
    for id in state.orphaned_sending() {
        state.settle(&id, ItemStatus::Done);
    }

    state.set_running(true);
    advance(state)
}

/// One scheduling decision: dispatch the first pending item, or finish.
fn advance(state: &mut QueueState) -> Vec<Effect> {
    if !state.running() {
        return Vec::new();
    }
    // Single flight: the outstanding item's completion drives the next step.
    if state.in_flight().is_some() {
        return Vec::new();
    }

    match state.first_pending() {
        Some(index) => {
            let item = state.begin_sending(index);
            vec![Effect::Dispatch { item }]
        }
        None => {
            state.set_running(false);
            vec![Effect::success("All queued messages sent")]
        }
    }
}

fn generation_ended(state: &mut QueueState, id: &ItemId) -> Vec<Effect> {
    if !state.land(id) {
        return Vec::new();
    }
    if !state.running() {
        return Vec::new();
    }

    // The item may have been edited or removed while its response was generating.
    state.settle(id, ItemStatus::Done);
    vec![Effect::ScheduleTick {
        delay: state.settings().done_cooldown,
    }]
}

fn dispatch_failed(state: &mut QueueState, id: &ItemId, error: String) -> Vec<Effect> {
    let landed = state.land(id);
    let failed = state.fail(id, error.clone());
    let mut effects = Vec::new();
    if let Some(index) = failed {
        effects.push(Effect::error(format!(
            "Item {} failed to send: {}",
            index + 1,
            error
        )));
    }
    if !landed || !state.running() {
        return effects;
    }

    let settings = state.settings().clone();
    match settings.failure_policy {
        // Halting is for failures of queued items; a removed or cleared one
        // only frees the loop.
        FailurePolicy::Halt if failed.is_some() => state.set_running(false),
        _ => effects.push(Effect::ScheduleTick {
            delay: settings.error_cooldown,
        }),
    }
    effects
}
