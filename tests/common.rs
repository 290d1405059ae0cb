//! Shared builders for editor tests.
use workflow_builder::{NodeType, SourcePort, WorkflowEditor};

/// Ids of the nodes in [`branching_editor`], in creation order.
#[allow(dead_code)]
pub struct Branching {
    pub trigger: String,
    pub condition: String,
    pub approve: String,
    pub reject: String,
    pub end: String,
}

/// A form-review workflow:
///
/// trigger -> condition -(true)-> email ----> end
///                      -(false)-> notification -^
#[allow(dead_code)]
pub fn branching_editor() -> (WorkflowEditor, Branching) {
    let mut editor = WorkflowEditor::new("Form review");
    let trigger = editor.add_node(NodeType::Trigger, None).id;
    let condition = editor.add_node(NodeType::Condition, None).id;
    let approve = editor.add_node(NodeType::Email, None).id;
    let reject = editor.add_node(NodeType::Notification, None).id;
    let end = editor.add_node(NodeType::End, None).id;

    editor
        .connect(&trigger, SourcePort::Default, &condition)
        .expect("trigger -> condition");
    editor
        .connect(&condition, SourcePort::True, &approve)
        .expect("condition -> approve");
    editor
        .connect(&condition, SourcePort::False, &reject)
        .expect("condition -> reject");
    editor
        .connect(&approve, SourcePort::Default, &end)
        .expect("approve -> end");
    editor
        .connect(&reject, SourcePort::Default, &end)
        .expect("reject -> end");

    (
        editor,
        Branching {
            trigger,
            condition,
            approve,
            reject,
            end,
        },
    )
}
