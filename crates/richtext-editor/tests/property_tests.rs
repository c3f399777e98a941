//! Property-based tests for richtext-editor
//!
//! Uses proptest to check history and list invariants over generated
//! documents and edit sequences.

use proptest::prelude::*;
use richtext_editor::{Buffer, BufferCommandExt, ListLevel, SetStyleFlags, TextAttr, TextRange};

/// Generate paragraph text without line breaks
fn arb_paragraph() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z ]{0,12}", "[A-Za-z0-9]{1,6}", Just(String::new()),]
}

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Write(usize, String),
    Bold(usize, usize),
    Delete(usize, usize),
    Number(u32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_paragraph().prop_map(Op::Add),
        (0usize..40, "[a-z\n]{1,5}").prop_map(|(at, text)| Op::Write(at, text)),
        (0usize..40, 0usize..40).prop_map(|(a, b)| Op::Bold(a, b)),
        (0usize..40, 0usize..40).prop_map(|(a, b)| Op::Delete(a, b)),
        (1u32..20).prop_map(Op::Number),
    ]
}

fn apply(buffer: &mut Buffer, op: &Op) {
    match op {
        Op::Add(text) => {
            buffer.add_paragraph(text);
        }
        Op::Write(at, text) => {
            buffer.write_text(*at, text);
        }
        Op::Bold(a, b) => {
            let mut bold = TextAttr::new();
            bold.set_bold(true);
            buffer.set_style(TextRange::new(*a, *b), &bold);
        }
        Op::Delete(a, b) => {
            buffer.delete(TextRange::new(*a, *b));
        }
        Op::Number(start) => {
            let all = TextRange::new(0, buffer.len());
            buffer.number_list(all, "Arabic", *start);
        }
    }
}

fn seeded(paragraphs: &[String]) -> Buffer {
    let mut buffer = Buffer::new();
    for text in paragraphs {
        buffer.add_paragraph(text);
    }
    buffer.discard_edits();
    buffer
}

proptest! {
    #[test]
    fn batched_edits_undo_and_redo_exactly(
        paragraphs in prop::collection::vec(arb_paragraph(), 1..4),
        ops in prop::collection::vec(arb_op(), 1..8),
    ) {
        let mut buffer = seeded(&paragraphs);
        let before = buffer.root().clone();

        buffer.begin_batch_undo("generated");
        for op in &ops {
            apply(&mut buffer, op);
        }
        prop_assert!(buffer.end_batch_undo());
        prop_assert!(buffer.is_undo_idle());
        let after = buffer.root().clone();

        if buffer.can_undo() {
            buffer.undo().unwrap();
            prop_assert_eq!(buffer.root(), &before);
            buffer.redo().unwrap();
            prop_assert_eq!(buffer.root(), &after);
        } else {
            prop_assert_eq!(&after, &before);
        }
    }

    #[test]
    fn balanced_batches_are_one_step(depth in 1usize..6, texts in prop::collection::vec(arb_paragraph(), 1..6)) {
        let mut buffer = Buffer::new();
        for level in 0..depth {
            buffer.begin_batch_undo(&format!("level {level}"));
        }
        for text in &texts {
            buffer.add_paragraph(text);
        }
        for _ in 0..depth {
            prop_assert!(buffer.end_batch_undo());
        }
        prop_assert!(buffer.is_undo_idle());
        prop_assert_eq!(buffer.history_stats().undo_count, 1);
    }

    #[test]
    fn unbalanced_batches_stay_open(depth in 2usize..6) {
        let mut buffer = Buffer::new();
        for level in 0..depth {
            buffer.begin_batch_undo(&format!("level {level}"));
        }
        for _ in 1..depth {
            buffer.end_batch_undo();
        }
        prop_assert!(!buffer.is_undo_idle());
    }

    #[test]
    fn demote_then_promote_restores_lists(
        paragraphs in prop::collection::vec("[a-z]{1,6}", 1..6),
        level in 0i32..5,
        by in 1i32..5,
        first in 0usize..6,
        count in 1usize..6,
    ) {
        let mut buffer = seeded(&paragraphs);
        let all = TextRange::new(0, buffer.len());
        let level = ListLevel::clamped(level);
        prop_assert!(buffer.set_list_style(
            all,
            "Arabic",
            SetStyleFlags::WITH_UNDO | SetStyleFlags::RENUMBER,
            1,
            Some(level),
        ));
        let before = buffer.root().clone();

        let first = first.min(buffer.paragraph_count() - 1);
        let last = (first + count).min(buffer.paragraph_count()) - 1;
        let start = buffer.root().paragraphs()[first].base.range.start;
        let end = buffer.root().paragraphs()[last].base.range.end;
        let range = TextRange::new(start, end);

        prop_assert!(buffer.promote_list(-by, range, SetStyleFlags::WITH_UNDO));
        prop_assert_eq!(buffer.list_level(start), Some(level.offset(by)));
        prop_assert!(buffer.promote_list(by, range, SetStyleFlags::WITH_UNDO));
        prop_assert_eq!(buffer.root(), &before);
    }
}
