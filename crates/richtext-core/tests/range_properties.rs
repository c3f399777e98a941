//! Property-based tests for range conventions and attribute merging

use proptest::prelude::*;
use richtext_core::*;

/// Non-empty half-open ranges
fn arb_span() -> impl Strategy<Value = TextRange> {
    (0usize..10_000, 1usize..500).prop_map(|(start, len)| TextRange::new(start, start + len))
}

fn arb_attr() -> impl Strategy<Value = TextAttr> {
    (
        prop::option::of(prop::bool::ANY),
        prop::option::of(prop::bool::ANY),
        prop::option::of(6u8..72),
        prop::option::of(0i32..600),
    )
        .prop_map(|(bold, italic, size, indent)| {
            let mut attr = TextAttr::new();
            if let Some(bold) = bold {
                attr.set_bold(bold);
            }
            if let Some(italic) = italic {
                attr.set_italic(italic);
            }
            if let Some(size) = size {
                attr.set_font_size(f32::from(size));
            }
            if let Some(indent) = indent {
                attr.set_left_indent(indent, 0);
            }
            attr
        })
}

proptest! {
    /// External -> internal -> external is the identity on non-empty spans
    #[test]
    fn external_internal_round_trip(range in arb_span()) {
        let internal = range.to_inclusive();
        prop_assert!(internal.is_some());
        let internal = internal.unwrap();
        prop_assert_eq!(internal.len(), range.len());
        prop_assert_eq!(internal.to_exclusive(), range);

        let selection = SelectionRange::span(range);
        prop_assert_eq!(selection.to_internal().to_external(), selection);
    }

    /// Inverted ranges normalize to the same span as their mirror
    #[test]
    fn normalize_is_order_independent(a in 0usize..1000, b in 0usize..1000) {
        prop_assert_eq!(TextRange::new(a, b).normalize(), TextRange::new(b, a).normalize());
    }

    /// Clipping never produces positions past the length
    #[test]
    fn clip_stays_in_bounds(a in 0usize..2000, b in 0usize..2000, len in 0usize..1000) {
        let clipped = TextRange::new(a, b).clip(len);
        prop_assert!(clipped.start <= clipped.end);
        prop_assert!(clipped.end <= len);
    }

    /// Applying a layer twice is the same as applying it once
    #[test]
    fn apply_is_idempotent(base in arb_attr(), layer in arb_attr()) {
        let once = base.combined_with(&layer);
        let twice = once.combined_with(&layer);
        prop_assert_eq!(once.clone(), twice);
        prop_assert!(layer.matches(&once));
    }
}

#[test]
fn sentinels_map_bijectively() {
    assert_eq!(SelectionRange::None.to_internal(), InternalSelection::None);
    assert_eq!(SelectionRange::All.to_internal(), InternalSelection::All);
    assert_eq!(InternalSelection::None.to_external(), SelectionRange::None);
    assert_eq!(InternalSelection::All.to_external(), SelectionRange::All);

    let (all_start, all_end) = SelectionRange::All.to_pair();
    assert!(SelectionRange::from_pair(all_start, all_end).is_all());
    let (none_first, none_last) = InternalSelection::None.to_pair();
    assert!(InternalSelection::from_pair(none_first, none_last).is_none());
}
