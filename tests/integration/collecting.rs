use gather::Collector;

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_buffer_preserves_emission_order() {
    let passes: Collector<&str, i64> = Collector::new();
    let report = passes.collect(|| {
        for i in 0..10 {
            passes.emit(i);
        }
    });
    assert_eq!(report, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_interleaved_emissions_keep_real_execution_order() {
    let passes: Collector<&str, i64> = Collector::new();
    let outer = passes.collect_tagged("outer", || {
        passes.emit_to(&"outer", 1);
        passes.collect_tagged("inner", || {
            passes.emit_to(&"outer", 2);
            passes.emit_to(&"inner", 10);
            passes.emit_to(&"outer", 3);
        });
        passes.emit_to(&"outer", 4);
    });
    assert_eq!(outer, vec![1, 2, 3, 4]);
}

#[test]
fn test_scope_depth_restored_after_collect() {
    let passes: Collector<&str, i64> = Collector::new();
    assert_eq!(passes.depth(), 0);
    passes.collect(|| {
        assert_eq!(passes.depth(), 1);
        passes.collect(|| {
            assert_eq!(passes.depth(), 2);
        });
        assert_eq!(passes.depth(), 1);
    });
    assert_eq!(passes.depth(), 0);
}

// ============================================================================
// Nesting and shadowing
// ============================================================================

#[test]
fn test_default_tag_resolves_to_innermost_untagged_scope() {
    let passes: Collector<&str, &str> = Collector::new();
    let outer = passes.collect(|| {
        passes.emit("outer");
        let inner = passes.collect(|| {
            passes.emit("inner");
        });
        assert_eq!(inner, vec!["inner"]);
    });
    assert_eq!(outer, vec!["outer"]);
}

#[test]
fn test_equal_tags_shadow() {
    let passes: Collector<&str, i64> = Collector::new();
    let outer = passes.collect_tagged("pass", || {
        passes.emit_to(&"pass", 1);
        let inner = passes.collect_tagged("pass", || {
            passes.emit_to(&"pass", 2);
        });
        assert_eq!(inner, vec![2]);
    });
    assert_eq!(outer, vec![1]);
}

#[test]
fn test_distinct_tag_reaches_past_inner_scope() {
    let passes: Collector<&str, i64> = Collector::new();
    let outer = passes.collect_tagged("A", || {
        passes.emit_to(&"A", 1);
        let inner = passes.collect_tagged("B", || {
            passes.emit_to(&"A", 2);
            passes.emit_to(&"B", 3);
        });
        assert_eq!(inner, vec![3]);
    });
    // the concrete scenario: outer [1, 2], inner [3]
    assert_eq!(outer, vec![1, 2]);
}

#[test]
fn test_untagged_scope_coexists_with_tagged_ancestor() {
    let passes: Collector<&str, i64> = Collector::new();
    let tagged = passes.collect_tagged("report", || {
        let plain = passes.collect(|| {
            passes.emit(1);
            passes.emit_to(&"report", 2);
        });
        assert_eq!(plain, vec![1]);
    });
    assert_eq!(tagged, vec![2]);
}

#[test]
fn test_non_string_tags() {
    #[derive(Debug, PartialEq)]
    enum Phase {
        Parse,
        Lower,
    }

    let passes: Collector<Phase, u32> = Collector::new();
    let parsed = passes.collect_tagged(Phase::Parse, || {
        let lowered = passes.collect_tagged(Phase::Lower, || {
            passes.emit_to(&Phase::Parse, 1);
            passes.emit_to(&Phase::Lower, 2);
        });
        assert_eq!(lowered, vec![2]);
    });
    assert_eq!(parsed, vec![1]);
}

// ============================================================================
// Unmatched emissions (enforcement off, the default)
// ============================================================================

#[test]
fn test_unmatched_emission_is_inert() {
    let passes: Collector<&str, i64> = Collector::new();
    let report = passes.collect_tagged("only", || {
        passes.emit_to(&"only", 1);
        // no scope carries this tag anywhere on the stack
        assert_eq!(passes.emit_to(&"absent", 99), 99);
        passes.emit_to(&"only", 2);
    });
    assert_eq!(report, vec![1, 2]);
}

#[test]
fn test_unmatched_emission_uses_configured_fallback() {
    let passes: Collector<&str, i64> = Collector::with_fallback(0);
    assert_eq!(passes.emit(123), 0);
    assert_eq!(passes.depth(), 0);
}

#[test]
fn test_emission_outside_any_scope_touches_nothing() {
    let passes: Collector<&str, i64> = Collector::new();
    passes.emit(1);
    passes.emit_to(&"ghost", 2);
    let report = passes.collect(|| {});
    assert_eq!(report, Vec::<i64>::new());
}

// ============================================================================
// Introspection
// ============================================================================

#[test]
fn test_is_collecting_tracks_open_scopes() {
    let passes: Collector<&str, i64> = Collector::new();
    assert!(!passes.is_collecting());
    assert!(!passes.is_collecting_tagged(&"lint"));
    passes.collect_tagged("lint", || {
        assert!(passes.is_collecting_tagged(&"lint"));
        passes.collect(|| {
            assert!(passes.is_collecting());
            assert!(passes.is_collecting_tagged(&"lint"));
        });
        assert!(!passes.is_collecting());
    });
    assert!(!passes.is_collecting_tagged(&"lint"));
}
