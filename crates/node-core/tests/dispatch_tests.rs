/// Dispatcher tests: distance resolution, tie-breaking, construction-time
/// validation and the two coverage modes.
use node_core::{seq, DispatchMode, Handlers, Kind, Mapping, MatchError, Node, NodeError};

// ============================================================================
// 1. Resolution
// ============================================================================

#[test]
fn fallback_wins_when_no_typed_handler_fits() {
    let label = Handlers::new()
        .on(|_: u8| "A")
        .on(|_: f32| "B")
        .otherwise(|| "C")
        .exhaustive()
        .unwrap();

    assert_eq!(label.dispatch(&Node::from(true)).unwrap(), "C");
    assert_eq!(label.dispatch(&Node::from(1u8)).unwrap(), "A");
    assert_eq!(label.dispatch(&Node::from(0.5)).unwrap(), "B");
    assert_eq!(label.dispatch(&Node::from(-1)).unwrap(), "C");
}

#[test]
fn typed_handler_beats_fallback() {
    let label = Handlers::new()
        .on(|_: i32| "A")
        .otherwise(|| "B")
        .exhaustive()
        .unwrap();

    assert_eq!(label.dispatch(&Node::from(12i32)).unwrap(), "A");
    assert_eq!(label.dispatch(&Node::from("12")).unwrap(), "B");
}

#[test]
fn typed_handlers_never_cross_families() {
    let label = Handlers::new()
        .on(|_: bool| "bool")
        .on(|_: u64| "unsigned")
        .otherwise(|| "other")
        .exhaustive()
        .unwrap();

    assert_eq!(label.dispatch(&Node::from(1)).unwrap(), "other");
    assert_eq!(label.dispatch(&Node::from(1u64)).unwrap(), "unsigned");
    assert_eq!(label.dispatch(&Node::from(false)).unwrap(), "bool");
}

#[test]
fn exact_typed_handler_beats_template() {
    let describe = Handlers::new()
        .on(|s: String| format!("text:{s}"))
        .any(|node: &Node| format!("other:{}", node.kind()))
        .exhaustive()
        .unwrap();

    assert_eq!(describe.dispatch(&Node::from("hi")).unwrap(), "text:hi");
    assert_eq!(describe.dispatch(&Node::from(3)).unwrap(), "other:int");
    assert_eq!(describe.winner(Kind::Text), Some(0));
    assert_eq!(describe.winner(Kind::Nil), Some(1));
}

#[test]
fn template_beats_inexact_width() {
    let result = Handlers::new()
        .on(|_: i32| "i32")
        .any(|_: &Node| "any")
        .best_effort();

    assert_eq!(result.err(), Some(MatchError::UnreachableHandler { index: 0 }));
}

#[test]
fn template_takes_kinds_without_an_exact_handler() {
    let pick = Handlers::new()
        .on(|_: i64| "i64")
        .any(|node: &Node| node.kind().name())
        .exhaustive()
        .unwrap();

    assert_eq!(pick.dispatch(&Node::from(5)).unwrap(), "i64");
    assert_eq!(pick.dispatch(&Node::from(5u64)).unwrap(), "uint");
    assert_eq!(pick.winner(Kind::Int), Some(0));
    assert_eq!(pick.winner(Kind::UInt), Some(1));
}

#[test]
fn payload_is_coerced_to_the_declared_type() {
    let double = Handlers::new()
        .on(|x: u8| u32::from(x) * 2)
        .on(|x: i64| x.unsigned_abs() as u32)
        .otherwise(|| 0)
        .exhaustive()
        .unwrap();

    assert_eq!(double.dispatch(&Node::from(21u8)).unwrap(), 42);
    assert_eq!(double.dispatch(&Node::from(-9)).unwrap(), 9);
}

#[test]
fn narrow_handler_reports_overflow_on_wide_payload() {
    let small = Handlers::new()
        .on(|x: u8| x)
        .otherwise(|| 0)
        .exhaustive()
        .unwrap();

    let err = small.dispatch(&Node::from(300u16)).unwrap_err();
    assert!(matches!(err, NodeError::Conversion(_)));
}

#[test]
fn container_handlers() {
    let size = Handlers::new()
        .on(|items: Vec<Node>| items.len())
        .on(|map: Mapping| map.len() * 100)
        .on(|bytes: Vec<u8>| bytes.len() * 10)
        .otherwise(|| 0)
        .exhaustive()
        .unwrap();

    assert_eq!(size.dispatch(&seq![1, 2, 3]).unwrap(), 3);
    assert_eq!(size.dispatch(&Node::mapping()).unwrap(), 0);
    assert_eq!(size.dispatch(&Node::from(vec![1u8, 2])).unwrap(), 20);
    assert_eq!(size.dispatch(&Node::Nil).unwrap(), 0);
}

#[test]
fn handlers_may_borrow_from_the_caller() {
    let prefix = String::from("value=");
    let render = Handlers::new()
        .any(|node: &Node| format!("{prefix}{node}"))
        .exhaustive()
        .unwrap();

    assert_eq!(render.dispatch(&Node::from(1)).unwrap(), "value=int(1)");
}

#[test]
fn visit_builds_and_dispatches_once() {
    let len = Node::from("hello").visit(
        Handlers::new()
            .on(|s: String| s.len())
            .otherwise(|| 0),
    );
    assert_eq!(len.unwrap(), 5);
}

// ============================================================================
// 2. Tie-breaking and unreachable handlers
// ============================================================================

#[test]
fn closer_width_makes_the_other_handler_unreachable() {
    let result = Handlers::new()
        .on(|_: i32| 1)
        .on(|_: i64| 2)
        .otherwise(|| 0)
        .exhaustive();

    assert_eq!(result.err(), Some(MatchError::UnreachableHandler { index: 0 }));
}

#[test]
fn narrower_handler_wins_when_it_is_the_closest() {
    let pick = Handlers::new()
        .on(|_: i16| "i16")
        .on(|_: u32| "u32")
        .otherwise(|| "other")
        .exhaustive()
        .unwrap();

    assert_eq!(pick.dispatch(&Node::from(5i64)).unwrap(), "i16");
    assert_eq!(pick.dispatch(&Node::from(5u64)).unwrap(), "u32");
}

#[test]
fn ties_go_to_the_earlier_registration() {
    let result = Handlers::new()
        .on(|_: i64| "first")
        .on(|_: i64| "second")
        .otherwise(|| "other")
        .exhaustive();

    assert_eq!(result.err(), Some(MatchError::UnreachableHandler { index: 1 }));
}

#[test]
fn template_shadows_fallback() {
    let result = Handlers::new()
        .any(|node: &Node| node.kind().name())
        .otherwise(|| "none")
        .exhaustive();

    assert_eq!(result.err(), Some(MatchError::UnreachableHandler { index: 1 }));
}

#[test]
fn at_most_one_fallback() {
    let result = Handlers::new()
        .otherwise(|| 1)
        .otherwise(|| 2)
        .best_effort();

    assert_eq!(result.err(), Some(MatchError::DuplicateFallback));
}

// ============================================================================
// 3. Coverage modes
// ============================================================================

#[test]
fn exhaustive_mode_rejects_uncovered_kinds() {
    let result = Handlers::new().on(|b: bool| b).exhaustive();
    assert_eq!(result.err(), Some(MatchError::Unhandled { kind: Kind::Nil }));

    let result = Handlers::new()
        .on(|_: String| 0)
        .on(|_: bool| 1)
        .build(DispatchMode::Exhaustive);
    assert!(matches!(result.err(), Some(MatchError::Unhandled { .. })));
}

#[test]
fn best_effort_mode_fails_only_on_dispatch() {
    let flag = Handlers::new().on(|b: bool| b).best_effort().unwrap();

    assert_eq!(flag.mode(), DispatchMode::BestEffort);
    assert!(flag.dispatch(&Node::from(true)).unwrap());
    assert_eq!(
        flag.dispatch(&Node::from(1)).unwrap_err(),
        NodeError::Match(MatchError::NoMatch { kind: Kind::Int })
    );
    assert_eq!(flag.winner(Kind::Int), None);
}

#[test]
fn best_effort_still_rejects_unreachable_handlers() {
    let result = Handlers::new()
        .on(|_: u16| 1)
        .on(|_: u64| 2)
        .best_effort();

    assert_eq!(result.err(), Some(MatchError::UnreachableHandler { index: 0 }));
}

#[test]
fn visit_uses_exhaustive_mode() {
    let err = Node::from(1)
        .visit(Handlers::new().on(|b: bool| b))
        .unwrap_err();
    assert_eq!(err, NodeError::Match(MatchError::Unhandled { kind: Kind::Nil }));
}

#[test]
fn default_mode_is_exhaustive() {
    assert_eq!(DispatchMode::default(), DispatchMode::Exhaustive);
    let d = Handlers::new().otherwise(|| ()).exhaustive().unwrap();
    assert_eq!(d.mode(), DispatchMode::Exhaustive);
}
