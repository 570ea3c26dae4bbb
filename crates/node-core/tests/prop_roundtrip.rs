/// Property-based tests for the value model and the serialization engine.
///
/// Uses `proptest` to check the round-trip law `deserialize(serialize(v)) == v`
/// over primitives, containers, derived records, enums and flag sets, plus the
/// Int/UInt equality and hashing law.
use node_core::{deserialize, serialize, FlagSet, FromNode, Node, NodeEnum, Record, ToNode};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

fn hash_of(node: &Node) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
}

fn roundtrips<T: ToNode + FromNode + PartialEq + std::fmt::Debug>(
    value: &T,
) -> Result<(), TestCaseError> {
    let node = serialize(value).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let back: T = deserialize(&node).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(&back, value, "via {}", node);
    Ok(())
}

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, NodeEnum)]
enum Shape {
    Circle,
    Square,
    Triangle = 10,
}

#[derive(Debug, Clone, Copy, PartialEq, NodeEnum)]
#[node(by_name)]
enum Mode {
    Fast,
    Safe,
}

#[derive(Debug, Clone, Copy, PartialEq, NodeEnum)]
enum Flag {
    A = 1,
    B = 2,
    C = 4,
    D = 8,
}

#[derive(Debug, Clone, PartialEq, Record)]
struct Sample {
    id: u32,
    name: String,
    score: Option<i16>,
    shape: Shape,
    #[node(by_name)]
    alt: Shape,
    mode: Mode,
    bytes: Vec<u8>,
    pair: (i64, bool),
    #[node(rename = "tags")]
    labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Record)]
#[node(as_array)]
struct Packed {
    pair: (u8, u8),
    value: f64,
    #[node(optional)]
    note: Option<String>,
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![Just(Shape::Circle), Just(Shape::Square), Just(Shape::Triangle)]
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Fast), Just(Mode::Safe)]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        Just(String::new()),
        Just("caf\u{00e9}".to_string()),
        Just("line1\nline2".to_string()),
    ]
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    (
        any::<u32>(),
        arb_text(),
        any::<Option<i16>>(),
        arb_shape(),
        arb_shape(),
        arb_mode(),
        prop::collection::vec(any::<u8>(), 0..16),
        (any::<i64>(), any::<bool>()),
        prop::collection::vec(arb_text(), 0..4),
    )
        .prop_map(
            |(id, name, score, shape, alt, mode, bytes, pair, labels)| Sample {
                id,
                name,
                score,
                shape,
                alt,
                mode,
                bytes,
                pair,
                labels,
            },
        )
}

fn arb_packed() -> impl Strategy<Value = Packed> {
    (
        (any::<u8>(), any::<u8>()),
        -1.0e9f64..1.0e9f64,
        prop::option::of(arb_text()),
    )
        .prop_map(|(pair, value, note)| Packed { pair, value, note })
}

/// Arbitrary node graphs, up to three levels deep.
fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        Just(Node::Nil),
        any::<bool>().prop_map(Node::Bool),
        any::<i64>().prop_map(Node::Int),
        any::<u64>().prop_map(Node::UInt),
        any::<f64>().prop_map(Node::Float),
        arb_text().prop_map(Node::Text),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(Node::Bytes),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Node::Sequence),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(Node::Mapping),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Numerically equal Int/UInt values are equal and hash identically.
    #[test]
    fn int_uint_equality_and_hash(n in 0i64..=i64::MAX) {
        let signed = Node::Int(n);
        let unsigned = Node::UInt(n as u64);
        prop_assert_eq!(&signed, &unsigned);
        prop_assert_eq!(hash_of(&signed), hash_of(&unsigned));
    }

    /// A negative Int never equals a UInt.
    #[test]
    fn negative_int_never_equals_uint(n in i64::MIN..0i64, u in any::<u64>()) {
        prop_assert_ne!(Node::Int(n), Node::UInt(u));
        prop_assert!(Node::Int(n).get::<u64>().is_err());
    }

    #[test]
    fn primitives_roundtrip(
        b in any::<bool>(),
        i in any::<i64>(),
        u in any::<u64>(),
        small in any::<i8>(),
        f in -1.0e12f64..1.0e12f64,
        c in any::<char>(),
        s in arb_text(),
    ) {
        roundtrips(&b)?;
        roundtrips(&i)?;
        roundtrips(&u)?;
        roundtrips(&small)?;
        roundtrips(&f)?;
        roundtrips(&c)?;
        roundtrips(&s)?;
    }

    #[test]
    fn containers_roundtrip(
        bytes in prop::collection::vec(any::<u8>(), 0..32),
        list in prop::collection::vec(any::<i32>(), 0..16),
        opt in any::<Option<u16>>(),
        map in prop::collection::btree_map("[a-z]{1,8}", any::<u32>(), 0..8),
        keyed in prop::collection::btree_map(any::<i16>(), arb_text(), 0..8),
        tuple in (any::<u8>(), arb_text(), any::<bool>()),
    ) {
        roundtrips(&bytes)?;
        roundtrips(&list)?;
        roundtrips(&opt)?;
        roundtrips(&map)?;
        roundtrips(&keyed)?;
        roundtrips(&tuple)?;
    }

    #[test]
    fn enums_roundtrip(shape in arb_shape(), mode in arb_mode()) {
        roundtrips(&shape)?;
        roundtrips(&mode)?;
        roundtrips(&vec![shape, shape])?;
    }

    #[test]
    fn flag_sets_roundtrip(bits in 0u64..16) {
        let flags: FlagSet<Flag> = FlagSet::from_bits(bits);
        roundtrips(&flags)?;
        let count = serialize(&flags).unwrap().len().unwrap();
        prop_assert_eq!(count as u32, bits.count_ones());
    }

    #[test]
    fn named_records_roundtrip(sample in arb_sample()) {
        roundtrips(&sample)?;
        let node = serialize(&sample).unwrap();
        prop_assert!(node.contains("tags").unwrap());
        prop_assert!(!node.contains("labels").unwrap());
    }

    #[test]
    fn positional_records_roundtrip(packed in arb_packed()) {
        roundtrips(&packed)?;
        prop_assert_eq!(serialize(&packed).unwrap().len().unwrap(), 4);
    }

    #[test]
    fn record_maps_roundtrip(
        entries in prop::collection::btree_map("[a-z]{1,4}", arb_packed(), 0..4),
    ) {
        let entries: BTreeMap<String, Packed> = entries;
        roundtrips(&entries)?;
    }

    /// Appending N scalars then a Sequence of M elements yields N + M.
    #[test]
    fn append_then_length(
        scalars in prop::collection::vec(any::<i32>(), 0..16),
        tail in prop::collection::vec(any::<bool>(), 0..16),
    ) {
        let mut list = Node::Sequence(Vec::new());
        for s in &scalars {
            list.append(*s).unwrap();
        }
        prop_assert_eq!(list.len().unwrap(), scalars.len());
        list.append(Node::sequence_of(tail.iter().copied())).unwrap();
        prop_assert_eq!(list.len().unwrap(), scalars.len() + tail.len());
    }

    /// Clones are equal, hash identically and pass through the engine unchanged.
    #[test]
    fn arbitrary_nodes_are_self_consistent(node in arb_node()) {
        let copy = node.clone();
        prop_assert_eq!(&copy, &node);
        prop_assert_eq!(hash_of(&copy), hash_of(&node));
        prop_assert_eq!(&deserialize::<Node>(&serialize(&node).unwrap()).unwrap(), &node);
        let _ = node.to_string();
    }
}
