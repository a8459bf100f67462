//! Integration tests driving the runtime primitives the way a schema layer does.
//!
//! # Flow
//!
//! 1. Declare types and record field type references before their targets exist
//! 2. Build the namespace tree, then resolve the references in one pass
//! 3. Build oneof accessors per message type and apply them to instances
//! 4. Key 64-bit map entries by `LongHash` and rebuild the values from the keys

use std::collections::BTreeMap;

use protolite_util::{
    DynamicMessage, FieldSet, LongBits, LongHash, LongValue, Namespace, NodeKind, OneOf,
    ReferenceTable, ZERO_HASH, long_ne,
};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Forward references
// ============================================================================

#[test]
fn forward_references_resolve_after_tree_is_built() {
    init_tracing();

    // Field types are recorded first, while the tree is still empty
    let mut refs = ReferenceTable::new();
    refs.insert_path(("shop.Order", "customer"), "shop.Customer");
    refs.insert_path(("shop.Order", "status"), ".shop.Order.Status");
    refs.insert_path(("shop.Order", "coupon"), "promo.Coupon");

    let mut root = Namespace::root();
    root.define("shop.Order", NodeKind::Message).unwrap();
    root.define("shop.Order.Status", NodeKind::Enum).unwrap();
    root.define("shop.Customer", NodeKind::Message).unwrap();

    let stats = refs.resolve(&root);
    assert_eq!(stats.resolved, 2);
    assert_eq!(stats.absent, 1);

    let customer = refs.node(&("shop.Order", "customer")).unwrap();
    assert_eq!(customer.full_name(), "shop.Customer");
    assert!(customer.kind().is_type());

    let status = refs.node(&("shop.Order", "status")).unwrap();
    assert_eq!(status.kind(), NodeKind::Enum);

    // Unresolvable reference is marked absent and leaves siblings intact
    assert!(refs.get(&("shop.Order", "coupon")).unwrap().is_absent());

    // Second pass is a no-op
    let again = refs.resolve(&root);
    assert_eq!(again.touched(), 0);
    assert_eq!(refs.node(&("shop.Order", "customer")).unwrap().full_name(), "shop.Customer");
}

// ============================================================================
// Oneof groups
// ============================================================================

#[test]
fn oneof_setter_keeps_one_member() {
    let payment = OneOf::new(["card", "iban", "voucher"]);

    let mut order = DynamicMessage::new();
    order.set("id", json!(7));
    order.set("card", json!("4111"));
    order.set("iban", json!("DE00"));

    // Both set: the later assignment wins the getter
    assert_eq!(payment.get(&order), Some("iban"));

    order.set("voucher", json!("FREE"));
    payment.set(&mut order, "voucher");

    assert_eq!(payment.get(&order), Some("voucher"));
    assert!(!order.is_present("card"));
    assert!(!order.is_present("iban"));
    assert!(order.is_present("id"));
}

#[test]
fn oneof_accessors_are_independent_per_group() {
    let payment = OneOf::new(["card", "iban"]);
    let shipping = OneOf::new(["pickup", "courier"]);

    let mut order = DynamicMessage::new();
    order.set("card", json!("4111"));
    order.set("courier", json!("dhl"));
    payment.set(&mut order, "card");
    shipping.set(&mut order, "courier");

    assert_eq!(payment.get(&order), Some("card"));
    assert_eq!(shipping.get(&order), Some("courier"));
}

// ============================================================================
// 64-bit map keys
// ============================================================================

#[test]
fn long_hash_keys_round_trip_values() {
    let inputs = [
        LongValue::Number(-1.0),
        LongValue::Text("18446744073709551615"),
        LongValue::Text("-9223372036854775808"),
        LongValue::Number(4_294_967_296.0),
        LongValue::Number(0.0),
    ];

    let mut map: BTreeMap<LongHash, String> = BTreeMap::new();
    for input in inputs {
        let bits = LongBits::from_value(input).unwrap();
        map.insert(bits.to_hash(), format!("{input:?}"));
    }
    // -1 and max unsigned share a bit pattern
    assert_eq!(map.len(), 4);
    assert!(map.contains_key(&ZERO_HASH));

    for key in map.keys() {
        let bits = LongBits::from_hash(key.as_bytes());
        assert_eq!(bits.to_hash(), *key);
        assert!(!long_ne(LongValue::Parts(bits.to_long(false)), bits.lo, bits.hi).unwrap());
    }

    let max = LongBits::from_hash(LongBits::from_u64(u64::MAX).to_hash().as_bytes());
    assert_eq!(max.to_number(true), 18_446_744_073_709_551_615.0);
    assert_eq!(max.to_number(false), -1.0);
}

#[test]
fn malformed_hash_decodes_to_zero() {
    init_tracing();
    assert!(LongBits::from_hash(&[1, 2, 3, 4, 5, 6, 7]).is_zero());
    assert!(LongBits::from_hash(&[1, 2, 3, 4, 5, 6, 7, 8, 9]).is_zero());
}
