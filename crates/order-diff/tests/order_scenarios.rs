//! Black-box scenarios over the public API, fed with backend-shaped JSON.

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use dinepos_auth::{
    Approval, AuthzError, BearerToken, FeatureFlags, Role, SessionClaims, SessionContext,
    approve_changes,
};
use dinepos_core::{ItemId, Money};
use dinepos_order_diff::{
    ClassificationTag, ClassifiedItem, CommonItem, CommonItemsOptions, DiffError, EditSession,
    Item, ItemCollection, RawOrderLine, classify, classify_raw, common_items_across_orders,
    summarize,
};

fn lines(value: serde_json::Value) -> Vec<RawOrderLine> {
    serde_json::from_value(value).unwrap()
}

fn id(raw: &str) -> ItemId {
    ItemId::new(raw).unwrap()
}

fn find<'a>(out: &'a [ClassifiedItem], raw: &str) -> &'a ClassifiedItem {
    out.iter().find(|c| c.id.as_str() == raw).unwrap()
}

fn session_for(sub: &str, role: Role) -> SessionContext {
    let now = Utc.with_ymd_and_hms(2026, 5, 2, 20, 0, 0).unwrap();
    SessionContext::new(
        SessionClaims {
            sub: sub.to_string(),
            role,
            issued_at: now - Duration::hours(2),
            expires_at: now + Duration::hours(6),
        },
        BearerToken::new("t"),
        FeatureFlags::new(["table_service"]),
    )
}

#[test]
fn biryani_increase_and_new_vada() {
    let baseline = lines(json!([
        {
            "itemId": { "_id": "a", "name": "Biryani", "price": 12.0 },
            "name": "Biryani",
            "price": 12.0,
            "quantity": 2
        }
    ]));
    let current = lines(json!([
        { "itemId": "a", "name": "Biryani", "price": 12.0, "quantity": 3 },
        { "_id": "b", "name": "Vada", "price": 3.0, "quantity": 1 }
    ]));

    let out = classify_raw(&baseline, &current).unwrap();

    let a = find(&out, "a");
    assert_eq!(a.tag, ClassificationTag::Increased);
    assert_eq!((a.baseline_quantity, a.current_quantity), (Some(2), 3));

    let b = find(&out, "b");
    assert_eq!(b.tag, ClassificationTag::New);
    assert_eq!(b.current_quantity, 1);
    assert_eq!(b.unit_price, Money::from_minor(300));

    let summary = summarize(&out).unwrap();
    assert!(summary.is_modified);
    assert_eq!(summary.total_line_count, 2);
    assert_eq!(summary.current_subtotal, Money::from_minor(3900));
    assert_eq!(summary.subtotal_delta, 1500);
}

#[test]
fn add_and_remove_are_symmetric() {
    let two = lines(json!([{ "itemId": "x", "name": "Dosa", "price": 5.5, "quantity": 2 }]));

    let added = classify_raw(&[], &two).unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].tag, ClassificationTag::New);
    assert_eq!(added[0].current_quantity, 2);
    assert_eq!(added[0].baseline_quantity, None);

    let removed = classify_raw(&two, &[]).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].tag, ClassificationTag::Removed);
    assert_eq!(removed[0].current_quantity, 0);
    assert_eq!(removed[0].name, "Dosa");
    assert_eq!(removed[0].unit_price, Money::from_minor(550));
}

#[test]
fn zero_quantity_means_removed() {
    let baseline = lines(json!([{ "itemId": "x", "quantity": 3 }]));
    let current = lines(json!([{ "itemId": "x", "quantity": 0 }]));

    let out = classify_raw(&baseline, &current).unwrap();
    assert_eq!(out[0].tag, ClassificationTag::Removed);
}

#[test]
fn mixed_reference_shapes_do_not_fake_a_removal() {
    // Baseline from the order endpoint (populated refs), current from the
    // cart store (catalog documents keyed by their own _id).
    let baseline = lines(json!([
        { "_id": "line-1", "itemId": { "_id": "m1", "name": "Idli" }, "quantity": 2 }
    ]));
    let current = lines(json!([
        { "_id": "m1", "name": "Idli", "price": 4.0, "quantity": 2 }
    ]));

    let out = classify_raw(&baseline, &current).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].tag, ClassificationTag::Unchanged);
}

#[test]
fn one_bad_line_fails_the_whole_call() {
    let baseline = lines(json!([{ "itemId": "a", "quantity": 1 }]));
    let current = lines(json!([
        { "itemId": "a", "quantity": 1 },
        { "name": "no reference", "quantity": 1 }
    ]));
    assert!(matches!(
        classify_raw(&baseline, &current).unwrap_err(),
        DiffError::InvalidItemReference { position: 1, .. }
    ));

    let negative = lines(json!([{ "itemId": "a", "quantity": -3 }]));
    assert!(matches!(
        classify_raw(&baseline, &negative).unwrap_err(),
        DiffError::NegativeQuantity { quantity: -3, .. }
    ));

    let duplicated = lines(json!([
        { "itemId": "a", "quantity": 1 },
        { "itemId": { "_id": "a" }, "quantity": 2 }
    ]));
    assert_eq!(
        classify_raw(&duplicated, &baseline).unwrap_err(),
        DiffError::DuplicateIdInCollection { id: id("a") }
    );
}

#[test]
fn kitchen_common_items_banner() {
    let dosa = |qty: i64| {
        lines(json!([{ "itemId": "d", "name": "Dosa", "price": 5.0, "quantity": qty }]))
    };

    let tickets: Vec<Vec<ClassifiedItem>> = vec![
        classify_raw(&[], &dosa(1)).unwrap(),
        classify_raw(&dosa(1), &dosa(1)).unwrap(),
        classify_raw(&dosa(1), &dosa(1)).unwrap(),
        // Cancelled on this ticket: must not count.
        classify_raw(&dosa(1), &[]).unwrap(),
    ];

    let common = common_items_across_orders(&tickets, CommonItemsOptions { threshold: 1 });
    assert_eq!(
        common,
        vec![CommonItem {
            name: "Dosa".to_string(),
            count: 3
        }]
    );
}

#[test]
fn table_edit_needs_manager_only_for_net_reductions() {
    let committed = ItemCollection::from_raw(&lines(json!([
        { "itemId": "a", "name": "Biryani", "price": 12.0, "quantity": 2 }
    ])))
    .unwrap();
    let waiter = session_for("waiter-1", Role::STAFF);
    let manager = session_for("manager-1", Role::MANAGER);
    let now = Utc.with_ymd_and_hms(2026, 5, 2, 20, 15, 0).unwrap();

    let mut edit = EditSession::begin(committed);

    // 2 -> 5 -> 2: net zero, the waiter can submit alone.
    edit.set_quantity(&id("a"), 5).unwrap();
    edit.set_quantity(&id("a"), 2).unwrap();
    assert!(!edit.requires_authorization(&id("a")));

    // 2 -> 1: reduction of an accepted line.
    edit.decrement(&id("a")).unwrap();
    assert!(edit.requires_authorization(&id("a")));

    let denied = edit.persist(|pending| {
        let ids: Vec<ItemId> = pending.iter().map(|p| p.id.clone()).collect();
        approve_changes(&waiter, None, &ids, now).map(|_| ())
    });
    assert!(matches!(denied, Err(AuthzError::ApprovalRequired { .. })));
    assert_eq!(edit.committed().quantity_of(&id("a")), 2);

    let mut granted = None;
    let submitted = edit
        .persist(|pending| {
            let ids: Vec<ItemId> = pending.iter().map(|p| p.id.clone()).collect();
            granted = Some(approve_changes(&waiter, Some(&manager), &ids, now)?);
            Ok::<(), AuthzError>(())
        })
        .unwrap();

    assert_eq!(submitted.quantity_of(&id("a")), 1);
    assert_eq!(edit.committed().quantity_of(&id("a")), 1);
    assert!(matches!(
        granted,
        Some(Approval::GrantedBy { ref subject, .. }) if subject == "manager-1"
    ));
}

#[test]
fn items_added_and_dropped_before_submit_need_no_approval() {
    let committed = ItemCollection::from_items(vec![
        Item::new(id("a"), "Biryani", Money::from_minor(1200), 1).unwrap(),
    ])
    .unwrap();
    let waiter = session_for("waiter-1", Role::STAFF);
    let now = Utc.with_ymd_and_hms(2026, 5, 2, 21, 0, 0).unwrap();

    let mut edit = EditSession::begin(committed);
    edit.add(Item::new(id("b"), "Vada", Money::from_minor(300), 2).unwrap())
        .unwrap();
    edit.remove(&id("b")).unwrap();

    let result = edit.persist(|pending| {
        let ids: Vec<ItemId> = pending.iter().map(|p| p.id.clone()).collect();
        approve_changes(&waiter, None, &ids, now).map(|_| ())
    });
    assert!(result.is_ok());

    let out = classify(edit.committed(), edit.current()).unwrap();
    assert!(out.iter().all(|c| c.tag == ClassificationTag::Unchanged));
}

#[test]
fn classification_output_is_json_friendly() {
    let baseline = lines(json!([
        { "itemId": "a", "name": "Biryani", "price": 12.0, "quantity": 2 }
    ]));
    let current = lines(json!([
        { "itemId": "a", "name": "Biryani", "price": 12.0, "quantity": 1, "isReady": true }
    ]));
    let out = classify_raw(&baseline, &current).unwrap();

    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(
        value,
        json!([{
            "id": "a",
            "name": "Biryani",
            "unitPrice": 1200,
            "currentQuantity": 1,
            "baselineQuantity": 2,
            "tag": "decreased",
            "isReady": true
        }])
    );
}
