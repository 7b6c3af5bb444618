use rust_decimal::Decimal;
use tallylib::{
    aggregate::statement,
    model::{Debit, EntryKind, Payment, RecordDate, RecordId},
};

fn payment(date: &str, name: &str, ledger: &str) -> Payment {
    Payment {
        id: RecordId::new(),
        date: RecordDate::new(date),
        name: name.into(),
        kind: "Cash".into(),
        amount: Decimal::ONE,
        ledger: ledger.into(),
        created_at: RecordDate::default(),
    }
}

fn debit(date: &str, number: &str, ledger: &str) -> Debit {
    Debit {
        id: RecordId::new(),
        date: RecordDate::new(date),
        invoice_type: "Supplier".into(),
        invoice_number: number.into(),
        amount: Decimal::from(2),
        ledger: ledger.into(),
        created_at: RecordDate::default(),
    }
}

#[test]
fn earliest_first_across_kinds() {
    let payments = vec![
        payment("2025-10-03", "late", "Main"),
        payment("2025-10-01", "early", "Main"),
    ];
    let debits = vec![debit("2025-10-02", "mid", "Main")];

    let lines = statement(&payments, &debits, "Main");
    let labels: Vec<&str> = lines.iter().map(|l| l.desc_a.as_str()).collect();
    assert_eq!(labels, ["early", "Supplier", "late"]);
    assert_eq!(lines[1].kind, EntryKind::Debit);
    assert_eq!(lines[1].desc_b, "mid");
    assert!(lines
        .windows(2)
        .all(|w| w[0].date.sort_key() <= w[1].date.sort_key()));
}

#[test]
fn equal_dates_keep_credits_then_debits_in_insertion_order() {
    let payments = vec![
        payment("2025-10-01", "p1", "Main"),
        payment("2025-10-01", "p2", "Main"),
    ];
    let debits = vec![
        debit("2025-10-01", "d1", "Main"),
        debit("2025-10-01", "d2", "Main"),
    ];

    let lines = statement(&payments, &debits, "Main");
    let order: Vec<String> = lines
        .iter()
        .map(|l| match l.kind {
            EntryKind::Credit => l.desc_a.clone(),
            EntryKind::Debit => l.desc_b.clone(),
        })
        .collect();
    assert_eq!(order, ["p1", "p2", "d1", "d2"]);
}

#[test]
fn timestamps_and_dates_interleave() {
    let payments = vec![payment("2025-10-01T15:30:00.000Z", "afternoon", "Main")];
    let debits = vec![debit("2025-10-01", "midnight", "Main")];

    let lines = statement(&payments, &debits, "Main");
    assert_eq!(lines[0].desc_b, "midnight");
    assert_eq!(lines[1].desc_a, "afternoon");
}

#[test]
fn unparseable_dates_go_last_in_insertion_order() {
    let payments = vec![
        payment("not a date", "bad1", "Main"),
        payment("2025-12-31", "good", "Main"),
        payment("", "bad2", "Main"),
    ];
    let lines = statement(&payments, &[], "Main");
    let names: Vec<&str> = lines.iter().map(|l| l.desc_a.as_str()).collect();
    assert_eq!(names, ["good", "bad1", "bad2"]);
}

#[test]
fn other_ledgers_are_excluded() {
    let payments = vec![
        payment("2025-10-01", "mine", "Main"),
        payment("2025-10-01", "theirs", "Bank A"),
        payment("2025-10-01", "case", "MAIN"),
    ];
    let debits = vec![debit("2025-10-01", "x", "Bank A")];

    let lines = statement(&payments, &debits, "Main");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].desc_a, "mine");
    assert_eq!(lines[0].details(), "mine • Cash");
}
