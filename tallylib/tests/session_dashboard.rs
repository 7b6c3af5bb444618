use rust_decimal::Decimal;
use tallylib::{
    dashboard::{LedgerSelection, Tone},
    error::TallyError,
    model::{NewDebit, NewPayment, NewReceivable},
    query,
    session::Session,
    storage::MemoryStorage,
    store::{Store, StoreOptions},
    views,
};

fn session() -> Session<MemoryStorage> {
    Session::new(Store::open(
        MemoryStorage::new(),
        StoreOptions {
            seed_inventory: false,
            ..StoreOptions::default()
        },
    ))
}

fn pay(ledger: &str, date: &str, amount: i64) -> NewPayment {
    NewPayment {
        date: Some(date.into()),
        name: "Ada".into(),
        kind: "Cash".into(),
        amount: Decimal::from(amount),
        ledger: ledger.into(),
    }
}

#[test]
fn no_ledger_means_neutral_zero_dashboard() {
    let s = session();
    assert_eq!(s.selection(), &LedgerSelection::None);
    let d = s.dashboard();
    assert_eq!(d.ledger, None);
    assert_eq!(d.net_worth, Decimal::ZERO);
    assert_eq!(d.tone, Tone::Neutral);
}

#[test]
fn first_ledger_is_selected_and_dashboard_follows_mutations() {
    let mut s = session();
    let up = s.apply(|st| st.add_ledger("Main")).unwrap();
    assert_eq!(up.dashboard.ledger.as_deref(), Some("Main"));

    s.apply(|st| st.add_ledger("Bank A")).unwrap();
    assert_eq!(s.selection().name(), Some("Main"));

    s.apply(|st| st.add_payment(pay("Main", "2025-10-01", 1000))).unwrap();
    let up = s
        .apply(|st| {
            st.add_debit(NewDebit {
                date: Some("2025-10-02".into()),
                invoice_type: "Supplier".into(),
                invoice_number: "INV-1".into(),
                amount: Decimal::from(4550),
                ledger: "Main".into(),
            })
        })
        .unwrap();
    assert!(up.is_durable());
    assert_eq!(up.dashboard.debits, Decimal::from(4550));
    assert_eq!(up.dashboard.credits, Decimal::from(1000));
    assert_eq!(up.dashboard.net_worth, Decimal::from(3550));
    assert_eq!(up.dashboard.tone, Tone::Positive);

    let d = s.select("Bank A").unwrap();
    assert_eq!(d.net_worth, Decimal::ZERO);
    assert!(matches!(s.select("Nope"), Err(TallyError::UnknownLedger(_))));
    assert_eq!(s.selection().name(), Some("Bank A"));
}

#[test]
fn removing_the_selected_ledger_falls_back() {
    let mut s = session();
    s.apply(|st| st.add_ledger("Main")).unwrap();
    s.apply(|st| st.add_ledger("Bank A")).unwrap();
    s.select("Bank A").unwrap();

    let up = s.apply(|st| st.remove_ledger("Bank A")).unwrap();
    assert_eq!(up.dashboard.ledger.as_deref(), Some("Main"));

    let up = s.apply(|st| st.remove_ledger("Main")).unwrap();
    assert_eq!(up.dashboard.ledger, None);
    assert_eq!(s.selection(), &LedgerSelection::None);
}

#[test]
fn validation_errors_leave_everything_alone() {
    let mut s = session();
    s.apply(|st| st.add_ledger("Main")).unwrap();
    let err = s.apply(|st| st.add_payment(pay("", "2025-10-01", 5))).unwrap_err();
    assert!(matches!(err, TallyError::MissingLedger));
    assert!(s.store().payments().is_empty());
    assert_eq!(s.dashboard().credits, Decimal::ZERO);
}

#[test]
fn receivables_move_between_ledger_totals() {
    let mut s = session();
    s.apply(|st| st.add_ledger("Main")).unwrap();
    s.apply(|st| st.add_ledger("Bank A")).unwrap();
    let id = s
        .apply(|st| {
            st.add_receivable(NewReceivable {
                customer_name: "Ada".into(),
                invoice_number: "R-9".into(),
                amount: Decimal::from(250),
                ledger: "Main".into(),
                ..NewReceivable::default()
            })
        })
        .unwrap()
        .value;
    assert_eq!(s.totals("Main").receivable_total, Decimal::from(250));
    assert_eq!(s.dashboard().tone, Tone::Negative);

    s.apply(|st| st.move_receivable(id, "Bank A")).unwrap();
    assert_eq!(s.totals("Main").receivable_total, Decimal::ZERO);
    assert_eq!(s.totals("Bank A").receivable_total, Decimal::from(250));
    assert_eq!(query::by_ledger(s.store().receivables(), "Bank A").len(), 1);
}

#[test]
fn boards_cover_every_ledger_in_order() {
    let mut s = session();
    s.apply(|st| st.add_ledger("Main")).unwrap();
    s.apply(|st| st.add_ledger("Bank A")).unwrap();
    s.apply(|st| st.add_payment(pay("Bank A", "2025-10-03", 30))).unwrap();
    s.apply(|st| st.add_payment(pay("Bank A", "2025-10-01", 10))).unwrap();

    let boards = s.boards();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].name, "Main");
    assert!(boards[0].lines.is_empty());
    assert_eq!(boards[1].totals.credit_total, Decimal::from(40));
    assert_eq!(boards[1].lines[0].amount, Decimal::from(10));

    let all = views::payments(s.store().payments());
    assert_eq!(all.total, Decimal::from(40));
    assert_eq!(all.rows[0].amount, Decimal::from(10));
}

#[test]
fn customer_boards_are_newest_first() {
    let mut s = session();
    s.apply(|st| st.add_ledger("Main")).unwrap();
    s.apply(|st| st.add_favorite("Ada")).unwrap();
    for (n, amount) in [("R-1", 10), ("R-2", 20)] {
        s.apply(|st| {
            st.add_receivable(NewReceivable {
                customer_name: "Ada".into(),
                invoice_number: n.into(),
                amount: Decimal::from(amount),
                ledger: "Main".into(),
                ..NewReceivable::default()
            })
        })
        .unwrap();
    }
    s.apply(|st| {
        st.add_receivable(NewReceivable {
            customer_name: "Bola".into(),
            invoice_number: "R-3".into(),
            amount: Decimal::from(5),
            ledger: "Main".into(),
            ..NewReceivable::default()
        })
    })
    .unwrap();

    let store = s.store();
    let boards = views::customer_boards(store.receivables(), store.favorites());
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].customer.as_deref(), Some("Ada"));
    assert_eq!(boards[0].total, Decimal::from(30));
    assert_eq!(boards[0].rows[0].invoice_number, "R-2");
    assert_eq!(boards[0].rows[1].invoice_number, "R-1");

    let all = views::receivables(store.receivables());
    assert_eq!(all.total, Decimal::from(35));
    assert_eq!(all.rows[0].invoice_number, "R-3");
}
