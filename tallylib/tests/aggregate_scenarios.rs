use rust_decimal::Decimal;
use tallylib::{
    aggregate::{self, Books},
    views,
    model::{NewDebit, NewPayment, NewReceivable, NewStock},
    storage::{keys, MemoryStorage},
    store::{Store, StoreOptions},
};

fn opts() -> StoreOptions {
    StoreOptions {
        seed_inventory: false,
        ..StoreOptions::default()
    }
}

fn pay(ledger: &str, amount: i64) -> NewPayment {
    NewPayment {
        date: Some("2025-10-01".into()),
        name: "Customer".into(),
        kind: "Cash".into(),
        amount: Decimal::from(amount),
        ledger: ledger.into(),
    }
}

fn debit(ledger: &str, amount: i64) -> NewDebit {
    NewDebit {
        date: Some("2025-10-01".into()),
        invoice_type: "Supplier".into(),
        invoice_number: "INV-1".into(),
        amount: Decimal::from(amount),
        ledger: ledger.into(),
    }
}

#[test]
fn main_ledger_scenario() {
    let mut store = Store::open(MemoryStorage::new(), opts());
    store.add_ledger("Main").unwrap();
    store.add_payment(pay("Main", 1000)).unwrap();
    store.add_debit(debit("Main", 4550)).unwrap();

    let t = aggregate::totals(store.books(), "Main");
    assert_eq!(t.credit_total, Decimal::from(1000));
    assert_eq!(t.debit_total, Decimal::from(4550));
    assert_eq!(t.balance, Decimal::from(3550));
    assert_eq!(t.receivable_total, Decimal::ZERO);
    assert_eq!(t.stock_value, Decimal::ZERO);
    assert_eq!(t.net_worth, Decimal::from(3550));
}

#[test]
fn stock_value_multiplies_price_by_quantity() {
    let mut store = Store::open(MemoryStorage::new(), opts());
    store.add_ledger("Main").unwrap();
    store
        .upsert_stock(NewStock {
            product_name: "Tydineal Cream".into(),
            price: Some(Decimal::from(700)),
            quantity: 3,
            ledger: "Main".into(),
        })
        .unwrap();
    store
        .upsert_stock(NewStock {
            product_name: "Tydiclear Cream".into(),
            price: Some(Decimal::from(515)),
            quantity: 2,
            ledger: "Main".into(),
        })
        .unwrap();

    assert_eq!(aggregate::stock_value(store.inventory(), "Main"), Decimal::from(3130));
}

#[test]
fn huge_amounts_clamp_instead_of_overflowing() {
    let mut store = Store::open(MemoryStorage::new(), opts());
    store.add_ledger("Main").unwrap();
    for _ in 0..2 {
        store
            .add_payment(NewPayment {
                amount: Decimal::MAX,
                ..pay("Main", 0)
            })
            .unwrap();
    }
    store
        .upsert_stock(NewStock {
            product_name: "Tydisil".into(),
            price: Some(Decimal::MAX),
            quantity: 2,
            ledger: "Main".into(),
        })
        .unwrap();

    let t = aggregate::totals(store.books(), "Main");
    assert_eq!(t.credit_total, Decimal::MAX);
    assert_eq!(t.stock_value, Decimal::MAX);
    assert_eq!(t.balance, Decimal::MIN);
    assert_eq!(t.net_worth, Decimal::MIN);
    assert_eq!(views::payments(store.payments()).total, Decimal::MAX);
    assert_eq!(views::inventory(store.inventory(), Some("Main")).total, Decimal::MAX);
}

#[test]
fn ledger_without_records_is_all_zero() {
    let books = Books {
        payments: &[],
        debits: &[],
        receivables: &[],
        inventory: &[],
    };
    let t = aggregate::totals(books, "Nowhere");
    assert_eq!(t, aggregate::LedgerTotals::default());
    assert_eq!(t.balance, Decimal::ZERO);
}

#[test]
fn totals_only_count_their_own_ledger() {
    let mut store = Store::open(MemoryStorage::new(), opts());
    store.add_ledger("Main").unwrap();
    store.add_ledger("Bank A").unwrap();
    store.add_ledger("main").unwrap();
    store.add_payment(pay("Main", 100)).unwrap();
    store.add_payment(pay("Bank A", 40)).unwrap();
    store.add_payment(pay("main", 7)).unwrap();
    store.add_debit(debit("Bank A", 500)).unwrap();
    store
        .add_receivable(NewReceivable {
            customer_name: "Ada".into(),
            invoice_number: "R1".into(),
            amount: Decimal::from(60),
            ledger: "Bank A".into(),
            ..NewReceivable::default()
        })
        .unwrap();
    store
        .upsert_stock(NewStock {
            product_name: "Anofast Gel".into(),
            price: None,
            quantity: 1,
            ledger: "Bank A".into(),
        })
        .unwrap();

    let main = aggregate::totals(store.books(), "Main");
    assert_eq!(main.credit_total, Decimal::from(100));
    assert_eq!(main.debit_total, Decimal::ZERO);
    assert_eq!(main.net_worth, Decimal::from(-100));

    let bank = aggregate::totals(store.books(), "Bank A");
    assert_eq!(bank.credit_total, Decimal::from(40));
    assert_eq!(bank.debit_total, Decimal::from(500));
    assert_eq!(bank.receivable_total, Decimal::from(60));
    // catalog price for Anofast Gel
    assert_eq!(bank.stock_value, Decimal::from(700));
    assert_eq!(
        bank.net_worth,
        bank.debit_total - (bank.credit_total + bank.receivable_total + bank.stock_value)
    );
    assert_eq!(bank.net_worth, Decimal::from(-300));
}

#[test]
fn non_numeric_amounts_count_as_zero() {
    let payments = r#"[
        {"date":"2025-10-01","name":"a","type":"Cash","amount":"","ledger":"Main"},
        {"date":"2025-10-02","name":"b","type":"Cash","amount":"lots","ledger":"Main"},
        {"date":"2025-10-03","name":"c","type":"Cash","amount":null,"ledger":"Main"},
        {"date":"2025-10-04","name":"d","type":"Cash","ledger":"Main"},
        {"date":"2025-10-05","name":"e","type":"Cash","amount":"250","ledger":"Main"},
        {"date":"2025-10-06","name":"f","type":"Cash","amount":12.5,"ledger":"Main"}
    ]"#;
    let inventory = r#"[
        {"productName":"X","price":"abc","quantity":4,"ledger":"Main"},
        {"productName":"Y","price":10,"quantity":"many","ledger":"Main"},
        {"productName":"Z","price":"3","quantity":"2","ledger":"Main"}
    ]"#;
    let storage = MemoryStorage::new()
        .with(keys::LEDGERS, r#"["Main"]"#)
        .with(keys::PAYMENTS, payments)
        .with(keys::INVENTORY, inventory);
    let store = Store::open(storage, opts());

    assert_eq!(store.payments().len(), 6);
    let t = aggregate::totals(store.books(), "Main");
    assert_eq!(t.credit_total, Decimal::new(2625, 1));
    assert_eq!(t.stock_value, Decimal::from(6));
}
