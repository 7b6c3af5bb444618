use rust_decimal::Decimal;
use tallylib::{
    aggregate,
    export::write_table,
    model::{NewDebit, NewPayment},
    storage::MemoryStorage,
    store::{Store, StoreOptions},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a throwaway ledger in memory and print its statement as CSV.
    let mut store = Store::open(MemoryStorage::new(), StoreOptions::default());
    let _ = store.add_ledger("Main")?;
    let _ = store.add_payment(NewPayment {
        date: Some("2025-10-02".into()),
        name: "Ada".into(),
        kind: "Cash".into(),
        amount: Decimal::new(1000, 0),
        ledger: "Main".into(),
    })?;
    let _ = store.add_debit(NewDebit {
        date: Some("2025-10-01".into()),
        invoice_type: "Supplier".into(),
        invoice_number: "INV-7".into(),
        amount: Decimal::new(4550, 0),
        ledger: "Main".into(),
    })?;

    let lines = aggregate::statement(store.payments(), store.debits(), "Main");
    write_table(std::io::stdout(), &lines)?;
    Ok(())
}
