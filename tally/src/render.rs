//! Plain-text tables for stdout.

use tallylib::{
    aggregate::LedgerBoard,
    dashboard::{Dashboard, Tone},
    money::Money,
    storage::Collection,
    views::{InventoryView, PaymentsView, ReceivablesView},
};

pub fn saved(unsaved: &[Collection]) {
    if !unsaved.is_empty() {
        let keys: Vec<String> = unsaved.iter().map(|c| c.to_string()).collect();
        eprintln!("warning: save failed for {}; change kept for this run only", keys.join(", "));
    }
}

pub fn dashboard(d: &Dashboard, m: &Money) {
    match &d.ledger {
        Some(name) => println!("== Dashboard • {name} =="),
        None => println!("== Dashboard (no ledger selected) =="),
    }
    println!("{:<12} {:>20}", "Debits", m.format(d.debits));
    println!("{:<12} {:>20}", "Credits", m.format(d.credits));
    println!("{:<12} {:>20}", "Receivables", m.format(d.receivables));
    println!("{:<12} {:>20}", "Stock", m.format(d.stock));
    let tag = match d.tone {
        Tone::Positive => "+",
        Tone::Negative => "-",
        Tone::Neutral => " ",
    };
    println!("{:<12} {:>20} {tag}", "Net worth", m.format(d.net_worth));
}

pub fn board(b: &LedgerBoard, m: &Money) {
    println!("\n== Ledger • {} ==", b.name);
    println!("{:<36} {:<26} {:<6} {:<40} {:>18}", "Id", "Date", "Type", "Details", "Amount");
    for l in &b.lines {
        println!(
            "{:<36} {:<26} {:<6} {:<40} {:>18}",
            l.id,
            l.date,
            l.kind.label(),
            l.details(),
            m.format(l.amount)
        );
    }
    println!(
        "Totals  Credits: {} • Debits: {} • Balance: {}",
        m.format(b.totals.credit_total),
        m.format(b.totals.debit_total),
        m.format(b.totals.balance)
    );
}

pub fn payments(v: &PaymentsView<'_>, m: &Money) {
    println!("{:<36} {:<26} {:<20} {:<12} {:<12} {:>18}", "Id", "Date", "Name", "Type", "Ledger", "Amount");
    for p in &v.rows {
        println!(
            "{:<36} {:<26} {:<20} {:<12} {:<12} {:>18}",
            p.id,
            p.date,
            p.name,
            p.kind,
            p.ledger,
            m.format(p.amount)
        );
    }
    println!("Total: {}", m.format(v.total));
}

pub fn receivables(v: &ReceivablesView<'_>, m: &Money) {
    if let Some(name) = &v.customer {
        println!("\n== Receivables • {name} ==");
    }
    println!(
        "{:<36} {:<26} {:<12} {:<20} {:<10} {:<12} {:>18}  {}",
        "Id", "Entered", "Invoice Date", "Customer", "Invoice #", "Ledger", "Amount", "Comment"
    );
    for r in &v.rows {
        println!(
            "{:<36} {:<26} {:<12} {:<20} {:<10} {:<12} {:>18}  {}",
            r.id,
            r.created_at,
            r.invoice_date,
            r.customer_name,
            r.invoice_number,
            r.ledger,
            m.format(r.amount),
            r.comment.as_deref().unwrap_or("")
        );
    }
    println!("Total: {}", m.format(v.total));
}

pub fn inventory(v: &InventoryView<'_>, m: &Money) {
    println!("{:<36} {:<24} {:<12} {:>16} {:>6} {:>18}", "Id", "Product", "Ledger", "Price", "Qty", "Value");
    for i in &v.rows {
        println!(
            "{:<36} {:<24} {:<12} {:>16} {:>6} {:>18}",
            i.id,
            i.product_name,
            i.ledger,
            m.format(i.price),
            i.quantity,
            m.format(i.line_value())
        );
    }
    println!("Total: {}", m.format(v.total));
}

pub fn names(title: &str, names: &[String]) {
    println!("== {title} ==");
    for n in names {
        println!("- {n}");
    }
}
