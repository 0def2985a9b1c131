use memotrack::prelude::*;
use memotrack::Result;

tracked_struct! {
    pub struct Customer {
        name: String,
    }
}

tracked_struct! {
    pub struct LineItem {
        sku: String,
        quantity: u32,
    }
}

tracked_struct! {
    pub struct Order {
        id: String,
        #[track(deep)]
        customer: Customer,
        #[track(deep)]
        lines: TrackableList<LineItem>,
    }
}

fn main() -> Result<()> {
    println!("📦 memotrack - order editing session");
    println!("{}", "=".repeat(70));

    let mut order = Order::new(
        "A".to_string(),
        Customer::new("Ann".to_string()),
        TrackableList::from_vec(vec![LineItem::new("tea".to_string(), 1)]),
    );
    order.track();
    order.customer().track();

    // Property changes
    println!("\n✏️  Renaming order A -> B -> A -> C");
    order.set_id("B".to_string());
    println!("   after B: dirty = {}", order.is_dirty(false));
    order.set_id("A".to_string());
    println!("   back to A: dirty = {}", order.is_dirty(false));
    order.set_id("C".to_string());
    println!(
        "   after C: original id = {:?}",
        order.original_value_of(Order::ID)
    );

    order.accept_changes();
    println!("✅ Accepted, dirty = {}", order.is_dirty(false));

    // Nested changes
    println!("\n{}", "=".repeat(70));
    println!("🔍 Nested edits");
    println!("{}", "=".repeat(70));
    order.customer_mut().set_name("Bob".to_string());
    if let Some(mut line) = order.lines_mut().get_mut(0) {
        line.set_quantity(3);
    }
    println!("   shallow dirty = {}", order.is_dirty(false));
    println!("   deep dirty    = {}", order.is_dirty(true));
    println!(
        "   lines structurally changed = {}",
        order.lines().has_structural_change()
    );

    // Rollback
    println!("\n{}", "=".repeat(70));
    println!("↩️  Rollback");
    println!("{}", "=".repeat(70));
    order.set_id("D".to_string());
    println!("   changed: {:?}", order.changed_properties());
    order.rollback_changes();
    order.customer_mut().rollback_changes();
    if let Some(mut line) = order.lines_mut().get_mut(0) {
        line.rollback_changes();
    }
    println!("   id = {}, customer = {}", order.id(), order.customer().name());
    println!("   deep dirty after rollback = {}", order.is_dirty(true));

    // Typed errors
    let untracked = Customer::new("Cid".to_string());
    if let Err(err) = untracked.tracker() {
        println!("\n⚠️  {}", err);
    }

    Ok(())
}
