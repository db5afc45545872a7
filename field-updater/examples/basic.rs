//! Minimal field-updater example.
//!
//! Run with: `cargo run --example basic`

use field_updater::{AtomicFieldUpdater, FieldUpdaters, Volatile};
use std::sync::Arc;
use std::thread;

#[derive(FieldUpdaters, Default)]
struct Counter {
    value: Volatile<u32>,
    label: Volatile<Option<Arc<String>>>,
}

fn main() {
    let counter = Arc::new(Counter::default());

    // Resolve by name; checked once, then reused.
    let value = AtomicFieldUpdater::<Counter, u32>::new("value").expect("field exists");
    let label = Counter::label_updater();

    label.set(&counter, Some(Arc::new("hits".into())));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    value.update_and_get(&counter, |v| v + 1);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let name = label.get(&counter).map(|s| s.to_string()).unwrap_or_default();
    println!("{}: {}", name, value.get(&counter));

    // Asking for the wrong type fails at construction, not at use.
    match AtomicFieldUpdater::<Counter, u64>::new("value") {
        Ok(_) => unreachable!(),
        Err(e) => println!("rejected: {e}"),
    }
}
