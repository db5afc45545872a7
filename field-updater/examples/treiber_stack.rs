//! A lock-free stack whose head pointer is driven by a field updater.
//!
//! The stack type only declares `head` as `Volatile`; push and pop are
//! compare-and-set loops through a shared updater.
//!
//! Run with: `cargo run --example treiber_stack`

use field_updater::{AtomicFieldUpdater, FieldUpdaters, Volatile};
use std::sync::Arc;
use std::thread;

struct Node<T> {
    value: T,
    next: Option<Arc<Node<T>>>,
}

#[derive(FieldUpdaters)]
struct Stack<T: Send + Sync + 'static> {
    head: Volatile<Option<Arc<Node<T>>>>,
}

impl<T: Send + Sync + Clone + 'static> Stack<T> {
    fn new() -> Self {
        Self {
            head: Volatile::new(None),
        }
    }

    fn head() -> AtomicFieldUpdater<Self, Option<Arc<Node<T>>>> {
        Self::head_updater()
    }

    fn push(&self, value: T) {
        let head = Self::head();
        let mut current = head.get(self);
        loop {
            let node = Some(Arc::new(Node {
                value: value.clone(),
                next: current.clone(),
            }));
            if head.weak_compare_and_set(self, &current, node) {
                return;
            }
            current = head.get(self);
        }
    }

    fn pop(&self) -> Option<T> {
        let head = Self::head();
        loop {
            let current = head.get(self)?;
            let next = current.next.clone();
            if head.compare_and_set(self, &Some(current.clone()), next) {
                return Some(current.value.clone());
            }
        }
    }
}

fn main() {
    let stack = Arc::new(Stack::<u32>::new());

    let pushers: Vec<_> = (0..4u32)
        .map(|t| {
            let stack = stack.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    stack.push(t * 100 + i);
                }
            })
        })
        .collect();
    for h in pushers {
        h.join().unwrap();
    }

    let mut popped = Vec::new();
    while let Some(v) = stack.pop() {
        popped.push(v);
    }
    popped.sort_unstable();
    assert_eq!(popped, (0..400).collect::<Vec<_>>());
    println!("pushed and popped {} values", popped.len());
}
