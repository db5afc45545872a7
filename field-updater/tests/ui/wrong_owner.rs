use field_updater::{FieldUpdaters, Volatile};

#[derive(FieldUpdaters, Default)]
struct A {
    n: Volatile<u32>,
}

#[derive(FieldUpdaters, Default)]
struct B {
    n: Volatile<u32>,
}

fn main() {
    let b = B::default();
    // An updater for `A` cannot be pointed at a `B`.
    A::n_updater().get(&b);
}
