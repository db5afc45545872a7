use field_updater::{FieldUpdaters, Volatile};

#[derive(FieldUpdaters)]
struct Options {
    #[updater(hide)]
    value: Volatile<u32>,
}

fn main() {}
