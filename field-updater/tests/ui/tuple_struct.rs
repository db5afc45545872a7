use field_updater::{FieldUpdaters, Volatile};

#[derive(FieldUpdaters)]
struct Pair(Volatile<u32>, Volatile<u32>);

fn main() {}
