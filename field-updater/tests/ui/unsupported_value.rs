use field_updater::{FieldUpdaters, Volatile};

#[derive(FieldUpdaters)]
struct Text {
    body: Volatile<String>,
}

fn main() {}
