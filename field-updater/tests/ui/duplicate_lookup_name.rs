use field_updater::{FieldUpdaters, Volatile};

#[derive(FieldUpdaters)]
struct Clash {
    first: Volatile<u32>,
    #[updater(rename = "first")]
    second: Volatile<u32>,
}

fn main() {}
