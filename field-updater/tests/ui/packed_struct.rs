use field_updater::{FieldUpdaters, Volatile};

#[derive(FieldUpdaters)]
#[repr(C, packed)]
struct Packed {
    tag: u8,
    big: Volatile<u64>,
}

#[derive(FieldUpdaters)]
#[repr(packed(2))]
struct PackedTwo {
    big: Volatile<u64>,
}

fn main() {}
