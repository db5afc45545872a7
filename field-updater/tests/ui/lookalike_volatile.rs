use field_updater::FieldUpdaters;

struct Volatile<T>(T);

#[derive(FieldUpdaters)]
struct Sneaky {
    value: Volatile<u32>,
}

fn main() {}
