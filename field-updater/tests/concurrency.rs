use field_updater::{AtomicFieldUpdater, FieldUpdaters, Volatile};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(FieldUpdaters, Default)]
struct Shared {
    value: Volatile<Option<Arc<i32>>>,
    counter: Volatile<u64>,
    flag: Volatile<bool>,
}

fn int(v: i32) -> Option<Arc<i32>> {
    Some(Arc::new(v))
}

fn same(a: &Option<Arc<i32>>, b: &Option<Arc<i32>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[test]
fn compare_and_set_in_one_thread_enables_another() {
    let shared = Arc::new(Shared::default());
    let a = AtomicFieldUpdater::<Shared, Option<Arc<i32>>>::new("value").unwrap();
    let (one, two, three) = (int(1), int(2), int(3));
    shared.value.store(one.clone());

    let t = {
        let shared = shared.clone();
        let (two, three) = (two.clone(), three.clone());
        thread::spawn(move || {
            while !a.compare_and_set(&shared, &two, three.clone()) {
                thread::yield_now();
            }
        })
    };

    assert!(a.compare_and_set(&shared, &one, two));
    t.join().unwrap();
    assert!(same(&a.get(&shared), &three));
}

#[test]
fn concurrent_get_and_set_yields_a_permutation() {
    const THREADS: i32 = 8;

    let shared = Arc::new(Shared::default());
    let a = Shared::value_updater();
    let initial = int(-1);
    shared.value.store(initial.clone());

    let supplied: Vec<Arc<i32>> = (0..THREADS).map(Arc::new).collect();
    let barrier = Arc::new(Barrier::new(THREADS as usize));

    let handles: Vec<_> = supplied
        .iter()
        .cloned()
        .map(|v| {
            let shared = shared.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                a.get_and_set(&shared, Some(v))
            })
        })
        .collect();

    let previous: Vec<Arc<i32>> = handles
        .into_iter()
        .map(|h| h.join().unwrap().expect("never None"))
        .collect();
    let last = a.get(&shared).expect("never None");

    // Every value (initial plus all supplied) is handed out exactly once:
    // either returned as a previous value or left in the field.
    let mut seen: Vec<*const i32> = previous.iter().map(Arc::as_ptr).collect();
    seen.push(Arc::as_ptr(&last));
    let unique: HashSet<*const i32> = seen.iter().copied().collect();
    assert_eq!(unique.len(), seen.len());

    let mut expected: HashSet<*const i32> = supplied.iter().map(Arc::as_ptr).collect();
    expected.insert(Arc::as_ptr(initial.as_ref().unwrap()));
    assert_eq!(unique, expected);

    assert!(supplied.iter().any(|v| Arc::ptr_eq(v, &last)));
    assert!(previous.iter().any(|v| same(&Some(v.clone()), &initial)));
}

#[test]
fn update_and_get_counts_every_increment() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 1000;

    let shared = Arc::new(Shared::default());
    let counter = AtomicFieldUpdater::<Shared, u64>::new("counter").unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    counter.update_and_get(&shared, |c| c + 1);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(counter.get(&shared), THREADS * PER_THREAD);
}

#[test]
fn weak_compare_and_set_loop_makes_progress_under_contention() {
    const THREADS: u64 = 4;
    const PER_THREAD: u64 = 500;

    let shared = Arc::new(Shared::default());
    let counter = Shared::counter_updater();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    loop {
                        let current = counter.get(&shared);
                        if counter.weak_compare_and_set(&shared, &current, current + 1) {
                            break;
                        }
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(shared.counter.load(), THREADS * PER_THREAD);
}

#[test]
fn only_one_thread_wins_a_flag() {
    const THREADS: usize = 8;

    let shared = Arc::new(Shared::default());
    let flag = Shared::flag_updater();
    let barrier = Arc::new(Barrier::new(THREADS));

    let winners: usize = (0..THREADS)
        .map(|_| {
            let shared = shared.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                flag.compare_and_set(&shared, &false, true)
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap() as usize)
        .sum();

    assert_eq!(winners, 1);
    assert!(flag.get(&shared));
}

#[test]
fn release_store_is_seen_by_acquiring_reader() {
    let shared = Arc::new(Shared::default());
    let value = Shared::value_updater();
    let flag = Shared::flag_updater();
    let payload = int(42);

    let reader = {
        let shared = shared.clone();
        thread::spawn(move || {
            while !flag.get(&shared) {
                std::hint::spin_loop();
            }
            value.get(&shared)
        })
    };

    value.set(&shared, payload.clone());
    flag.lazy_set(&shared, true);

    let observed = reader.join().unwrap();
    assert!(same(&observed, &payload));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn updater_shared_across_tasks() {
    let shared = Arc::new(Shared::default());
    let counter = Shared::counter_updater();

    let mut handles = vec![];
    for _ in 0..10 {
        let s = shared.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..100 {
                counter.get_and_update(&s, |c| c + 1);
                tokio::task::yield_now().await;
            }
        }));
    }

    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(counter.get(&shared), 1000);
}
