//! Property-based tests for the list engine using proptest.

use listkit::{
    bulk_remove, select_all, toggle_one, total_pages, Dir, Keyed, ListEngine, Number,
    QueryDescriptor, Record, Selection, Value,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: usize,
    name: String,
    age: Option<i64>,
    score: f64,
}

impl Record for Person {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "name" => Value::String(&self.name),
            "age" => match self.age {
                Some(age) => Value::Number(Number::I64(age)),
                None => Value::None,
            },
            "score" => Value::Number(Number::F64(self.score)),
            _ => Value::None,
        }
    }
}

impl Keyed for Person {
    type Key = usize;

    fn key(&self) -> usize {
        self.id
    }
}

// Ids follow input position so stability can be checked through them.
fn people_strategy(max: usize) -> impl Strategy<Value = Vec<Person>> {
    prop::collection::vec(
        (
            "[a-zA-Zé ]{0,8}",
            prop::option::of(0i64..60),
            prop_oneof![any::<f64>(), Just(f64::NAN)],
        ),
        0..max,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(id, (name, age, score))| Person {
                id,
                name,
                age,
                score,
            })
            .collect()
    })
}

fn descriptor_strategy() -> impl Strategy<Value = QueryDescriptor> {
    (
        "[a-z]{0,2}",
        prop::option::of(0i64..60),
        prop::option::of(0i64..60),
        prop::option::of((
            prop::sample::select(vec!["name", "age", "score", "missing"]),
            any::<bool>(),
        )),
        0usize..6,
        0usize..7,
    )
        .prop_map(|(search, min, max, sort, page, page_size)| {
            let d = QueryDescriptor::new()
                .search(search)
                .min_opt("age", min)
                .max_opt("age", max)
                .page(page)
                .page_size(page_size);
            match sort {
                Some((field, true)) => d.sort_by(field, Dir::Asc),
                Some((field, false)) => d.sort_by(field, Dir::Desc),
                None => d,
            }
        })
}

#[derive(Debug, Clone)]
struct Reading {
    value: Number,
}

impl Record for Reading {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "value" => Value::Number(self.value),
            _ => Value::None,
        }
    }
}

const TWO_POW_53: u64 = 1 << 53;

// Integers and floats straddling 2^53, where f64 stops representing every
// integer, plus the occasional infinity or NaN.
fn reading_strategy() -> impl Strategy<Value = Number> {
    let near = (TWO_POW_53 - 4)..(TWO_POW_53 + 4);
    prop_oneof![
        near.clone().prop_map(Number::U64),
        near.clone().prop_map(|n| Number::I64(n as i64)),
        near.clone().prop_map(|n| Number::I64(-(n as i64))),
        near.prop_map(|n| Number::F64(n as f64)),
        Just(Number::F64(f64::INFINITY)),
        Just(Number::F64(f64::NAN)),
    ]
}

fn engine() -> ListEngine {
    ListEngine::new(["name"])
}

fn ids(items: &[&Person]) -> Vec<usize> {
    items.iter().map(|p| p.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Any descriptor produces a well-formed page without panicking.
    #[test]
    fn pages_are_well_formed(people in people_strategy(40), d in descriptor_strategy()) {
        let page = engine().query(&people, &d);

        prop_assert!(page.items.len() <= d.page_size);
        prop_assert!(page.total_items <= people.len());
        prop_assert_eq!(page.total_pages, total_pages(page.total_items, d.page_size));
        prop_assert_eq!(page.page, d.page);
        if d.page == 0 || d.page > page.total_pages {
            prop_assert!(page.items.is_empty());
        }
    }

    /// The same records and descriptor always produce the same page.
    #[test]
    fn queries_are_deterministic(people in people_strategy(30), d in descriptor_strategy()) {
        let first = engine().query(&people, &d);
        let second = engine().query(&people, &d);
        prop_assert_eq!(ids(&first.items), ids(&second.items));
        prop_assert_eq!(first.total_items, second.total_items);
    }

    /// Walking every page visits the full filtered result exactly once.
    #[test]
    fn pages_partition_the_result(
        people in people_strategy(40),
        d in descriptor_strategy(),
        page_size in 1usize..8,
    ) {
        let d = d.page_size(page_size);
        let all = engine().filter(&people, &d);

        let mut walked = Vec::new();
        for page in 1..=total_pages(all.len(), page_size) {
            let result = engine().query(&people, &d.clone().page(page));
            walked.extend(ids(&result.items));
        }
        prop_assert_eq!(walked, ids(&all));
    }

    /// Filtering an already filtered result changes nothing.
    #[test]
    fn filtering_is_idempotent(people in people_strategy(30), d in descriptor_strategy()) {
        let d = d.unsorted();
        let once: Vec<Person> = engine().filter(&people, &d).into_iter().cloned().collect();
        let twice = engine().filter(&once, &d);
        prop_assert_eq!(ids(&twice), once.iter().map(|p| p.id).collect::<Vec<_>>());
    }

    /// Search and filters keep collection order when unsorted.
    #[test]
    fn unsorted_results_keep_input_order(people in people_strategy(30), d in descriptor_strategy()) {
        let d = d.unsorted();
        let result = ids(&engine().filter(&people, &d));
        let mut sorted = result.clone();
        sorted.sort_unstable();
        prop_assert_eq!(result, sorted);
    }

    /// Records with equal sort keys keep their input order, in both
    /// directions, and missing values come last.
    #[test]
    fn sort_is_stable(people in people_strategy(40), asc in any::<bool>()) {
        let dir = if asc { Dir::Asc } else { Dir::Desc };
        let d = QueryDescriptor::new().sort_by("age", dir);
        let sorted = engine().filter(&people, &d);

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match (a.age, b.age) {
                (Some(x), Some(y)) if x == y => prop_assert!(a.id < b.id),
                (Some(x), Some(y)) => {
                    let ordered = if asc { x < y } else { x > y };
                    prop_assert!(ordered)
                }
                (None, None) => prop_assert!(a.id < b.id),
                (None, Some(_)) => prop_assert!(false, "missing age sorted before a present one"),
                (Some(_), None) => {}
            }
        }
    }

    /// Select-all toggles only the visible page's keys.
    #[test]
    fn select_all_is_page_scoped(
        selected in prop::collection::hash_set(0usize..20, 0..10),
        page_keys in prop::collection::vec(0usize..20, 0..8),
    ) {
        let selection = Selection::from_keys(selected.iter().copied());
        let after = select_all(&page_keys, &selection);

        for key in 0..20 {
            if !page_keys.contains(&key) {
                prop_assert_eq!(after.contains(&key), selection.contains(&key));
            }
        }
        if page_keys.iter().all(|k| selection.contains(k)) {
            prop_assert!(page_keys.iter().all(|k| !after.contains(k)));
        } else {
            prop_assert!(page_keys.iter().all(|k| after.contains(k)));
        }
    }

    /// Toggling a key twice restores the selection.
    #[test]
    fn toggle_one_is_an_involution(
        selected in prop::collection::hash_set(0usize..20, 0..10),
        key in 0usize..20,
    ) {
        let selection = Selection::from_keys(selected);
        let twice = toggle_one(key, &toggle_one(key, &selection));
        prop_assert_eq!(twice, selection);
    }

    /// Bulk removal drops exactly the selected records and keeps order.
    #[test]
    fn bulk_remove_drops_selected(
        people in people_strategy(30),
        selected in prop::collection::hash_set(0usize..40, 0..20),
    ) {
        let selection = Selection::from_keys(selected.iter().copied());
        let remaining = bulk_remove(&people, &selection);

        prop_assert!(remaining.iter().all(|p| !selection.contains(&p.id)));
        let expected: Vec<usize> = people
            .iter()
            .map(|p| p.id)
            .filter(|id| !selected.contains(id))
            .collect();
        prop_assert_eq!(remaining.iter().map(|p| p.id).collect::<Vec<_>>(), expected);
    }

    /// Columns mixing integer and float readings near 2^53 sort into a
    /// monotone order, with NaN readings trailing.
    #[test]
    fn mixed_number_columns_sort_monotonically(
        values in prop::collection::vec(reading_strategy(), 0..40),
        asc in any::<bool>(),
    ) {
        let readings: Vec<Reading> = values
            .into_iter()
            .map(|value| Reading { value })
            .collect();
        let dir = if asc { Dir::Asc } else { Dir::Desc };
        let d = QueryDescriptor::new().sort_by("value", dir);
        let sorted = ListEngine::new(["value"]).filter(&readings, &d);
        prop_assert_eq!(sorted.len(), readings.len());

        let first_nan = sorted
            .iter()
            .position(|r| r.value.is_nan())
            .unwrap_or(sorted.len());
        prop_assert!(sorted[first_nan..].iter().all(|r| r.value.is_nan()));

        for pair in sorted[..first_nan].windows(2) {
            let ordering = pair[0].value.compare(pair[1].value);
            prop_assert!(ordering.is_some());
            let out_of_order = if asc {
                ordering == Some(std::cmp::Ordering::Greater)
            } else {
                ordering == Some(std::cmp::Ordering::Less)
            };
            prop_assert!(!out_of_order, "{:?} then {:?}", pair[0].value, pair[1].value);
        }
    }
}
