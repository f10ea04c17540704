/* tests/set_tests.rs */

use std::sync::Arc;

use indexmap::IndexSet;
use trellis::backend::MemoryBackend;
use trellis::codec::{Persist, Tag};
use trellis::entry::BuildError;
use trellis::holder::{ConfigRoot, DetachedHolder};
use trellis::kinds::{NumberKind, SetKind, int, set, string};
use trellis::message::{DUPLICATE_ELEMENT, Message, SET_EMPTY, SET_MAX_SIZE, SET_MIN_SIZE, TOO_LARGE};

fn ints(values: &[i32]) -> IndexSet<i32> {
	values.iter().copied().collect()
}

#[test]
fn test_duplicate_rows_collapse_and_are_reported() {
	let holder = DetachedHolder::new("sets");
	let entry = set(int(0), IndexSet::new()).build(&holder, "s").unwrap();
	let kind: &SetKind<NumberKind<i32>> = entry.kind();

	let presented = vec![1, 2, 1];
	assert_eq!(kind.duplicate_rows(&presented), [true, false, true]);
	let errors = entry.presentation_errors(&presented);
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].key(), DUPLICATE_ELEMENT);
	assert_eq!(errors[0].index(), Some(0));

	let value = entry.from_presentation(&presented).unwrap();
	assert_eq!(value.iter().copied().collect::<Vec<_>>(), [1, 2]);
}

#[test]
fn test_size_bounds_use_set_messages() {
	let holder = DetachedHolder::new("sets");
	let entry = set(int(0), ints(&[1])).min_size(1).build(&holder, "a").unwrap();
	assert_eq!(entry.presentation_errors(&vec![])[0].key(), SET_EMPTY);

	let entry = set(int(0), ints(&[1, 2])).min_size(2).build(&holder, "b").unwrap();
	let errors = entry.presentation_errors(&vec![1]);
	assert_eq!(errors[0].key(), SET_MIN_SIZE);
	assert_eq!(errors[0].args(), ["2"]);

	let entry = set(int(0), ints(&[1])).max_size(1).build(&holder, "c").unwrap();
	assert_eq!(entry.errors(&ints(&[1, 2]))[0].key(), SET_MAX_SIZE);
}

#[test]
fn test_element_errors_are_indexed() {
	let holder = DetachedHolder::new("sets");
	let entry = set(int(0).max(5), IndexSet::new())
		.element_error(|v| (*v % 2 == 1).then(|| Message::new("odd")))
		.build(&holder, "s")
		.unwrap();

	let errors = entry.presentation_errors(&vec![2, 9, 3]);
	assert_eq!(errors.len(), 3);
	assert_eq!(errors[0].key(), TOO_LARGE);
	assert_eq!(errors[0].index(), Some(1));
	assert_eq!(errors[1].key(), "odd");
	assert_eq!(errors[2].to_string(), "odd, at index 3");
}

#[test]
fn test_invalid_default_fails_build() {
	let holder = DetachedHolder::new("sets");
	match set(int(0).max(5), ints(&[7])).build(&holder, "s").unwrap_err() {
		BuildError::InvalidDefault { path, .. } => assert_eq!(path, "sets[s]"),
		_ => panic!("Expected InvalidDefault error"),
	}
	match set(int(0).temp(), IndexSet::new()).build(&holder, "t").unwrap_err() {
		BuildError::NotNestable { path } => assert_eq!(path, "sets[t][*]"),
		_ => panic!("Expected NotNestable error"),
	}
}

#[test]
fn test_persisted_as_list_in_insertion_order() {
	let holder = DetachedHolder::new("sets");
	let entry = set(int(0), IndexSet::new()).build(&holder, "s").unwrap();

	let persisted = entry.for_persisted(&ints(&[3, 1, 2]));
	assert_eq!(
		persisted.to_tag(),
		Tag::List(vec![Tag::Int(3), Tag::Int(1), Tag::Int(2)])
	);
	let decoded = entry.from_persisted(&vec![1, 1, 2]).unwrap();
	assert_eq!(decoded.iter().copied().collect::<Vec<_>>(), [1, 2]);
}

#[test]
fn test_bad_stored_element_reads_default() {
	let backend = Arc::new(MemoryBackend::with_values([
		("good", Tag::List(vec![Tag::Int(4), Tag::Int(5)])),
		("bad", Tag::List(vec![Tag::Int(4), Tag::Long(i64::MAX)])),
	]));
	let mut root = ConfigRoot::builder()
		.owner("set_staged")
		.backend(backend)
		.build()
		.unwrap();
	root.add("good", &set(int(0), ints(&[9]))).unwrap();
	root.add("bad", &set(int(0), ints(&[9]))).unwrap();

	assert_eq!(root.get::<IndexSet<i32>>("good").unwrap(), ints(&[4, 5]));
	assert_eq!(root.get::<IndexSet<i32>>("bad").unwrap(), ints(&[9]));
}

#[test]
fn test_set_through_holder() {
	let mut root = ConfigRoot::builder().owner("set_holder").build().unwrap();
	let tags: IndexSet<String> = ["a".to_string()].into_iter().collect();
	root.add("tags", &set(string("").non_empty(), tags)).unwrap();

	let next: IndexSet<String> = ["b".to_string(), "a".to_string()].into_iter().collect();
	assert!(root.set("tags", next.clone()).unwrap());
	assert!(root.is_dirty());
	let stored = root.get::<IndexSet<String>>("tags").unwrap();
	assert_eq!(stored.iter().collect::<Vec<_>>(), ["b", "a"]);

	let invalid: IndexSet<String> = [String::new()].into_iter().collect();
	assert!(root.set("tags", invalid).is_err());
	assert_eq!(root.get::<IndexSet<String>>("tags").unwrap(), next);
}
